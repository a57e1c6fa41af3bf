use super::{Command, FrameEnvelope};
use crate::error::ProtocolError;
use alloc::vec;
use alloc::vec::Vec;
use log::trace;

/// Protocol id carried in the first byte of every frame.
const PROTOCOL_ID: u8 = 0x00;

/// ProtocolID(1) + Length(1) + Command(2) + CRC(1)
const FRAME_OVERHEAD: usize = 5;

/// A trait for objects that can be serialized into and deserialized from a byte buffer.
pub trait Codec: Sized {
    /// Serializes the object into the provided buffer.
    /// Returns the number of bytes written.
    fn serialize(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError>;

    /// Deserializes an object from the provided buffer.
    /// The buffer must contain exactly one encoded object.
    fn deserialize(buffer: &[u8]) -> Result<Self, ProtocolError>;
}

/// XOR of all bytes, as used for the trailing frame checksum.
pub fn checksum(bytes: &[u8]) -> u8 {
    bytes.iter().fold(0, |acc, b| acc ^ b)
}

impl FrameEnvelope {
    /// Size of the encoded frame in bytes.
    pub fn encoded_len(&self) -> usize {
        self.payload().len() + FRAME_OVERHEAD
    }

    /// Encodes the frame into a freshly allocated buffer.
    pub fn to_bytes(&self) -> Vec<u8> {
        let mut buffer = vec![0u8; self.encoded_len()];
        // The buffer is sized from encoded_len, so serialize cannot run short.
        let written = self.serialize(&mut buffer).unwrap_or(0);
        buffer.truncate(written);
        buffer
    }

    /// Decodes one frame, validating header, checksum and declared length.
    pub fn from_bytes(buffer: &[u8]) -> Result<Self, ProtocolError> {
        Self::deserialize(buffer)
    }
}

impl Codec for FrameEnvelope {
    fn serialize(&self, buffer: &mut [u8]) -> Result<usize, ProtocolError> {
        let total = self.encoded_len();
        if buffer.len() < total {
            return Err(ProtocolError::BufferTooShort);
        }
        // The length byte counts the command and payload plus the checksum itself.
        let length = u8::try_from(self.payload().len() + 3)
            .map_err(|_| ProtocolError::InvalidFrame("payload exceeds frame size"))?;

        buffer[0] = PROTOCOL_ID;
        buffer[1] = length;
        buffer[2..4].copy_from_slice(&u16::from(self.command()).to_be_bytes());
        buffer[4..total - 1].copy_from_slice(self.payload());
        buffer[total - 1] = checksum(&buffer[..total - 1]);

        Ok(total)
    }

    fn deserialize(buffer: &[u8]) -> Result<Self, ProtocolError> {
        if buffer.len() < FRAME_OVERHEAD {
            return Err(ProtocolError::BufferTooShort);
        }
        if buffer[0] != PROTOCOL_ID {
            return Err(ProtocolError::InvalidFrame("unexpected protocol id"));
        }
        if usize::from(buffer[1]) != buffer.len() - 2 {
            return Err(ProtocolError::InvalidFrame("length byte does not match frame size"));
        }

        let (body, crc) = buffer.split_at(buffer.len() - 1);
        let expected = checksum(body);
        if expected != crc[0] {
            return Err(ProtocolError::ChecksumMismatch {
                expected,
                actual: crc[0],
            });
        }

        let command = Command::try_from(u16::from_be_bytes(buffer[2..4].try_into()?))?;
        let frame = FrameEnvelope::build(command, body[4..].to_vec())?;
        trace!("Decoded frame: {:?}", frame);
        Ok(frame)
    }
}
