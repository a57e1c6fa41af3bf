//! SLIP (RFC 1055) framing of gateway frames on the byte stream.

use crate::error::ProtocolError;
use alloc::vec::Vec;
use log::debug;

pub const END: u8 = 0xC0;
pub const ESC: u8 = 0xDB;
pub const ESC_END: u8 = 0xDC;
pub const ESC_ESC: u8 = 0xDD;

/// Largest frame on the wire: protocol id, length byte and up to 255 bytes
/// counted by the length byte.
const MAX_FRAME_LEN: usize = 2 + u8::MAX as usize;

/// Largest SLIP packet a valid frame can produce: every byte escaped, plus
/// both END delimiters.
pub const MAX_PACKET_LEN: usize = 2 * MAX_FRAME_LEN + 2;

/// Wraps `data` in END delimiters, escaping END and ESC bytes.
pub fn encode(data: &[u8]) -> Vec<u8> {
    let mut out = Vec::with_capacity(data.len() + 2);
    out.push(END);
    for &byte in data {
        match byte {
            END => out.extend_from_slice(&[ESC, ESC_END]),
            ESC => out.extend_from_slice(&[ESC, ESC_ESC]),
            _ => out.push(byte),
        }
    }
    out.push(END);
    out
}

/// Reverses [`encode`] for the bytes between two END delimiters.
pub fn decode(data: &[u8]) -> Result<Vec<u8>, ProtocolError> {
    let mut out = Vec::with_capacity(data.len());
    let mut bytes = data.iter();
    while let Some(&byte) = bytes.next() {
        match byte {
            ESC => match bytes.next() {
                Some(&ESC_END) => out.push(END),
                Some(&ESC_ESC) => out.push(ESC),
                _ => return Err(ProtocolError::InvalidFrame("invalid SLIP escape sequence")),
            },
            _ => out.push(byte),
        }
    }
    Ok(out)
}

/// Accumulates stream bytes and splits them into SLIP packets.
#[derive(Debug, Default)]
pub struct SlipDecoder {
    buffer: Vec<u8>,
}

impl SlipDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends bytes read from the stream.
    pub fn push(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Number of buffered bytes not yet returned as a packet.
    pub fn pending(&self) -> usize {
        self.buffer.len()
    }

    /// Returns the next complete packet, or `None` if more bytes are needed.
    ///
    /// Bytes before the opening END are dropped. Empty packets (two adjacent
    /// END bytes) are skipped. An open packet that grows past
    /// [`MAX_PACKET_LEN`] without a closing END is discarded and reported as
    /// an error.
    pub fn next_packet(&mut self) -> Option<Result<Vec<u8>, ProtocolError>> {
        loop {
            let start = match self.buffer.iter().position(|&b| b == END) {
                Some(start) => start,
                None => {
                    if !self.buffer.is_empty() {
                        debug!("[SLIP] Dropping {} bytes outside of a packet", self.buffer.len());
                        self.buffer.clear();
                    }
                    return None;
                }
            };
            if start > 0 {
                debug!("[SLIP] Dropping {} bytes before packet start", start);
                self.buffer.drain(..start);
            }

            let Some(end) = self.buffer[1..].iter().position(|&b| b == END).map(|i| i + 1) else {
                if self.buffer.len() > MAX_PACKET_LEN {
                    debug!("[SLIP] Discarding {} bytes of an unterminated packet", self.buffer.len());
                    self.buffer.clear();
                    return Some(Err(ProtocolError::InvalidFrame("SLIP packet exceeds maximum length")));
                }
                return None;
            };
            if end == 1 {
                // Back-to-back delimiters; the second END opens the next packet.
                self.buffer.remove(0);
                continue;
            }

            let packet = decode(&self.buffer[1..end]);
            self.buffer.drain(..=end);
            return Some(packet);
        }
    }
}
