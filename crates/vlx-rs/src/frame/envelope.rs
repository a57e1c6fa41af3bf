// crates/vlx-rs/src/frame/envelope.rs

use super::Command;
use crate::error::ProtocolEncodingError;
use alloc::vec::Vec;

/// One command and its payload, as exchanged with the gateway.
///
/// The payload length always equals `command.payload_len()`; this is checked
/// once at construction and the envelope is immutable afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FrameEnvelope {
    command: Command,
    payload: Vec<u8>,
}

impl FrameEnvelope {
    /// Creates a frame, rejecting payloads whose length does not match the
    /// length declared for `command`.
    pub fn build(command: Command, payload: Vec<u8>) -> Result<Self, ProtocolEncodingError> {
        let expected = command.payload_len();
        if payload.len() != expected {
            return Err(ProtocolEncodingError::PayloadLengthMismatch {
                command,
                expected,
                actual: payload.len(),
            });
        }
        Ok(Self { command, payload })
    }

    /// Creates a frame for a command without payload.
    pub fn empty(command: Command) -> Result<Self, ProtocolEncodingError> {
        Self::build(command, Vec::new())
    }

    pub fn command(&self) -> Command {
        self.command
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload
    }

    /// Reads the big-endian session id found at the start of session-scoped
    /// frames. Returns `None` if the payload is too short to carry one.
    pub fn session_id(&self) -> Option<u16> {
        match self.payload.as_slice() {
            [hi, lo, ..] => Some(u16::from_be_bytes([*hi, *lo])),
            _ => None,
        }
    }
}
