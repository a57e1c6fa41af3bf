use crate::frame::Command;
use crate::types::NodeIdError;
use core::array::TryFromSliceError;
use core::fmt;

/// A frame could not be constructed from the given parts.
///
/// This is always a programming or configuration error on the sending side and
/// is never retried.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolEncodingError {
    /// The payload length differs from the length declared for the command.
    PayloadLengthMismatch {
        command: Command,
        expected: usize,
        actual: usize,
    },
    /// More node ids were given than a single request can carry.
    TooManyNodes { max: usize, actual: usize },
}

impl fmt::Display for ProtocolEncodingError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PayloadLengthMismatch {
                command,
                expected,
                actual,
            } => write!(
                f,
                "Payload length mismatch for {}: expected {} bytes, got {}",
                command, expected, actual
            ),
            Self::TooManyNodes { max, actual } => {
                write!(f, "Too many nodes in request: {} (max {})", actual, max)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolEncodingError {}

/// Defines a portable, descriptive Error type for gateway exchanges.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProtocolError {
    /// The gateway did not confirm the request.
    CallFailed(&'static str),
    /// A request frame could not be built.
    Encoding(ProtocolEncodingError),
    /// The provided buffer is too small for the operation.
    BufferTooShort,
    /// A received frame is structurally invalid.
    InvalidFrame(&'static str),
    /// The trailing checksum does not match the frame content.
    ChecksumMismatch { expected: u8, actual: u8 },
    /// The command id is not part of the known catalog.
    UnknownCommand(u16),
    /// A value in a frame is not a valid enum variant.
    InvalidEnumValue,
    /// A value in a frame is not a valid node index.
    InvalidNodeId(u8),
    /// A multi-byte value could not be parsed from a slice.
    SliceConversion,
    /// No response completed the exchange in time.
    Timeout(Command),
    /// The peer closed the stream.
    ConnectionClosed,
    /// An underlying I/O error occurred.
    Io,
}

impl fmt::Display for ProtocolError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::CallFailed(s) => write!(f, "API call failed: {}", s),
            Self::Encoding(e) => write!(f, "Frame encoding error: {}", e),
            Self::BufferTooShort => write!(f, "Buffer is too short for the frame"),
            Self::InvalidFrame(s) => write!(f, "Invalid frame: {}", s),
            Self::ChecksumMismatch { expected, actual } => write!(
                f,
                "Frame checksum mismatch: expected {expected:#04x}, got {actual:#04x}"
            ),
            Self::UnknownCommand(v) => write!(f, "Unknown command id: {v:#06x}"),
            Self::InvalidEnumValue => write!(f, "A value in the frame is not a valid enum variant"),
            Self::InvalidNodeId(v) => write!(f, "Invalid NodeId value: {v}"),
            Self::SliceConversion => write!(f, "Failed to convert slice to a fixed-size array"),
            Self::Timeout(command) => write!(f, "Timed out waiting for the response to {}", command),
            Self::ConnectionClosed => write!(f, "Connection closed by the gateway"),
            Self::Io => write!(f, "An underlying I/O error occurred"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ProtocolError {}

// --- From Implementations for Error Conversion ---

impl From<ProtocolEncodingError> for ProtocolError {
    fn from(err: ProtocolEncodingError) -> Self {
        ProtocolError::Encoding(err)
    }
}

impl From<TryFromSliceError> for ProtocolError {
    fn from(_: TryFromSliceError) -> Self {
        ProtocolError::SliceConversion
    }
}

impl From<NodeIdError> for ProtocolError {
    fn from(err: NodeIdError) -> Self {
        match err {
            NodeIdError::InvalidRange(val) => ProtocolError::InvalidNodeId(val),
        }
    }
}
