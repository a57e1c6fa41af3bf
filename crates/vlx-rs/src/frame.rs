//! Defines the command catalog, the frame envelope and its wire encodings.

pub mod command;
pub mod envelope;
pub mod codec;
pub mod slip;

pub use command::Command;
pub use envelope::FrameEnvelope;
pub use codec::{Codec, checksum};
pub use slip::SlipDecoder;
