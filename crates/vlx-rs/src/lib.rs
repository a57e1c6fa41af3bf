#![cfg_attr(not(feature = "std"), no_std)]

// 'alloc' is used for dynamic allocation (e.g., Vec<u8> payloads)
extern crate alloc;

// --- Foundation Modules ---
pub mod types;
pub mod error;

// --- Framing ---
pub mod frame;

// --- Request/Response Layer ---
pub mod api;

// --- Top-level Exports ---
pub use types::{DeviceKind, NodeEntry, NodeId};
pub use error::{ProtocolEncodingError, ProtocolError};
pub use frame::{Codec, Command, FrameEnvelope};
pub use api::{ApiCall, Session, SessionIdAllocator};
