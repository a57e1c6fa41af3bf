//! Request/response exchanges with the gateway.
//!
//! An [`ApiCall`] knows which frame opens an exchange and which received
//! frames belong to it. A [`Session`] carries the frames; how it does so
//! (stream, simulator, ...) is not visible to the calls.

pub mod get_state;
pub mod house_status_monitor;
pub mod status_request;

pub use get_state::{GatewayState, GatewaySubState, GetState};
pub use house_status_monitor::HouseStatusMonitor;
pub use status_request::{StatusRequest, StatusType};

use crate::error::ProtocolError;
use crate::frame::FrameEnvelope;
use core::future::Future;
use core::sync::atomic::{AtomicU16, Ordering};

/// One request/response exchange.
pub trait ApiCall {
    /// Builds the frame that opens the exchange.
    fn request_frame(&self) -> Result<FrameEnvelope, ProtocolError>;

    /// Offers a received frame to the call.
    ///
    /// Returns `true` once the exchange is complete, whether it succeeded or
    /// not. Frames that do not belong to the exchange are ignored.
    fn handle_frame(&mut self, frame: &FrameEnvelope) -> bool;

    /// Whether the completed exchange was confirmed by the gateway.
    fn success(&self) -> bool;
}

/// A live connection to the gateway that can run API calls.
pub trait Session: Send + Sync {
    /// Sends the call's request and feeds received frames to it until the
    /// call reports completion.
    ///
    /// An `Ok` result only means the exchange ran to completion; inspect
    /// [`ApiCall::success`] for the gateway's verdict.
    fn do_api_call<C>(&self, call: &mut C) -> impl Future<Output = Result<(), ProtocolError>> + Send
    where
        C: ApiCall + Send;

    /// Allocates an id for a call that opens a command session.
    fn next_session_id(&self) -> u16;
}

/// Hands out command session ids. Wraps around and never yields 0.
#[derive(Debug, Default)]
pub struct SessionIdAllocator {
    last: AtomicU16,
}

impl SessionIdAllocator {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn next(&self) -> u16 {
        loop {
            let id = self.last.fetch_add(1, Ordering::Relaxed).wrapping_add(1);
            if id != 0 {
                return id;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_session_ids_skip_zero() {
        let ids = SessionIdAllocator::new();
        assert_eq!(ids.next(), 1);
        assert_eq!(ids.next(), 2);

        ids.last.store(u16::MAX - 1, Ordering::Relaxed);
        assert_eq!(ids.next(), u16::MAX);
        assert_eq!(ids.next(), 1);
    }
}
