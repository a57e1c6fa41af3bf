// crates/vlx-rs/src/api/status_request.rs

use super::ApiCall;
use crate::error::{ProtocolEncodingError, ProtocolError};
use crate::frame::{Command, FrameEnvelope};
use crate::types::{NodeId, STATUS_REQUEST_MAX_NODES};
use alloc::vec;
use alloc::vec::Vec;
use log::{debug, warn};

/// Which status information the gateway should report.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(u8)]
pub enum StatusType {
    RequestTargetPosition = 0,
    #[default]
    RequestCurrentPosition = 1,
    RequestRemainingTime = 2,
    RequestMainInfo = 3,
}

/// Functional parameters FP1..FP7, as bits 7..1 of FPI1.
const FPI1_FP1_TO_FP7: u8 = 0b1111_1110;
const FPI2_NONE: u8 = 0;

/// Status byte of GW_STATUS_REQUEST_CFM.
const STATUS_REQUEST_ACCEPTED: u8 = 1;

/// Asks the gateway to report the status of specific nodes.
///
/// The exchange is a command session: the gateway confirms the request, sends
/// one notification per node, then closes the session with
/// GW_SESSION_FINISHED_NTF. Only frames carrying this call's session id are
/// considered.
#[derive(Debug)]
pub struct StatusRequest {
    session_id: u16,
    node_ids: Vec<NodeId>,
    status_type: StatusType,
    success: bool,
}

impl StatusRequest {
    /// Requests the current position of a single node.
    pub fn new(session_id: u16, node_id: NodeId) -> Self {
        Self {
            session_id,
            node_ids: vec![node_id],
            status_type: StatusType::default(),
            success: false,
        }
    }

    /// Requests the status of several nodes in one session.
    pub fn with_nodes(
        session_id: u16,
        node_ids: Vec<NodeId>,
        status_type: StatusType,
    ) -> Result<Self, ProtocolEncodingError> {
        if node_ids.len() > STATUS_REQUEST_MAX_NODES {
            return Err(ProtocolEncodingError::TooManyNodes {
                max: STATUS_REQUEST_MAX_NODES,
                actual: node_ids.len(),
            });
        }
        Ok(Self {
            session_id,
            node_ids,
            status_type,
            success: false,
        })
    }

    pub fn session_id(&self) -> u16 {
        self.session_id
    }

    pub fn node_ids(&self) -> &[NodeId] {
        &self.node_ids
    }

    fn payload(&self) -> Vec<u8> {
        let mut payload = Vec::with_capacity(Command::StatusRequestReq.payload_len());
        payload.extend_from_slice(&self.session_id.to_be_bytes());
        payload.push(self.node_ids.len() as u8);
        let mut index_array = [0u8; STATUS_REQUEST_MAX_NODES];
        for (slot, node_id) in index_array.iter_mut().zip(&self.node_ids) {
            *slot = node_id.0;
        }
        payload.extend_from_slice(&index_array);
        payload.push(self.status_type as u8);
        payload.push(FPI1_FP1_TO_FP7);
        payload.push(FPI2_NONE);
        payload
    }
}

impl ApiCall for StatusRequest {
    fn request_frame(&self) -> Result<FrameEnvelope, ProtocolError> {
        Ok(FrameEnvelope::build(Command::StatusRequestReq, self.payload())?)
    }

    fn handle_frame(&mut self, frame: &FrameEnvelope) -> bool {
        if frame.session_id() != Some(self.session_id) {
            return false;
        }
        match frame.command() {
            Command::StatusRequestCfm => {
                if frame.payload()[2] != STATUS_REQUEST_ACCEPTED {
                    warn!(
                        "[API] Status request for nodes {:?} rejected (session {})",
                        self.node_ids, self.session_id
                    );
                    self.success = false;
                    return true;
                }
                debug!("[API] Status request session {} accepted", self.session_id);
                false
            }
            Command::SessionFinishedNtf => {
                self.success = true;
                true
            }
            _ => false,
        }
    }

    fn success(&self) -> bool {
        self.success
    }
}
