// crates/vlx-rs-tokio/tests/simulator/mod.rs

//! An in-memory gateway implementing `Session`, recording every request.

#![allow(dead_code)]

use std::collections::BTreeSet;
use std::sync::Mutex;
use std::time::Duration;
use tokio::time::Instant;
use vlx_rs::frame::{Command, FrameEnvelope};
use vlx_rs::{ApiCall, NodeId, ProtocolError, Session, SessionIdAllocator};

/// Everything the simulated gateway has seen, plus its failure plan.
#[derive(Debug, Default)]
pub struct GatewayLog {
    /// Arrival time of every GW_GET_STATE_REQ.
    pub get_state_calls: Vec<Instant>,
    /// Node ids of every GW_STATUS_REQUEST_REQ, in arrival order.
    pub status_requests: Vec<NodeId>,
    /// 1-based GW_GET_STATE_REQ numbers answered with an invalid state.
    fail_get_state: BTreeSet<usize>,
    /// Nodes whose status requests are rejected.
    reject_status_for: BTreeSet<NodeId>,
    /// Nodes whose status requests are never answered.
    drop_status_for: BTreeSet<NodeId>,
    /// Time the gateway takes to answer any request.
    response_delay: Duration,
}

#[derive(Debug, Default)]
pub struct SimulatedGateway {
    log: Mutex<GatewayLog>,
    session_ids: SessionIdAllocator,
}

impl SimulatedGateway {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn fail_get_state_on(&self, call_number: usize) {
        self.log.lock().unwrap().fail_get_state.insert(call_number);
    }

    pub fn reject_status_for(&self, node_id: NodeId) {
        self.log.lock().unwrap().reject_status_for.insert(node_id);
    }

    pub fn drop_status_for(&self, node_id: NodeId) {
        self.log.lock().unwrap().drop_status_for.insert(node_id);
    }

    pub fn set_response_delay(&self, delay: Duration) {
        self.log.lock().unwrap().response_delay = delay;
    }

    pub fn get_state_calls(&self) -> Vec<Instant> {
        self.log.lock().unwrap().get_state_calls.clone()
    }

    pub fn status_requests(&self) -> Vec<NodeId> {
        self.log.lock().unwrap().status_requests.clone()
    }

    /// Records the request and returns the frames the gateway answers with.
    fn respond(&self, request: &FrameEnvelope) -> (Vec<FrameEnvelope>, Duration) {
        let mut log = self.log.lock().unwrap();
        let delay = log.response_delay;
        let frames = match request.command() {
            Command::GetStateReq => {
                log.get_state_calls.push(Instant::now());
                let call_number = log.get_state_calls.len();
                // 0xFF is not a valid gateway state, so the call reports failure.
                let state = if log.fail_get_state.contains(&call_number) { 0xFF } else { 2 };
                vec![FrameEnvelope::build(Command::GetStateCfm, vec![state, 0, 0, 0, 0, 0]).unwrap()]
            }
            Command::StatusRequestReq => {
                let payload = request.payload();
                let node_id = NodeId(payload[3]);
                log.status_requests.push(node_id);
                let [hi, lo] = [payload[0], payload[1]];
                if log.drop_status_for.contains(&node_id) {
                    vec![]
                } else if log.reject_status_for.contains(&node_id) {
                    vec![FrameEnvelope::build(Command::StatusRequestCfm, vec![hi, lo, 0]).unwrap()]
                } else {
                    vec![
                        FrameEnvelope::build(Command::StatusRequestCfm, vec![hi, lo, 1]).unwrap(),
                        FrameEnvelope::build(Command::SessionFinishedNtf, vec![hi, lo]).unwrap(),
                    ]
                }
            }
            Command::HouseStatusMonitorEnableReq => {
                vec![FrameEnvelope::empty(Command::HouseStatusMonitorEnableCfm).unwrap()]
            }
            Command::HouseStatusMonitorDisableReq => {
                vec![FrameEnvelope::empty(Command::HouseStatusMonitorDisableCfm).unwrap()]
            }
            _ => vec![],
        };
        (frames, delay)
    }
}

impl Session for SimulatedGateway {
    async fn do_api_call<C>(&self, call: &mut C) -> Result<(), ProtocolError>
    where
        C: ApiCall + Send,
    {
        let request = call.request_frame()?;
        let (frames, delay) = self.respond(&request);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        for frame in &frames {
            if call.handle_frame(frame) {
                return Ok(());
            }
        }
        Err(ProtocolError::Timeout(request.command()))
    }

    fn next_session_id(&self) -> u16 {
        self.session_ids.next()
    }
}
