// crates/vlx-rs/src/api/get_state.rs

use super::ApiCall;
use crate::error::ProtocolError;
use crate::frame::{Command, FrameEnvelope};
use log::warn;

/// Operating mode reported by the gateway.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GatewayState {
    TestMode = 0,
    GatewayModeNoActuator = 1,
    GatewayModeWithActuators = 2,
    BeaconModeNotConfigured = 3,
    BeaconModeWithActuators = 4,
    Error = 5,
}

impl TryFrom<u8> for GatewayState {
    type Error = ProtocolError;
    fn try_from(value: u8) -> Result<Self, ProtocolError> {
        match value {
            0 => Ok(GatewayState::TestMode),
            1 => Ok(GatewayState::GatewayModeNoActuator),
            2 => Ok(GatewayState::GatewayModeWithActuators),
            3 => Ok(GatewayState::BeaconModeNotConfigured),
            4 => Ok(GatewayState::BeaconModeWithActuators),
            5 => Ok(GatewayState::Error),
            _ => Err(ProtocolError::InvalidEnumValue),
        }
    }
}

/// What the gateway is busy with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum GatewaySubState {
    Idle = 0x00,
    PerformingTaskConfigurationServiceHandler = 0x01,
    PerformingTaskSceneConfiguration = 0x02,
    PerformingTaskInformationServiceConfiguration = 0x03,
    PerformingTaskContactInputConfiguration = 0x04,
    PerformingTaskCommand = 0x80,
    PerformingTaskActivateGroup = 0x81,
    PerformingTaskActivateScene = 0x82,
}

impl TryFrom<u8> for GatewaySubState {
    type Error = ProtocolError;
    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0x00 => Ok(Self::Idle),
            0x01 => Ok(Self::PerformingTaskConfigurationServiceHandler),
            0x02 => Ok(Self::PerformingTaskSceneConfiguration),
            0x03 => Ok(Self::PerformingTaskInformationServiceConfiguration),
            0x04 => Ok(Self::PerformingTaskContactInputConfiguration),
            0x80 => Ok(Self::PerformingTaskCommand),
            0x81 => Ok(Self::PerformingTaskActivateGroup),
            0x82 => Ok(Self::PerformingTaskActivateScene),
            _ => Err(ProtocolError::InvalidEnumValue),
        }
    }
}

/// Queries the gateway state. Also serves as the session keep-alive request.
#[derive(Debug, Default)]
pub struct GetState {
    success: bool,
    state: Option<(GatewayState, GatewaySubState)>,
}

impl GetState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn gateway_state(&self) -> Option<GatewayState> {
        self.state.map(|(state, _)| state)
    }

    pub fn gateway_sub_state(&self) -> Option<GatewaySubState> {
        self.state.map(|(_, sub_state)| sub_state)
    }
}

impl ApiCall for GetState {
    fn request_frame(&self) -> Result<FrameEnvelope, ProtocolError> {
        Ok(FrameEnvelope::empty(Command::GetStateReq)?)
    }

    fn handle_frame(&mut self, frame: &FrameEnvelope) -> bool {
        if frame.command() != Command::GetStateCfm {
            return false;
        }
        // Length is guaranteed by the envelope: GatewayState, SubState, StateData[4].
        let payload = frame.payload();
        match (
            GatewayState::try_from(payload[0]),
            GatewaySubState::try_from(payload[1]),
        ) {
            (Ok(state), Ok(sub_state)) => {
                self.state = Some((state, sub_state));
                self.success = true;
            }
            _ => {
                warn!(
                    "[API] GW_GET_STATE_CFM with unknown state {:#04x}/{:#04x}",
                    payload[0], payload[1]
                );
                self.success = false;
            }
        }
        true
    }

    fn success(&self) -> bool {
        self.success
    }
}
