// crates/vlx-rs/src/frame/command.rs

use crate::error::ProtocolError;
use core::fmt;

/// Gateway command identifiers used by this client.
///
/// Each command has a fixed payload length; a frame for the command is only
/// valid when its payload has exactly that many bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u16)]
pub enum Command {
    /// Error notification sent by the gateway for a malformed request.
    ErrorNtf = 0x0000,
    GetStateReq = 0x000C,
    GetStateCfm = 0x000D,
    HouseStatusMonitorEnableReq = 0x0240,
    HouseStatusMonitorEnableCfm = 0x0241,
    HouseStatusMonitorDisableReq = 0x0242,
    HouseStatusMonitorDisableCfm = 0x0243,
    /// Ends a command session started by a request carrying a session id.
    SessionFinishedNtf = 0x0304,
    StatusRequestReq = 0x0305,
    StatusRequestCfm = 0x0306,
}

impl Command {
    /// Number of payload bytes a frame of this command carries.
    pub const fn payload_len(self) -> usize {
        match self {
            Command::ErrorNtf => 1,
            Command::GetStateReq => 0,
            // GatewayState(1) + SubState(1) + StateData(4)
            Command::GetStateCfm => 6,
            Command::HouseStatusMonitorEnableReq
            | Command::HouseStatusMonitorEnableCfm
            | Command::HouseStatusMonitorDisableReq
            | Command::HouseStatusMonitorDisableCfm => 0,
            Command::SessionFinishedNtf => 2,
            // SessionID(2) + IndexArrayCount(1) + IndexArray(20)
            // + StatusType(1) + FPI1(1) + FPI2(1)
            Command::StatusRequestReq => 26,
            // SessionID(2) + Status(1)
            Command::StatusRequestCfm => 3,
        }
    }

    /// The command's name as used in the gateway's documentation.
    pub const fn name(self) -> &'static str {
        match self {
            Command::ErrorNtf => "GW_ERROR_NTF",
            Command::GetStateReq => "GW_GET_STATE_REQ",
            Command::GetStateCfm => "GW_GET_STATE_CFM",
            Command::HouseStatusMonitorEnableReq => "GW_HOUSE_STATUS_MONITOR_ENABLE_REQ",
            Command::HouseStatusMonitorEnableCfm => "GW_HOUSE_STATUS_MONITOR_ENABLE_CFM",
            Command::HouseStatusMonitorDisableReq => "GW_HOUSE_STATUS_MONITOR_DISABLE_REQ",
            Command::HouseStatusMonitorDisableCfm => "GW_HOUSE_STATUS_MONITOR_DISABLE_CFM",
            Command::SessionFinishedNtf => "GW_SESSION_FINISHED_NTF",
            Command::StatusRequestReq => "GW_STATUS_REQUEST_REQ",
            Command::StatusRequestCfm => "GW_STATUS_REQUEST_CFM",
        }
    }
}

impl TryFrom<u16> for Command {
    type Error = ProtocolError;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            0x0000 => Ok(Command::ErrorNtf),
            0x000C => Ok(Command::GetStateReq),
            0x000D => Ok(Command::GetStateCfm),
            0x0240 => Ok(Command::HouseStatusMonitorEnableReq),
            0x0241 => Ok(Command::HouseStatusMonitorEnableCfm),
            0x0242 => Ok(Command::HouseStatusMonitorDisableReq),
            0x0243 => Ok(Command::HouseStatusMonitorDisableCfm),
            0x0304 => Ok(Command::SessionFinishedNtf),
            0x0305 => Ok(Command::StatusRequestReq),
            0x0306 => Ok(Command::StatusRequestCfm),
            _ => Err(ProtocolError::UnknownCommand(value)),
        }
    }
}

impl From<Command> for u16 {
    fn from(command: Command) -> Self {
        command as u16
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
