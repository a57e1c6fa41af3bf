use super::ApiCall;
use crate::error::ProtocolError;
use crate::frame::{Command, FrameEnvelope};

/// Switches the gateway's house status monitor, which broadcasts actuator
/// state changes, on or off.
#[derive(Debug)]
pub struct HouseStatusMonitor {
    enable: bool,
    success: bool,
}

impl HouseStatusMonitor {
    pub fn enable() -> Self {
        Self {
            enable: true,
            success: false,
        }
    }

    pub fn disable() -> Self {
        Self {
            enable: false,
            success: false,
        }
    }

    fn confirmation(&self) -> Command {
        if self.enable {
            Command::HouseStatusMonitorEnableCfm
        } else {
            Command::HouseStatusMonitorDisableCfm
        }
    }
}

impl ApiCall for HouseStatusMonitor {
    fn request_frame(&self) -> Result<FrameEnvelope, ProtocolError> {
        let command = if self.enable {
            Command::HouseStatusMonitorEnableReq
        } else {
            Command::HouseStatusMonitorDisableReq
        };
        Ok(FrameEnvelope::empty(command)?)
    }

    fn handle_frame(&mut self, frame: &FrameEnvelope) -> bool {
        if frame.command() != self.confirmation() {
            return false;
        }
        self.success = true;
        true
    }

    fn success(&self) -> bool {
        self.success
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_enable_round_trip() {
        let mut call = HouseStatusMonitor::enable();
        assert_eq!(
            call.request_frame().unwrap().command(),
            Command::HouseStatusMonitorEnableReq
        );

        let wrong = FrameEnvelope::empty(Command::HouseStatusMonitorDisableCfm).unwrap();
        assert!(!call.handle_frame(&wrong));

        let cfm = FrameEnvelope::empty(Command::HouseStatusMonitorEnableCfm).unwrap();
        assert!(call.handle_frame(&cfm));
        assert!(call.success());
    }

    #[test]
    fn test_disable_request() {
        let call = HouseStatusMonitor::disable();
        assert_eq!(
            call.request_frame().unwrap().command(),
            Command::HouseStatusMonitorDisableReq
        );
        assert!(!call.success());
    }
}
