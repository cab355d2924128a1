//! # Commands; 2 messages
use super::message_info;
use binrw::binrw;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// `COMMAND_LONG` (#76): a command with up to seven float parameters.
///
/// ## Packet format
///
/// * `f32[7]`: command parameters
/// * `u16`: command ([`MavCmd`])
/// * `u8`: target system ID
/// * `u8`: target component ID
/// * `u8`: confirmation counter, incremented on retransmission
#[binrw]
#[brw(little)]
#[derive(Debug, Default, PartialEq, Clone, Copy)]
pub struct CommandLong {
    pub param1: f32,
    pub param2: f32,
    pub param3: f32,
    pub param4: f32,
    pub param5: f32,
    pub param6: f32,
    pub param7: f32,
    pub command: u16,
    pub target_system: u8,
    pub target_component: u8,
    pub confirmation: u8,
}

message_info!(CommandLong, 76, 152, 33);

impl CommandLong {
    /// Makes a command with all parameters set to zero.
    pub fn new(command: MavCmd, target_system: u8, target_component: u8) -> Self {
        Self {
            command: command as u16,
            target_system,
            target_component,
            ..Default::default()
        }
    }

    /// Gets the command, if it is known.
    pub fn mav_cmd(&self) -> Option<MavCmd> {
        MavCmd::from_u16(self.command)
    }
}

/// `COMMAND_ACK` (#77): the outcome of a command.
///
/// ## Packet format
///
/// * `u16`: command ([`MavCmd`]) being acknowledged
/// * `u8`: result ([`MavResult`])
///
/// Extension fields:
///
/// * `u8`: progress percentage, for [`MavResult::InProgress`]
/// * `i32`: additional result information
/// * `u8`: system ID of the command's sender
/// * `u8`: component ID of the command's sender
#[binrw]
#[brw(little)]
#[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
pub struct CommandAck {
    pub command: u16,
    pub result: u8,
    pub progress: u8,
    pub result_param2: i32,
    pub target_system: u8,
    pub target_component: u8,
}

message_info!(CommandAck, 77, 143, 10);

impl CommandAck {
    /// Makes an acknowledgement of `command`, addressed to the command's
    /// sender.
    pub fn new(command: u16, result: MavResult, target_system: u8, target_component: u8) -> Self {
        Self {
            command,
            result: result as u8,
            progress: 0,
            result_param2: 0,
            target_system,
            target_component,
        }
    }

    /// Gets the result, if it is known.
    pub fn mav_result(&self) -> Option<MavResult> {
        MavResult::from_u8(self.result)
    }
}

/// Commands (`MAV_CMD`) understood by camera components.
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u16)]
pub enum MavCmd {
    /// Request a [`CameraInformation`][super::CameraInformation].
    RequestCameraInformation = 521,
    /// Request a [`CameraSettings`][super::CameraSettings].
    RequestCameraSettings = 522,
    /// Request `STORAGE_INFORMATION`.
    RequestStorageInformation = 525,
    /// Request `CAMERA_CAPTURE_STATUS`.
    RequestCameraCaptureStatus = 527,
    SetCameraZoom = 531,
    SetCameraFocus = 532,
    RequestVideoStartStreaming = 2502,
    RequestVideoStopStreaming = 2503,
    /// Request a [`VideoStreamInformation`][super::VideoStreamInformation].
    RequestVideoStreamInformation = 2504,
    /// Request a [`VideoStreamStatus`][super::VideoStreamStatus].
    RequestVideoStreamStatus = 2505,
}

/// Command results (`MAV_RESULT`).
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum MavResult {
    Accepted = 0,
    TemporarilyRejected = 1,
    Denied = 2,
    Unsupported = 3,
    Failed = 4,
    InProgress = 5,
    Cancelled = 6,
}
