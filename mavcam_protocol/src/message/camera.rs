//! # Camera information and settings; 2 messages
use super::{message_info, str_from_utf8_null};
use crate::Result;
use binrw::binrw;

const NAME_LENGTH: usize = 32;
const URI_LENGTH: usize = 140;

bitflags! {
    /// Camera capabilities (`CAMERA_CAP_FLAGS`).
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
    pub struct CameraCapFlags: u32 {
        const CAPTURE_VIDEO                   = 1;
        const CAPTURE_IMAGE                   = 1 << 1;
        const HAS_MODES                       = 1 << 2;
        const CAN_CAPTURE_IMAGE_IN_VIDEO_MODE = 1 << 3;
        const CAN_CAPTURE_VIDEO_IN_IMAGE_MODE = 1 << 4;
        const HAS_IMAGE_SURVEY_MODE           = 1 << 5;
        const HAS_BASIC_ZOOM                  = 1 << 6;
        const HAS_BASIC_FOCUS                 = 1 << 7;
        /// The camera has at least one video stream, which can be requested
        /// with `VIDEO_STREAM_INFORMATION`.
        const HAS_VIDEO_STREAM                = 1 << 8;
        const HAS_TRACKING_POINT              = 1 << 9;
        const HAS_TRACKING_RECTANGLE          = 1 << 10;
        const HAS_TRACKING_GEO_STATUS         = 1 << 11;
    }
}

/// `CAMERA_INFORMATION` (#259): camera identity and capabilities.
///
/// ## Packet format
///
/// * `u32`: time since boot
/// * `u32`: firmware version
/// * `f32`: focal length, in mm
/// * `f32`: horizontal sensor size, in mm
/// * `f32`: vertical sensor size, in mm
/// * `u32`: [capability flags](CameraCapFlags)
/// * `u16`: horizontal resolution, in pixels
/// * `u16`: vertical resolution, in pixels
/// * `u16`: camera definition file version
/// * `char[32]`: vendor name, null-padded
/// * `char[32]`: model name, null-padded
/// * `u8`: lens ID
/// * `char[140]`: camera definition file URI, null-padded
///
/// Extension fields:
///
/// * `u8`: gimbal device ID
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq)]
pub struct CameraInformation {
    pub time_boot_ms: u32,
    pub firmware_version: u32,
    pub focal_length: f32,
    pub sensor_size_h: f32,
    pub sensor_size_v: f32,
    #[br(map = CameraCapFlags::from_bits_retain)]
    #[bw(map = |f: &CameraCapFlags| f.bits())]
    pub flags: CameraCapFlags,
    pub resolution_h: u16,
    pub resolution_v: u16,
    pub cam_definition_version: u16,
    pub vendor_name: [u8; NAME_LENGTH],
    pub model_name: [u8; NAME_LENGTH],
    pub lens_id: u8,
    pub cam_definition_uri: [u8; URI_LENGTH],
    pub gimbal_device_id: u8,
}

message_info!(CameraInformation, 259, 92, 236);

impl CameraInformation {
    pub const NAME_LENGTH: usize = NAME_LENGTH;
    pub const URI_LENGTH: usize = URI_LENGTH;

    /// Gets the vendor name.
    pub fn vendor_name(&self) -> Result<&str> {
        str_from_utf8_null(&self.vendor_name)
    }

    /// Gets the model name.
    pub fn model_name(&self) -> Result<&str> {
        str_from_utf8_null(&self.model_name)
    }

    /// Gets the camera definition file URI.
    pub fn cam_definition_uri(&self) -> Result<&str> {
        str_from_utf8_null(&self.cam_definition_uri)
    }
}

/// `CAMERA_SETTINGS` (#260): current camera mode, zoom and focus.
///
/// ## Packet format
///
/// * `u32`: time since boot
/// * `u8`: camera mode
///
/// Extension fields:
///
/// * `f32`: zoom level, 0.0 to 100.0
/// * `f32`: focus level, 0.0 to 100.0
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct CameraSettings {
    pub time_boot_ms: u32,
    pub mode_id: u8,
    pub zoom_level: f32,
    pub focus_level: f32,
}

message_info!(CameraSettings, 260, 146, 13);
