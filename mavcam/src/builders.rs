//! Informational messages sent to the GCS.
//!
//! These only depend on the [ResponderConfig]; the camera's actual settings
//! aren't queried, and fixed values are reported instead.
use crate::{
    codec::pad_array,
    config::ResponderConfig,
    protocol::message::{
        CameraInformation, CameraSettings, VideoStreamInformation, VideoStreamStatus,
        VideoStreamStatusFlags, VideoStreamType,
    },
};

/// Reported horizontal resolution, in pixels.
pub const RESOLUTION_H: u16 = 1280;
/// Reported vertical resolution, in pixels.
pub const RESOLUTION_V: u16 = 720;
/// Reported bit rate, in kbit/s.
pub const BITRATE: u32 = 5000;
/// Reported horizontal field of view, in degrees.
pub const HFOV: u16 = 63;
/// ID of the only video stream.
pub const STREAM_ID: u8 = 1;

/// Placeholder camera definition URI.
const DEFINITION_URI: &str = "_XXX";

/// Camera identity and capabilities.
pub fn camera_information(config: &ResponderConfig) -> CameraInformation {
    let name = pad_array(&config.name);
    CameraInformation {
        time_boot_ms: config.boot_seconds(),
        firmware_version: 1,
        focal_length: 0.,
        sensor_size_h: 0.,
        sensor_size_v: 0.,
        flags: config.capabilities,
        resolution_h: RESOLUTION_H,
        resolution_v: RESOLUTION_V,
        cam_definition_version: 0,
        vendor_name: name,
        model_name: name,
        lens_id: 1,
        cam_definition_uri: pad_array(DEFINITION_URI),
        gimbal_device_id: 0,
    }
}

/// Current camera settings.
pub fn camera_settings(config: &ResponderConfig) -> CameraSettings {
    CameraSettings {
        time_boot_ms: config.boot_seconds(),
        mode_id: 1,
        zoom_level: 1.,
        focus_level: 1.,
    }
}

/// Current state of the video stream.
pub fn video_stream_status(_config: &ResponderConfig) -> VideoStreamStatus {
    VideoStreamStatus {
        framerate: 0.,
        bitrate: BITRATE,
        flags: VideoStreamStatusFlags::RUNNING,
        resolution_h: RESOLUTION_H,
        resolution_v: RESOLUTION_V,
        rotation: 0,
        hfov: HFOV,
        stream_id: STREAM_ID,
    }
}

/// Where to find the video stream.
///
/// The URI is left empty when there is no stream URL.
pub fn video_stream_information(config: &ResponderConfig) -> VideoStreamInformation {
    VideoStreamInformation {
        framerate: 30.,
        bitrate: BITRATE,
        flags: VideoStreamStatusFlags::RUNNING,
        resolution_h: RESOLUTION_H,
        resolution_v: RESOLUTION_V,
        rotation: 0,
        hfov: HFOV,
        stream_id: STREAM_ID,
        count: 1,
        typ: VideoStreamType::Rtsp as u8,
        name: pad_array(&config.name),
        uri: pad_array(config.stream_url()),
    }
}
