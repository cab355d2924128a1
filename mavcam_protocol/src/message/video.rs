//! # Video streams; 2 messages
use super::{message_info, str_from_utf8_null};
use crate::Result;
use binrw::binrw;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

const NAME_LENGTH: usize = 32;
const URI_LENGTH: usize = 160;

bitflags! {
    /// Video stream status (`VIDEO_STREAM_STATUS_FLAGS`).
    #[derive(Debug, Default, PartialEq, Eq, Clone, Copy)]
    pub struct VideoStreamStatusFlags: u16 {
        /// The stream is active.
        const RUNNING = 1;
        /// The stream is a thermal imaging stream.
        const THERMAL = 1 << 1;
    }
}

/// Video stream transport (`VIDEO_STREAM_TYPE`).
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum VideoStreamType {
    /// RTSP; the URI is an `rtsp://` URL.
    Rtsp = 0,
    /// RTP over UDP; the URI is a port number.
    RtpUdp = 1,
    /// MPEG over TCP; the URI is `host:port`.
    TcpMpeg = 2,
    /// H.264 in MPEG-TS; the URI is a port number.
    MpegTsH264 = 3,
}

/// `VIDEO_STREAM_INFORMATION` (#269): how to reach a video stream.
///
/// ## Packet format
///
/// * `f32`: frame rate
/// * `u32`: bit rate
/// * `u16`: [status flags](VideoStreamStatusFlags)
/// * `u16`: horizontal resolution, in pixels
/// * `u16`: vertical resolution, in pixels
/// * `u16`: rotation, in degrees clockwise
/// * `u16`: horizontal field of view, in degrees
/// * `u8`: stream ID, starting at 1
/// * `u8`: number of streams
/// * `u8`: [stream type](VideoStreamType)
/// * `char[32]`: stream name, null-padded
/// * `char[160]`: stream URI, null-padded
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq)]
pub struct VideoStreamInformation {
    pub framerate: f32,
    pub bitrate: u32,
    #[br(map = VideoStreamStatusFlags::from_bits_retain)]
    #[bw(map = |f: &VideoStreamStatusFlags| f.bits())]
    pub flags: VideoStreamStatusFlags,
    pub resolution_h: u16,
    pub resolution_v: u16,
    pub rotation: u16,
    pub hfov: u16,
    pub stream_id: u8,
    pub count: u8,
    pub typ: u8,
    pub name: [u8; NAME_LENGTH],
    pub uri: [u8; URI_LENGTH],
}

message_info!(VideoStreamInformation, 269, 109, 213);

impl VideoStreamInformation {
    pub const NAME_LENGTH: usize = NAME_LENGTH;
    pub const URI_LENGTH: usize = URI_LENGTH;

    /// Gets the stream name.
    pub fn name(&self) -> Result<&str> {
        str_from_utf8_null(&self.name)
    }

    /// Gets the stream URI.
    pub fn uri(&self) -> Result<&str> {
        str_from_utf8_null(&self.uri)
    }

    /// Gets the stream type, if it is known.
    pub fn stream_type(&self) -> Option<VideoStreamType> {
        VideoStreamType::from_u8(self.typ)
    }
}

/// `VIDEO_STREAM_STATUS` (#270): current parameters of a video stream.
///
/// ## Packet format
///
/// * `f32`: frame rate
/// * `u32`: bit rate
/// * `u16`: [status flags](VideoStreamStatusFlags)
/// * `u16`: horizontal resolution, in pixels
/// * `u16`: vertical resolution, in pixels
/// * `u16`: rotation, in degrees clockwise
/// * `u16`: horizontal field of view, in degrees
/// * `u8`: stream ID
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, Copy, PartialEq)]
pub struct VideoStreamStatus {
    pub framerate: f32,
    pub bitrate: u32,
    #[br(map = VideoStreamStatusFlags::from_bits_retain)]
    #[bw(map = |f: &VideoStreamStatusFlags| f.bits())]
    pub flags: VideoStreamStatusFlags,
    pub resolution_h: u16,
    pub resolution_v: u16,
    pub rotation: u16,
    pub hfov: u16,
    pub stream_id: u8,
}

message_info!(VideoStreamStatus, 270, 59, 19);
