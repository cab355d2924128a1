//! # MAVLink message bodies
//!
//! Structures here map to messages of the MAVLink `common` dialect, grouped into modules by their
//! functional area, and re-exported here.
//!
//! Fields are declared in *wire* order, not in the order of the XML definitions: MAVLink sorts
//! base fields by descending type size (arrays sort by their element type), then appends
//! extension fields in declaration order.
//!
//! Senders strip trailing null bytes from a body, so a body is always restored to its full
//! [`LENGTH`][MessageInfo::LENGTH] (including extension fields) before parsing. This means that
//! extension fields read as zero when the sender predates them.
//!
//! ## Progress
//!
//! Implemented 12 messages: enough for a camera component with video streams and extended
//! parameters.
//!
//! ## Unimplemented messages
//!
//! ID | Message name | Length
//! -- | ------------ | ------
//! 260 | `CAMERA_SETTINGS` (`camera_device_id` extension) | 14
//! 261 | `STORAGE_INFORMATION` | 61
//! 262 | `CAMERA_CAPTURE_STATUS` | 22
//! 263 | `CAMERA_IMAGE_CAPTURED` | 255
//! 271 | `CAMERA_FOV_STATUS` | 53
//! 275 | `CAMERA_TRACKING_IMAGE_STATUS` | 31

mod camera;
mod command;
mod heartbeat;
mod param_ext;
mod video;

use crate::Result;
use binrw::{binrw, helpers::until_eof};
use std::fmt::Debug;

pub use self::{
    camera::{CameraCapFlags, CameraInformation, CameraSettings},
    command::{CommandAck, CommandLong, MavCmd, MavResult},
    heartbeat::{Heartbeat, MavAutopilot, MavState, MavType},
    param_ext::{
        ParamAck, ParamExtAck, ParamExtRequestList, ParamExtRequestRead, ParamExtSet,
        ParamExtType, ParamExtValue, PARAM_ID_LENGTH, PARAM_VALUE_LENGTH,
    },
    video::{
        VideoStreamInformation, VideoStreamStatus, VideoStreamStatusFlags, VideoStreamType,
    },
};

/// Static properties of a message body.
pub trait MessageInfo {
    /// Message ID, as carried in [`MavFrame::message_id`][crate::MavFrame::message_id].
    const ID: u32;

    /// Seed for the frame checksum, derived from the message definition.
    ///
    /// This catches senders and receivers with different ideas about a
    /// message's layout.
    const CRC_EXTRA: u8;

    /// Length of the body in bytes, including extension fields.
    const LENGTH: usize;
}

/// Message body, selected by the frame's message ID.
///
/// The message ID isn't part of the body, so it needs to be passed in as an
/// argument when reading.
#[binrw]
#[brw(little)]
#[br(import(message_id: u32))]
#[derive(Clone, PartialEq)]
pub enum Message {
    #[br(pre_assert(message_id == Heartbeat::ID))]
    Heartbeat(Heartbeat),
    #[br(pre_assert(message_id == CommandLong::ID))]
    CommandLong(CommandLong),
    #[br(pre_assert(message_id == CommandAck::ID))]
    CommandAck(CommandAck),
    #[br(pre_assert(message_id == CameraInformation::ID))]
    CameraInformation(CameraInformation),
    #[br(pre_assert(message_id == CameraSettings::ID))]
    CameraSettings(CameraSettings),
    #[br(pre_assert(message_id == VideoStreamInformation::ID))]
    VideoStreamInformation(VideoStreamInformation),
    #[br(pre_assert(message_id == VideoStreamStatus::ID))]
    VideoStreamStatus(VideoStreamStatus),
    #[br(pre_assert(message_id == ParamExtRequestRead::ID))]
    ParamExtRequestRead(ParamExtRequestRead),
    #[br(pre_assert(message_id == ParamExtRequestList::ID))]
    ParamExtRequestList(ParamExtRequestList),
    #[br(pre_assert(message_id == ParamExtValue::ID))]
    ParamExtValue(ParamExtValue),
    #[br(pre_assert(message_id == ParamExtSet::ID))]
    ParamExtSet(ParamExtSet),
    #[br(pre_assert(message_id == ParamExtAck::ID))]
    ParamExtAck(ParamExtAck),
    Unknown {
        #[br(calc = message_id)]
        #[bw(ignore)]
        id: u32,
        #[br(parse_with = until_eof)]
        payload: Vec<u8>,
    },
}

macro_rules! mavlink_messages {
    (
        $($variant:ident,)*
    ) => {
        $(
            impl From<$variant> for Message {
                fn from(m: $variant) -> Message {
                    Message::$variant(m)
                }
            }
        )*

        impl Message {
            /// The message ID of this body.
            pub fn id(&self) -> u32 {
                match self {
                    $(
                        Self::$variant(_) => <$variant as MessageInfo>::ID,
                    )*
                    Self::Unknown { id, .. } => *id,
                }
            }

            /// Looks up the `(CRC_EXTRA, LENGTH)` of an implemented message ID.
            pub fn lookup(id: u32) -> Option<(u8, usize)> {
                $(
                    if id == <$variant as MessageInfo>::ID {
                        return Some((
                            <$variant as MessageInfo>::CRC_EXTRA,
                            <$variant as MessageInfo>::LENGTH,
                        ));
                    }
                )*
                None
            }
        }

        impl Debug for Message {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                match self {
                    $(
                        Self::$variant(v) => f
                            .debug_tuple(stringify!($variant))
                            .field(v)
                            .finish(),
                    )*
                    Self::Unknown { id, payload } => f
                        .debug_tuple("Unknown")
                        .field(id)
                        .field(&hex::encode(payload))
                        .finish(),
                }
            }
        }
    }
}

mavlink_messages!(
    Heartbeat,
    CommandLong,
    CommandAck,
    CameraInformation,
    CameraSettings,
    VideoStreamInformation,
    VideoStreamStatus,
    ParamExtRequestRead,
    ParamExtRequestList,
    ParamExtValue,
    ParamExtSet,
    ParamExtAck,
);

macro_rules! message_info {
    ($type:ident, $id:expr, $crc_extra:expr, $length:expr) => {
        impl $crate::message::MessageInfo for $type {
            const ID: u32 = $id;
            const CRC_EXTRA: u8 = $crc_extra;
            const LENGTH: usize = $length;
        }
    };
}
pub(crate) use message_info;

/// Parses a byte slice as an _optionally_-null-terminated, UTF-8-encoded
/// string, ignoring all bytes after the first null.
///
/// Returns [`Error::Utf8`][1] on UTF-8 encoding errors.
///
/// This is similar to [`CStr::from_bytes_until_nul`][0], but does not require a
/// null terminator.
///
/// [0]: std::ffi::CStr::from_bytes_until_nul
/// [1]: crate::Error::Utf8
pub fn str_from_utf8_null(p: &[u8]) -> Result<&str> {
    let p = p.split(|c| *c == 0).next().unwrap_or(p);
    Ok(std::str::from_utf8(p)?)
}
