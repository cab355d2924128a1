//! # Extended parameters; 5 messages
//!
//! The extended parameter protocol carries values of up to 128 bytes, which
//! camera components use for their settings. Parameters are identified by a
//! name of up to 16 bytes.
//!
//! How a value is laid out inside the 128 byte field depends on the
//! [`ParamExtType`], and is left to the sender and receiver to agree on.
use super::{message_info, str_from_utf8_null};
use crate::Result;
use binrw::binrw;
use num_traits::FromPrimitive;
#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Length of a parameter name field.
pub const PARAM_ID_LENGTH: usize = 16;

/// Length of a parameter value field.
pub const PARAM_VALUE_LENGTH: usize = 128;

/// Parameter value types (`MAV_PARAM_EXT_TYPE`).
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ParamExtType {
    Uint8 = 1,
    Int8 = 2,
    Uint16 = 3,
    Int16 = 4,
    Uint32 = 5,
    Int32 = 6,
    Uint64 = 7,
    Int64 = 8,
    Real32 = 9,
    Real64 = 10,
    Custom = 11,
}

/// Parameter write results (`PARAM_ACK`).
#[derive(Debug, FromPrimitive, ToPrimitive, PartialEq, Eq, Clone, Copy)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[repr(u8)]
pub enum ParamAck {
    Accepted = 0,
    ValueUnsupported = 1,
    Failed = 2,
    InProgress = 3,
}

/// `PARAM_EXT_REQUEST_READ` (#320): request a single parameter value.
///
/// ## Packet format
///
/// * `i16`: parameter index, or `-1` to use the name instead
/// * `u8`: target system ID
/// * `u8`: target component ID
/// * `char[16]`: parameter name, null-padded
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParamExtRequestRead {
    pub param_index: i16,
    pub target_system: u8,
    pub target_component: u8,
    pub param_id: [u8; PARAM_ID_LENGTH],
}

message_info!(ParamExtRequestRead, 320, 243, 20);

impl ParamExtRequestRead {
    /// Gets the parameter name.
    pub fn name(&self) -> Result<&str> {
        str_from_utf8_null(&self.param_id)
    }
}

/// `PARAM_EXT_REQUEST_LIST` (#321): request all parameter values.
///
/// ## Packet format
///
/// * `u8`: target system ID
/// * `u8`: target component ID
#[binrw]
#[brw(little)]
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ParamExtRequestList {
    pub target_system: u8,
    pub target_component: u8,
}

message_info!(ParamExtRequestList, 321, 88, 2);

/// `PARAM_EXT_VALUE` (#322): a parameter's current value.
///
/// ## Packet format
///
/// * `u16`: total number of parameters
/// * `u16`: index of this parameter
/// * `char[16]`: parameter name, null-padded
/// * `u8[128]`: parameter value
/// * `u8`: [value type](ParamExtType)
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamExtValue {
    pub param_count: u16,
    pub param_index: u16,
    pub param_id: [u8; PARAM_ID_LENGTH],
    pub param_value: [u8; PARAM_VALUE_LENGTH],
    pub param_type: u8,
}

message_info!(ParamExtValue, 322, 243, 149);

impl ParamExtValue {
    /// Gets the parameter name.
    pub fn name(&self) -> Result<&str> {
        str_from_utf8_null(&self.param_id)
    }

    /// Gets the value type, if it is known.
    pub fn value_type(&self) -> Option<ParamExtType> {
        ParamExtType::from_u8(self.param_type)
    }
}

/// `PARAM_EXT_SET` (#323): write a parameter value.
///
/// The receiver answers with a [`ParamExtAck`].
///
/// ## Packet format
///
/// * `u8`: target system ID
/// * `u8`: target component ID
/// * `char[16]`: parameter name, null-padded
/// * `u8[128]`: parameter value
/// * `u8`: [value type](ParamExtType)
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamExtSet {
    pub target_system: u8,
    pub target_component: u8,
    pub param_id: [u8; PARAM_ID_LENGTH],
    pub param_value: [u8; PARAM_VALUE_LENGTH],
    pub param_type: u8,
}

message_info!(ParamExtSet, 323, 78, 147);

impl ParamExtSet {
    /// Offset of [`param_value`][Self::param_value] within the message body.
    pub const VALUE_OFFSET: usize = 2 + PARAM_ID_LENGTH;

    pub fn new(
        param_id: [u8; PARAM_ID_LENGTH],
        param_value: [u8; PARAM_VALUE_LENGTH],
        param_type: ParamExtType,
    ) -> Self {
        Self {
            target_system: 0,
            target_component: 0,
            param_id,
            param_value,
            param_type: param_type as u8,
        }
    }

    /// Gets the parameter name.
    pub fn name(&self) -> Result<&str> {
        str_from_utf8_null(&self.param_id)
    }

    /// Gets the value type, if it is known.
    pub fn value_type(&self) -> Option<ParamExtType> {
        ParamExtType::from_u8(self.param_type)
    }
}

/// `PARAM_EXT_ACK` (#324): result of a [`ParamExtSet`].
///
/// ## Packet format
///
/// * `char[16]`: parameter name, null-padded
/// * `u8[128]`: parameter value, after the write
/// * `u8`: [value type](ParamExtType)
/// * `u8`: [result](ParamAck)
#[binrw]
#[brw(little)]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParamExtAck {
    pub param_id: [u8; PARAM_ID_LENGTH],
    pub param_value: [u8; PARAM_VALUE_LENGTH],
    pub param_type: u8,
    pub param_result: u8,
}

message_info!(ParamExtAck, 324, 132, 146);

impl ParamExtAck {
    /// Gets the parameter name.
    pub fn name(&self) -> Result<&str> {
        str_from_utf8_null(&self.param_id)
    }

    /// Gets the write result, if it is known.
    pub fn result(&self) -> Option<ParamAck> {
        ParamAck::from_u8(self.param_result)
    }
}
