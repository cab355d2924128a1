use crate::{
    protocol::{
        message::{Message, PARAM_VALUE_LENGTH},
        MavFrame,
    },
    Result,
};
use std::fmt::Display;

/// Sender of an inbound message, from its frame headers.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Requester {
    pub system_id: u8,
    pub component_id: u8,
}

impl From<&MavFrame> for Requester {
    fn from(frame: &MavFrame) -> Self {
        Self {
            system_id: frame.system_id,
            component_id: frame.component_id,
        }
    }
}

impl Display for Requester {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}/{}", self.system_id, self.component_id)
    }
}

/// Messages the responder reacts to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InboundMessage {
    /// `COMMAND_LONG`
    Command { command: u16, requester: Requester },

    /// `PARAM_EXT_REQUEST_READ`
    ///
    /// When `index` is set, `name` is ignored.
    ParameterRead {
        name: String,
        index: Option<u16>,
        requester: Requester,
    },

    /// `PARAM_EXT_REQUEST_LIST`
    ParameterList { requester: Requester },

    /// `PARAM_EXT_SET`
    ParameterSet {
        name: String,
        value: [u8; PARAM_VALUE_LENGTH],
        requester: Requester,
    },

    /// Anything else, including messages with unknown IDs.
    Ignored { message_id: u32 },
}

impl InboundMessage {
    /// Decodes and classifies the message in a frame.
    ///
    /// ## Errors
    ///
    /// * [`Error::Protocol`][crate::Error::Protocol] when the frame has a bad
    ///   checksum, or a parameter name isn't valid UTF-8
    /// * [`Error::BinRwError`][crate::Error::BinRwError] when the message
    ///   can't be parsed
    pub fn classify(frame: &MavFrame) -> Result<Self> {
        let requester = Requester::from(frame);
        Ok(match frame.message()? {
            Message::CommandLong(c) => Self::Command {
                command: c.command,
                requester,
            },
            Message::ParamExtRequestRead(r) => Self::ParameterRead {
                name: r.name()?.to_string(),
                // -1 selects by name.
                index: u16::try_from(r.param_index).ok(),
                requester,
            },
            Message::ParamExtRequestList(_) => Self::ParameterList { requester },
            Message::ParamExtSet(s) => Self::ParameterSet {
                name: s.name()?.to_string(),
                value: s.param_value,
                requester,
            },
            m => Self::Ignored {
                message_id: m.id(),
            },
        })
    }
}
