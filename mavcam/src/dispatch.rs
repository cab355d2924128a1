use crate::{
    builders,
    codec::{decode_scalar, encode_scalar, pad_array},
    config::ResponderConfig,
    device::DeviceControl,
    inbound::{InboundMessage, Requester},
    params::{ParameterDefinition, ParameterStore},
    protocol::message::{
        CommandAck, MavCmd, MavResult, Message, ParamAck, ParamExtAck, ParamExtValue,
        PARAM_VALUE_LENGTH,
    },
    Error, Result,
};
use num_traits::FromPrimitive;

/// Decides how to react to [InboundMessage]s.
///
/// The dispatcher owns the parameter table and the device, so it needs no
/// locking; it does no I/O of its own.
pub struct Dispatcher {
    config: ResponderConfig,
    params: ParameterStore,
    device: Box<dyn DeviceControl>,
}

impl Dispatcher {
    pub fn new(
        config: ResponderConfig,
        params: ParameterStore,
        device: impl DeviceControl + 'static,
    ) -> Self {
        Self {
            config,
            params,
            device: Box::new(device),
        }
    }

    pub fn config(&self) -> &ResponderConfig {
        &self.config
    }

    /// Reacts to a message, returning the messages to send back in order.
    ///
    /// This never fails: problems are logged, and answered with a NAK where
    /// the protocol has one.
    pub fn react(&mut self, inbound: InboundMessage) -> Vec<Message> {
        match inbound {
            InboundMessage::Command { command, requester } => self.command(command, requester),

            InboundMessage::ParameterRead {
                name,
                index,
                requester,
            } => {
                debug!("PARAM_EXT_REQUEST_READ {name:?} (index {index:?}) from {requester}");
                match self.read_parameter(&name, index) {
                    Ok(value) => vec![value.into()],
                    Err(e) => {
                        warn!("cannot read parameter {name:?}: {e}");
                        vec![self.nak(&name, &e).into()]
                    }
                }
            }

            InboundMessage::ParameterList { requester } => {
                debug!("PARAM_EXT_REQUEST_LIST from {requester}");
                match self.list_parameters() {
                    Ok(values) => values.into_iter().map(Message::from).collect(),
                    Err(e) => {
                        warn!("cannot list parameters: {e}");
                        Vec::new()
                    }
                }
            }

            InboundMessage::ParameterSet {
                name,
                value,
                requester,
            } => {
                debug!("PARAM_EXT_SET {name:?} from {requester}");
                match self.set_parameter(&name, &value) {
                    Ok(ack) => vec![ack.into()],
                    Err(e) => {
                        warn!("cannot set parameter {name:?}: {e}");
                        vec![self.nak(&name, &e).into()]
                    }
                }
            }

            InboundMessage::Ignored { message_id } => {
                trace!("ignoring message {message_id}");
                Vec::new()
            }
        }
    }

    /// Acknowledges a command, followed by its response (if any).
    ///
    /// Unknown and unimplemented commands get no acknowledgement at all.
    fn command(&self, command: u16, requester: Requester) -> Vec<Message> {
        let Some(cmd) = MavCmd::from_u16(command) else {
            debug!("unknown command {command} from {requester}");
            return Vec::new();
        };

        let (result, response): (MavResult, Option<Message>) = match cmd {
            MavCmd::RequestCameraInformation => (
                MavResult::Accepted,
                Some(builders::camera_information(&self.config).into()),
            ),
            MavCmd::RequestVideoStreamInformation => (
                MavResult::Accepted,
                Some(builders::video_stream_information(&self.config).into()),
            ),
            MavCmd::RequestCameraSettings => (
                MavResult::Accepted,
                Some(builders::camera_settings(&self.config).into()),
            ),
            MavCmd::RequestVideoStreamStatus => (
                MavResult::Accepted,
                Some(builders::video_stream_status(&self.config).into()),
            ),
            // Accepted, but the camera has no zoom or storage to act on.
            MavCmd::SetCameraZoom | MavCmd::RequestStorageInformation => {
                (MavResult::Accepted, None)
            }
            MavCmd::RequestCameraCaptureStatus => (MavResult::Unsupported, None),
            MavCmd::SetCameraFocus
            | MavCmd::RequestVideoStartStreaming
            | MavCmd::RequestVideoStopStreaming => {
                debug!("unhandled command {cmd:?} from {requester}");
                return Vec::new();
            }
        };

        debug!("{cmd:?} from {requester}: {result:?}");
        let ack = CommandAck::new(
            command,
            result,
            requester.system_id,
            requester.component_id,
        );
        std::iter::once(Message::from(ack))
            .chain(response)
            .collect()
    }

    /// Reads a parameter by `index` if set, otherwise by `name`.
    fn read_parameter(&mut self, name: &str, index: Option<u16>) -> Result<ParamExtValue> {
        let table = self.params.load_once()?;
        let (index, definition) = match index {
            Some(i) => {
                let i = usize::from(i);
                let definition = table
                    .iter()
                    .nth(i)
                    .ok_or_else(|| Error::UnknownParameter(format!("#{i}")))?;
                (i, definition)
            }
            None => {
                let definition = table
                    .get(name)
                    .ok_or_else(|| Error::UnknownParameter(name.to_string()))?;
                (table.index_of(name).ok_or(Error::Internal)?, definition)
            }
        };
        value_message(self.device.as_ref(), definition, index, table.len())
    }

    /// Reads every parameter, in name order.
    ///
    /// Parameters which can't be read are left out.
    fn list_parameters(&mut self) -> Result<Vec<ParamExtValue>> {
        let table = self.params.load_once()?;
        let count = table.len();
        let mut values = Vec::with_capacity(count);
        for (index, definition) in table.iter().enumerate() {
            match value_message(self.device.as_ref(), definition, index, count) {
                Ok(v) => values.push(v),
                Err(e) => warn!("cannot read parameter {:?}: {e}", definition.name),
            }
        }
        Ok(values)
    }

    /// Writes a parameter, and acknowledges with the value the device ended
    /// up with.
    fn set_parameter(
        &mut self,
        name: &str,
        value: &[u8; PARAM_VALUE_LENGTH],
    ) -> Result<ParamExtAck> {
        let table = self.params.load_once()?;
        let definition = table
            .get(name)
            .ok_or_else(|| Error::UnknownParameter(name.to_string()))?;

        let requested = decode_scalar(value, definition.typ)?;
        debug!("setting {name:?} ({}) to {requested}", definition.typ);
        self.device.set_value(definition.device_id, requested)?;
        let actual = self.device.get_value(definition.device_id)?;
        if actual != requested {
            debug!("device adjusted {name:?} to {actual}");
        }

        Ok(ParamExtAck {
            param_id: pad_array(name),
            param_value: encode_scalar(actual, definition.typ)?,
            param_type: definition.typ.mav_type() as u8,
            param_result: ParamAck::Accepted as u8,
        })
    }

    /// Makes a negative [ParamExtAck] for a failed read or write.
    ///
    /// The value is all zeros, and the type is 0 (unknown) unless the
    /// parameter is defined.
    fn nak(&self, name: &str, error: &Error) -> ParamExtAck {
        let param_result = match error {
            Error::ParameterOutOfRange => ParamAck::ValueUnsupported,
            _ => ParamAck::Failed,
        };

        // Only looks at an already-loaded table; a failed load is not retried
        // here.
        let param_type = self
            .params
            .loaded()
            .and_then(|t| t.get(name))
            .map_or(0, |d| d.typ.mav_type() as u8);

        ParamExtAck {
            param_id: pad_array(name),
            param_value: [0; PARAM_VALUE_LENGTH],
            param_type,
            param_result: param_result as u8,
        }
    }
}

fn value_message(
    device: &dyn DeviceControl,
    definition: &ParameterDefinition,
    index: usize,
    count: usize,
) -> Result<ParamExtValue> {
    let value = device.get_value(definition.device_id)?;
    Ok(ParamExtValue {
        param_count: u16::try_from(count).map_err(|_| Error::ParameterOutOfRange)?,
        param_index: u16::try_from(index).map_err(|_| Error::ParameterOutOfRange)?,
        param_id: pad_array(&definition.name),
        param_value: encode_scalar(value, definition.typ)?,
        param_type: definition.typ.mav_type() as u8,
    })
}
