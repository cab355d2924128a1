#![doc = include_str!("../README.md")]

#[macro_use]
extern crate tracing;

pub mod builders;
pub mod codec;
mod config;
mod device;
mod dispatch;
mod error;
mod heartbeat;
mod inbound;
mod params;
mod responder;
mod udp;

pub use {
    crate::{
        config::{ResponderConfig, ResponderTiming},
        device::{DeviceControl, MemoryDeviceControl},
        dispatch::Dispatcher,
        error::Error,
        heartbeat::HeartbeatTick,
        inbound::{InboundMessage, Requester},
        params::{
            parse_definitions, ParamType, ParameterDefinition, ParameterSource, ParameterStore,
            ParameterTable, TomlFile,
        },
        responder::{HandshakeOutcome, Responder, ResponderHandle, StopHandle},
        udp::MavUdpChannel,
    },
    mavcam_protocol as protocol,
};
pub type Result<T = ()> = std::result::Result<T, Error>;
