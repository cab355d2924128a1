#![doc = include_str!("../README.md")]

#[macro_use]
extern crate bitflags;

#[macro_use]
extern crate num_derive;

#[macro_use]
extern crate tracing;

mod error;
mod frame;
pub mod message;

pub use crate::{
    error::Error,
    frame::{checksum, crc_accumulate, IncompatFlags, MavFrame},
    message::{Message, MessageInfo},
};

/// Result type.
pub type Result<T = ()> = std::result::Result<T, Error>;
