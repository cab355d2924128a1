use std::io::Error as IoError;
use thiserror::Error;

/// Error types
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(test)]
    #[error(transparent)]
    FromHexError(#[from] hex::FromHexError),

    #[error(transparent)]
    IoError(#[from] IoError),

    #[error(transparent)]
    Protocol(#[from] crate::protocol::Error),

    #[error("data parse error: {0}")]
    BinRwError(#[from] binrw::Error),

    #[error("invalid configuration: {0}")]
    Config(String),

    #[error("parameter definition error: {0}")]
    Definition(#[from] toml::de::Error),

    #[error("unsupported parameter type: {0:?}")]
    UnsupportedParameterType(String),

    #[error("unknown parameter: {0:?}")]
    UnknownParameter(String),

    #[error("parameter out of valid range")]
    ParameterOutOfRange,

    #[error("device control error: {0}")]
    Device(String),

    #[error("channel unavailable, likely dropped")]
    ChannelUnavailable,

    #[error("internal error")]
    Internal,
}
