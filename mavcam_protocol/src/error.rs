use std::str::Utf8Error;
use thiserror::Error;

/// Error types.
#[derive(Debug, Error)]
pub enum Error {
    #[cfg(test)]
    #[error(transparent)]
    FromHexError(#[from] hex::FromHexError),

    #[error(transparent)]
    Utf8(#[from] Utf8Error),

    #[error("invalid length")]
    InvalidLength,

    #[error("unknown message {0}")]
    UnknownMessage(u32),

    #[error("checksum mismatch for message {message_id}: expected {expected:#06x}, got {actual:#06x}")]
    ChecksumMismatch {
        message_id: u32,
        expected: u16,
        actual: u16,
    },

    #[error("data parse error: {0}")]
    BinRwError(#[from] binrw::Error),
}
