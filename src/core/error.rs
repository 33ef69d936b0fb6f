use std::io;

use targets_protocol::KeyError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("Encoding error: {0}")]
    Encode(String),

    #[error("Decoding error: {0}")]
    Decode(#[from] serde_json::Error),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("Broker stored under {key:?} identifies as {found:?}")]
    BrokerMismatch { key: String, found: String },

    #[error("Broker {0:?} appears more than once")]
    DuplicateBroker(String),

    #[error("Key error: {0}")]
    Key(#[from] KeyError),
}
