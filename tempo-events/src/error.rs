use thiserror::Error;

use crate::domain::UserEventId;

/// Failure talking to the events backend.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum GatewayError {
    #[error("network error: {0}")]
    Network(String),
    #[error("server responded with status {status}")]
    Server { status: u16 },
    #[error("parsing error: {0}")]
    Parsing(String),
}

impl GatewayError {
    pub fn network(msg: impl Into<String>) -> Self {
        Self::Network(msg.into())
    }

    pub fn parsing(msg: impl Into<String>) -> Self {
        Self::Parsing(msg.into())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    #[error(transparent)]
    Gateway(#[from] GatewayError),
    #[error("event {0} is not in the store")]
    UnknownEvent(UserEventId),
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecorderError {
    #[error("recorder already running")]
    AlreadyRunning,
    #[error("recorder not running")]
    NotRunning,
    #[error(transparent)]
    Store(#[from] StoreError),
}
