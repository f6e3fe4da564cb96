use thiserror::Error;

use flightwatch_common::ConfigError;

/// Errors from talking to the upstream API.
///
/// All of them are transient as far as the tracker is concerned: we keep the last known
/// positions and try again at the next poll.
///
#[derive(Clone, Debug, Error, PartialEq)]
pub enum FetchError {
    #[error("Rate-limited (retry after {0:?}s)")]
    RateLimited(Option<u64>),
    #[error("HTTP error {0}")]
    Status(u16),
    #[error("Network error: {0}")]
    Network(String),
    #[error("Can not decode answer: {0}")]
    Decode(String),
    #[error("Nothing to replay")]
    Empty,
}

/// Errors from the tracker itself.
///
#[derive(Debug, Error)]
pub enum TrackerError {
    #[error("Can not start tracker: {0}")]
    Spawn(String),
    #[error("Tracker not answering: {0}")]
    Rpc(String),
    #[error("Unknown location {0}")]
    UnknownLocation(String),
    #[error(transparent)]
    Config(#[from] ConfigError),
}
