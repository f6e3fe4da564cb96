use thiserror::Error;

/// Errors found while decoding a single state vector.
///
#[derive(Debug, Error, PartialEq)]
pub enum FormatError {
    #[error("State vector too short ({0} fields)")]
    ShortVector(usize),
    #[error("Bad or missing field {0}")]
    BadField(&'static str),
}
