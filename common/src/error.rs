use thiserror::Error;

/// Errors found while looking for or loading configuration files.
///
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Bad config file version v{0}, need v{1}")]
    BadFileVersion(usize, usize),
    #[error("Unknown config file {0} and no default in {1}")]
    MissingConfig(String, String),
    #[error("No HOME or LOCALAPPDATA variable defined, can not continue")]
    NoHome,
    #[error("Bad locations file version v{0}, need v{1}")]
    BadLocationsVersion(usize, usize),
    #[error("Invalid configuration: {0}")]
    Invalid(String),
}
