use thiserror::Error;

/// Errors returned by `frequency-estimator`
#[derive(Debug, Error)]
pub enum Error {
    /// A construction parameter lies outside of its accepted range
    #[error("invalid parameter {name} = {value}: expected {expected}")]
    InvalidParameter {
        name: &'static str,
        value: String,
        expected: &'static str,
    },
    /// Counter table for valid parameters cannot be allocated
    #[error("counter table of {depth} x {width} cells does not fit in memory")]
    TableTooLarge { width: usize, depth: usize },
    /// Item could not be encoded into its canonical form
    #[error("failed to canonicalize item: {0}")]
    Canonicalization(#[source] Box<dyn std::error::Error + Send + Sync>),
}

impl Error {
    pub(crate) fn invalid_parameter(
        name: &'static str,
        value: impl ToString,
        expected: &'static str,
    ) -> Self {
        Error::InvalidParameter {
            name,
            value: value.to_string(),
            expected,
        }
    }
}

/// Result type used throughout the crate
pub type Result<T> = std::result::Result<T, Error>;
