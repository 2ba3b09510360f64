//! Error types and result alias for the crate.
//!
//! [`enum@crate::error::Error`] covers invalid placement or controller
//! configuration. Running out of attempts is not an error: a scatter pass that
//! falls short reports it through [`crate::scatter::planner::PlacementResult`].
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl Error {
    pub(crate) fn invalid(message: impl Into<String>) -> Self {
        Error::InvalidConfig(message.into())
    }
}
