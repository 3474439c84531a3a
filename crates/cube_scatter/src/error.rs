//! Error types and result alias for the crate.
//!
//! This module defines [`enum@crate::error::Error`] and the crate-wide [Result] alias. Variants cover
//! rejected scatter requests, failures reported by a [`crate::scatter::scene::SceneBinding`],
//! and generic errors.
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[non_exhaustive]
#[derive(Debug, Error)]
pub enum Error {
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    #[error("scene binding failure: {0}")]
    SceneBinding(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// Wraps any displayable collaborator error as [`Error::SceneBinding`].
    pub fn scene(err: impl std::fmt::Display) -> Self {
        Error::SceneBinding(err.to_string())
    }

    /// Returns `true` for errors raised before any scene mutation took place.
    pub fn is_invalid_request(&self) -> bool {
        matches!(self, Error::InvalidRequest(_))
    }
}

impl From<String> for Error {
    fn from(value: String) -> Self {
        Error::Other(value)
    }
}

impl From<&str> for Error {
    fn from(value: &str) -> Self {
        Error::Other(value.to_owned())
    }
}
