use thiserror::Error;

/// Errors returned by profile operations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProfileError {
    #[error("User id must be numeric: {0}")]
    InvalidUserId(String),

    #[error("Website must be an http(s) URL: {0}")]
    InvalidWebsite(String),
}
