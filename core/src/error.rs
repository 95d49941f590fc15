use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Failures raised by the containers and analyzers. Every variant is reported at the call
/// that violated the precondition and leaves the receiver unchanged.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum Error {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("key not found")]
    KeyNotFound,

    #[error("container is empty")]
    EmptyContainer,
}

impl Error {
    pub(crate) fn invalid(msg: impl Into<String>) -> Self {
        Error::InvalidArgument(msg.into())
    }
}
