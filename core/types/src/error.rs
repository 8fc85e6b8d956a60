use thiserror::Error;

pub type Result<T> = std::result::Result<T, DistributorError>;

/// The failure kinds surfaced by the distributor.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum DistributorError {
    /// The request was malformed or refers to something the distributor does not know about.
    #[error("invalid request: {0}")]
    InvalidRequest(String),
    /// The request contradicts a checkpoint that was already accepted.
    #[error("conflict: {0}")]
    Conflict(String),
    #[error("not found: {0}")]
    NotFound(String),
    /// Storage or other transient failure. Safe to retry.
    #[error("internal error: {0}")]
    Internal(String),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorKind {
    InvalidRequest,
    Conflict,
    NotFound,
    Internal,
}

impl DistributorError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::InvalidRequest(_) => ErrorKind::InvalidRequest,
            Self::Conflict(_) => ErrorKind::Conflict,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Internal(_) => ErrorKind::Internal,
        }
    }

    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::Internal
    }
}
