use crate::domain::payment_request::{ParticipantId, RequestId};
use thiserror::Error;

pub type Result<T> = std::result::Result<T, SplitPayError>;

#[derive(Error, Debug)]
pub enum SplitPayError {
    #[error("Validation error: {0}")]
    ValidationError(String),
    #[error("Invalid state: {entity} is '{actual}', cannot {operation}")]
    InvalidState {
        entity: String,
        actual: String,
        operation: &'static str,
    },
    #[error("Payment request not found: {0}")]
    RequestNotFound(RequestId),
    #[error("Participant {participant} not found in payment request {request}")]
    ParticipantNotFound {
        request: RequestId,
        participant: ParticipantId,
    },
    #[error(
        "Concurrent update on payment request {request}: expected version {expected}, found {found}"
    )]
    ConcurrencyConflict {
        request: RequestId,
        expected: u64,
        found: u64,
    },
    #[error("CSV error: {0}")]
    CsvError(#[from] csv::Error),
    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Serialization error: {0}")]
    SerializationError(#[from] serde_json::Error),
    #[cfg(feature = "storage-rocksdb")]
    #[error("Storage error: {0}")]
    StorageError(#[from] rocksdb::Error),
    #[error("Internal error: {0}")]
    InternalError(Box<dyn std::error::Error + Send + Sync>),
}

/// Coarse classification of failures, independent of where they were raised.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    InvalidState,
    NotFound,
    ConcurrencyConflict,
    Internal,
}

impl SplitPayError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::ValidationError(_) => ErrorKind::Validation,
            Self::InvalidState { .. } => ErrorKind::InvalidState,
            Self::RequestNotFound(_) | Self::ParticipantNotFound { .. } => ErrorKind::NotFound,
            Self::ConcurrencyConflict { .. } => ErrorKind::ConcurrencyConflict,
            _ => ErrorKind::Internal,
        }
    }

    /// Only a lost optimistic-concurrency race may be retried locally.
    pub fn is_retryable(&self) -> bool {
        self.kind() == ErrorKind::ConcurrencyConflict
    }

    pub(crate) fn validation(message: impl Into<String>) -> Self {
        Self::ValidationError(message.into())
    }
}
