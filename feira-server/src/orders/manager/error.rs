use crate::db::repository::RepoError;
use crate::utils::AppError;
use thiserror::Error;

/// Lifecycle manager errors
///
/// Every operation returns one of exactly four outcomes besides success:
/// bad input (before any store call), a failed guard (another actor got
/// there first — refresh and re-evaluate, never auto-retry), a missing or
/// invisible entity, or a store failure with no partial write committed.
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Validation failed: {0}")]
    Validation(String),

    #[error("Conflict: {0}")]
    Conflict(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Transient store error: {0}")]
    Transient(String),
}

impl From<RepoError> for OrderError {
    fn from(err: RepoError) -> Self {
        match err {
            RepoError::NotFound(msg) => OrderError::NotFound(msg),
            RepoError::Conflict(msg) => OrderError::Conflict(msg),
            RepoError::Database(msg) => OrderError::Transient(msg),
        }
    }
}

impl From<sqlx::Error> for OrderError {
    fn from(err: sqlx::Error) -> Self {
        OrderError::Transient(err.to_string())
    }
}

impl From<OrderError> for AppError {
    fn from(err: OrderError) -> Self {
        match err {
            OrderError::Validation(msg) => AppError::Validation(msg),
            OrderError::Conflict(msg) => AppError::Conflict(msg),
            OrderError::NotFound(msg) => AppError::NotFound(msg),
            OrderError::Transient(msg) => AppError::Database(msg),
        }
    }
}

pub type OrderResult<T> = Result<T, OrderError>;
