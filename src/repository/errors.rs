use thiserror::Error;

#[derive(Debug, Error)]
pub enum RepositoryError {
    #[error("database error: {0}")]
    DatabaseError(#[from] diesel::result::Error),
    #[error("connection pool error: {0}")]
    PoolError(#[from] diesel::r2d2::PoolError),
    #[error("validation error: {0}")]
    ValidationError(String),
    #[error("unexpected error: {0}")]
    Unexpected(String),
}

pub type RepositoryResult<T> = Result<T, RepositoryError>;
