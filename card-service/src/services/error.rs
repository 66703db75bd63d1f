use service_core::error::AppError;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum ServiceError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),

    #[error("Missing credentials")]
    MissingCredentials,

    #[error("Invalid credentials")]
    InvalidCredentials,

    #[error("Missing required role: {0}")]
    MissingRole(String),

    /// Covers both "no such card" and "card owned by someone else".
    #[error("Card not found")]
    CardNotFound,
}

impl From<ServiceError> for AppError {
    fn from(err: ServiceError) -> Self {
        match err {
            ServiceError::Database(e) => AppError::DatabaseError(e.into()),
            ServiceError::Internal(e) => AppError::InternalError(e),
            ServiceError::MissingCredentials => {
                AppError::Unauthenticated(anyhow::anyhow!("Missing credentials"))
            }
            ServiceError::InvalidCredentials => {
                AppError::Unauthenticated(anyhow::anyhow!("Invalid credentials"))
            }
            ServiceError::MissingRole(role) => {
                AppError::Forbidden(anyhow::anyhow!("Missing required role: {}", role))
            }
            ServiceError::CardNotFound => AppError::NotFound(anyhow::anyhow!("Card not found")),
        }
    }
}
