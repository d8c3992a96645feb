//! Error kinds surfaced by the service core.

use chirpy_crypto::CredentialError;
use chirpy_db::StoreError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Authentication required")]
    Unauthorized,

    #[error("Invalid or expired token")]
    InvalidToken,

    #[error("Not allowed to modify this resource")]
    Forbidden,

    #[error("Resource not found")]
    NotFound,

    #[error("Invalid request: {0}")]
    BadRequest(String),

    #[error("Persistence error: {0}")]
    Persistence(String),

    #[error("Stored password hash is malformed")]
    InvalidHash,

    #[error("Internal error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    /// Conventional HTTP status for this kind.
    pub fn status_code(&self) -> u16 {
        match self {
            ApiError::Unauthorized | ApiError::InvalidToken => 401,
            ApiError::Forbidden => 403,
            ApiError::NotFound => 404,
            ApiError::BadRequest(_) => 400,
            ApiError::Persistence(_) | ApiError::InvalidHash | ApiError::Internal(_) => 500,
        }
    }
}

impl From<StoreError> for ApiError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::NotFound => ApiError::NotFound,
            StoreError::Forbidden => ApiError::Forbidden,
            StoreError::Persistence(e) => {
                tracing::error!(error = %e, "Persistence error");
                ApiError::Persistence(e.to_string())
            }
            StoreError::Credential(CredentialError::InvalidHash(msg)) => {
                tracing::error!(error = %msg, "Corrupt password hash");
                ApiError::InvalidHash
            }
            StoreError::Credential(CredentialError::Hashing(msg)) => {
                ApiError::Internal(anyhow::anyhow!("password hashing failed: {}", msg))
            }
            StoreError::LockPoisoned => ApiError::Internal(anyhow::anyhow!("store lock poisoned")),
        }
    }
}

pub type Result<T> = std::result::Result<T, ApiError>;
