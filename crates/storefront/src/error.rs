//! Unified error handling.
//!
//! Provides a unified `AppError` type for front ends driving the cart store.
//! Cart mutations themselves never fail; these errors come from configuration,
//! explicit persistence calls and argument validation.

use thiserror::Error;

use crate::cart::CartPersistError;
use crate::config::ConfigError;
use crate::storage::StorageError;

/// Application-level error type for the storefront.
#[derive(Debug, Error)]
pub enum AppError {
    /// Configuration could not be loaded.
    #[error("Configuration error: {0}")]
    Config(#[from] ConfigError),

    /// Storage backend failed.
    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    /// Explicit save or forget failed.
    #[error("Persistence error: {0}")]
    Persist(#[from] CartPersistError),

    /// Bad input from the caller.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// Internal error.
    #[error("Internal error: {0}")]
    Internal(String),
}

impl AppError {
    /// Process exit code for this error.
    #[must_use]
    pub const fn exit_code(&self) -> i32 {
        match self {
            Self::BadRequest(_) => 2,
            Self::Config(_) => 78,
            Self::Storage(_) | Self::Persist(_) | Self::Internal(_) => 1,
        }
    }
}

/// Result type alias for `AppError`.
pub type Result<T> = std::result::Result<T, AppError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_codes() {
        assert_eq!(AppError::BadRequest("x".into()).exit_code(), 2);
        assert_eq!(
            AppError::Config(ConfigError::InvalidEnvVar("K".into(), "v".into())).exit_code(),
            78
        );
        assert_eq!(AppError::Internal("x".into()).exit_code(), 1);
    }

    #[test]
    fn test_display_wraps_source() {
        let err = AppError::from(StorageError::InvalidKey("../x".into()));
        assert!(err.to_string().starts_with("Storage error: invalid storage key"));
    }
}
