//! Error types for fatsim
//!
//! Provides a unified error type for all operations.

use thiserror::Error;

/// Result type alias using FatError
pub type Result<T> = std::result::Result<T, FatError>;

/// Unified error type for fatsim operations
#[derive(Debug, Error)]
pub enum FatError {
    // -------------------------------------------------------------------------
    // I/O Errors
    // -------------------------------------------------------------------------
    #[error("Storage I/O error: {0}")]
    StorageIo(#[from] std::io::Error),

    // -------------------------------------------------------------------------
    // Directory Errors
    // -------------------------------------------------------------------------
    #[error("File not found: {0}")]
    NotFound(String),

    #[error("File already exists: {0}")]
    AlreadyExists(String),

    // -------------------------------------------------------------------------
    // Chain Errors
    // -------------------------------------------------------------------------
    #[error("Corrupt fragment chain: {0}")]
    CorruptChain(String),

    // -------------------------------------------------------------------------
    // Input Errors
    // -------------------------------------------------------------------------
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    // -------------------------------------------------------------------------
    // Serialization Errors
    // -------------------------------------------------------------------------
    #[error("Serialization error: {0}")]
    Serialization(String),

    // -------------------------------------------------------------------------
    // Configuration Errors
    // -------------------------------------------------------------------------
    #[error("Configuration error: {0}")]
    Config(String),
}

impl FatError {
    /// True for errors caused by the caller's request rather than by storage state
    pub fn is_user_error(&self) -> bool {
        matches!(
            self,
            FatError::NotFound(_) | FatError::AlreadyExists(_) | FatError::InvalidInput(_)
        )
    }
}
