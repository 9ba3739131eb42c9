//! Fatal error types for projection runs
//!
//! Recoverable conditions are not errors; they are collected as
//! [`Warning`](crate::projection::Warning) diagnostics on the result.

use thiserror::Error;

/// Fatal projection errors — no partial result is produced
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ProjectionError {
    /// Input failed validation before any computation started
    #[error("invalid input: {0}")]
    Validation(String),

    /// Input referenced rate-table data that is missing or unusable
    #[error("bad rate data: {0}")]
    Data(String),
}

impl ProjectionError {
    pub fn validation(msg: impl Into<String>) -> Self {
        ProjectionError::Validation(msg.into())
    }

    pub fn data(msg: impl Into<String>) -> Self {
        ProjectionError::Data(msg.into())
    }
}
