// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error types for infrastructure faults
//!
//! These cover conditions the orchestration core cannot recover from on its
//! own: an unreachable store, a broken NATS connection, bad configuration.
//! Business-rule rejections are not errors and never show up here.

use thiserror::Error;

/// Errors that can occur in infrastructure operations
#[derive(Debug, Error)]
pub enum InfrastructureError {
    /// NATS connection error
    #[error("NATS connection error: {0}")]
    NatsConnection(String),

    /// NATS publish error
    #[error("NATS publish error: {0}")]
    NatsPublish(String),

    /// NATS subscribe error
    #[error("NATS subscribe error: {0}")]
    NatsSubscribe(String),

    /// Serialization error
    #[error("Serialization error: {0}")]
    Serialization(String),

    /// Configuration error
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Record store could not be reached or refused the operation
    #[error("Store unavailable: {0}")]
    StoreUnavailable(String),

    /// Record store contents are inconsistent (history and record diverged)
    #[error("Store inconsistency: {0}")]
    StoreInconsistency(String),
}

/// Result type for infrastructure operations
pub type InfrastructureResult<T> = Result<T, InfrastructureError>;

impl From<serde_json::Error> for InfrastructureError {
    fn from(err: serde_json::Error) -> Self {
        InfrastructureError::Serialization(err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serde_error_maps_to_serialization() {
        let err: InfrastructureError = serde_json::from_str::<u32>("not json")
            .unwrap_err()
            .into();
        assert!(matches!(err, InfrastructureError::Serialization(_)));
    }
}
