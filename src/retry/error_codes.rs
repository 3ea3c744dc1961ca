// Copyright (c) 2025 - Cowboy AI, Inc.
//! Error codes reported by the deployment pipeline and their categories

use serde::{Deserialize, Serialize};
use std::fmt;

// Validation / bad input
pub const INVALID_REQUEST: &str = "INVALID_REQUEST";
pub const MISSING_REQUIRED_FIELD: &str = "MISSING_REQUIRED_FIELD";
pub const INVALID_NETWORK: &str = "INVALID_NETWORK";
pub const INVALID_TOKEN_PARAMETERS: &str = "INVALID_TOKEN_PARAMETERS";
pub const METADATA_VALIDATION_FAILED: &str = "METADATA_VALIDATION_FAILED";
pub const UNAUTHORIZED: &str = "UNAUTHORIZED";
pub const FORBIDDEN: &str = "FORBIDDEN";
pub const NOT_FOUND: &str = "NOT_FOUND";
pub const ALREADY_EXISTS: &str = "ALREADY_EXISTS";

// Connectivity / transient upstream failures
pub const NETWORK_ERROR: &str = "NETWORK_ERROR";
pub const BLOCKCHAIN_CONNECTION_ERROR: &str = "BLOCKCHAIN_CONNECTION_ERROR";
pub const TIMEOUT: &str = "TIMEOUT";
pub const EXTERNAL_SERVICE_ERROR: &str = "EXTERNAL_SERVICE_ERROR";
pub const IPFS_SERVICE_ERROR: &str = "IPFS_SERVICE_ERROR";
pub const TRANSACTION_FAILED: &str = "TRANSACTION_FAILED";
pub const NONCE_CONFLICT: &str = "NONCE_CONFLICT";
pub const INTERNAL_SERVER_ERROR: &str = "INTERNAL_SERVER_ERROR";

// Throttling
pub const CIRCUIT_BREAKER_OPEN: &str = "CIRCUIT_BREAKER_OPEN";
pub const RATE_LIMIT_EXCEEDED: &str = "RATE_LIMIT_EXCEEDED";

// Needs a human first
pub const INSUFFICIENT_FUNDS: &str = "INSUFFICIENT_FUNDS";
pub const KYC_REQUIRED: &str = "KYC_REQUIRED";
pub const KYC_NOT_VERIFIED: &str = "KYC_NOT_VERIFIED";
pub const SUBSCRIPTION_LIMIT_EXCEEDED: &str = "SUBSCRIPTION_LIMIT_EXCEEDED";

// Operator configuration
pub const CONFIGURATION_ERROR: &str = "CONFIGURATION_ERROR";
pub const MISSING_CONFIGURATION: &str = "MISSING_CONFIGURATION";

/// Reason code used when an error cannot be classified
pub const UNKNOWN_ERROR: &str = "UNKNOWN_ERROR";

/// Broad error family, used when the code itself is unrecognized
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ErrorCategory {
    Validation,
    Authentication,
    NetworkError,
    Timeout,
    ExternalService,
    Blockchain,
    RateLimit,
    InsufficientFunds,
    Compliance,
    Subscription,
    Configuration,
    Internal,
}

impl fmt::Display for ErrorCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}
