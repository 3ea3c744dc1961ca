// Copyright (c) 2025 - Cowboy AI, Inc.
//! Retry Policy Classification
//!
//! Maps deployment error codes to retry policies. The classifier decides;
//! it never executes a retry. Re-queueing is done by the caller through the
//! deployment status service.
//!
//! # Policies
//!
//! | Policy | Auto retry | Typical cause |
//! |---|---|---|
//! | `NotRetryable` | no | bad input, auth |
//! | `RetryableImmediate` | yes, no delay | nonce conflict |
//! | `RetryableWithDelay` | yes, backed off | timeouts, node/IPFS outages |
//! | `RetryableWithCooldown` | yes, long delay | rate limits, open circuit breaker |
//! | `RetryableAfterRemediation` | no | insufficient funds, KYC |
//! | `RetryableAfterConfiguration` | no | operator misconfiguration |
//!
//! Unrecognized codes never fail closed: they degrade to a backed-off
//! `RetryableWithDelay` with reason `UNKNOWN_ERROR`.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod classifier;
pub mod error_codes;

pub use classifier::RetryPolicyClassifier;
pub use error_codes::ErrorCategory;

/// How a failed operation may be retried
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum RetryPolicy {
    NotRetryable,
    RetryableImmediate,
    RetryableWithDelay,
    RetryableWithCooldown,
    RetryableAfterRemediation,
    RetryableAfterConfiguration,
}

impl RetryPolicy {
    /// Whether this policy permits retries without outside action
    pub fn allows_automatic_retry(&self) -> bool {
        matches!(
            self,
            Self::RetryableImmediate | Self::RetryableWithDelay | Self::RetryableWithCooldown
        )
    }

    /// Attempt cap used when only the policy is known
    pub fn default_max_attempts(&self) -> u32 {
        match self {
            Self::RetryableImmediate => 3,
            Self::RetryableWithDelay => 5,
            Self::RetryableWithCooldown => 3,
            Self::NotRetryable
            | Self::RetryableAfterRemediation
            | Self::RetryableAfterConfiguration => 0,
        }
    }
}

impl fmt::Display for RetryPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}", self)
    }
}

/// Classifier output. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RetryDecision {
    pub policy: RetryPolicy,

    /// `None` or `Some(0)` means "do not auto-retry"
    pub max_retry_attempts: Option<u32>,

    pub suggested_delay_seconds: u64,
    pub use_exponential_backoff: bool,

    /// What a human should do next; never empty
    pub remediation_guidance: String,

    pub reason_code: String,
    pub explanation: String,

    /// Retry window of the classifier that produced this decision
    pub retry_window_secs: u64,
}

impl RetryDecision {
    /// Whether another automatic attempt is permitted under this decision
    pub fn should_retry(&self, attempt_count: u32, first_attempt_time: DateTime<Utc>) -> bool {
        self.should_retry_at(attempt_count, first_attempt_time, Utc::now())
    }

    /// [`RetryDecision::should_retry`] evaluated at a fixed `now`
    pub fn should_retry_at(
        &self,
        attempt_count: u32,
        first_attempt_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        self.policy.allows_automatic_retry()
            && attempt_count < self.max_retry_attempts.unwrap_or(0)
            && classifier::within_window(
                std::time::Duration::from_secs(self.retry_window_secs),
                first_attempt_time,
                now,
            )
    }

    /// Delay before attempt number `attempt_count`, honoring this decision's backoff flag
    pub fn next_delay(&self, attempt_count: u32) -> u64 {
        calculate_retry_delay(self.policy, attempt_count, self.use_exponential_backoff)
    }
}

/// Classify an error code, falling back to `category` for unrecognized codes
pub fn classify_error(error_code: &str, category: Option<ErrorCategory>) -> RetryDecision {
    RetryPolicyClassifier::default().classify_error(error_code, category)
}

/// Whether an operation under `policy` may be retried again automatically
pub fn should_retry(
    policy: RetryPolicy,
    attempt_count: u32,
    first_attempt_time: DateTime<Utc>,
) -> bool {
    RetryPolicyClassifier::default().should_retry(policy, attempt_count, first_attempt_time)
}

/// Delay in seconds before the next attempt
pub fn calculate_retry_delay(
    policy: RetryPolicy,
    attempt_count: u32,
    use_exponential_backoff: bool,
) -> u64 {
    RetryPolicyClassifier::default().calculate_retry_delay(
        policy,
        attempt_count,
        use_exponential_backoff,
    )
}
