// Copyright (c) 2025 - Cowboy AI, Inc.
//! Retry policy classifier
//!
//! Deterministic lookup from error code to [`RetryDecision`]. Timing comes
//! from [`RetryConfig`]:
//!
//! - plain delay: `base_delay_secs` (5s)
//! - cooldown: `cooldown_delay_secs` (60s)
//! - backoff: `base * 2^attempt`, capped at `max_delay_secs` (300s)
//! - window: `retry_window` (10 min) from the first attempt

use chrono::{DateTime, Utc};
use std::time::Duration;
use tracing::debug;

use super::error_codes::{self as codes, ErrorCategory};
use super::{RetryDecision, RetryPolicy};
use crate::config::RetryConfig;

/// Error family a code resolves to
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Family {
    Validation,
    Authorization,
    Transient,
    Resubmit,
    Throttled,
    InsufficientFunds,
    Compliance,
    Subscription,
    Configuration,
}

/// Classifies errors into retry policies and computes retry timing
#[derive(Debug, Clone, Default)]
pub struct RetryPolicyClassifier {
    config: RetryConfig,
}

impl RetryPolicyClassifier {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    pub fn config(&self) -> &RetryConfig {
        &self.config
    }

    /// Classify an error code.
    ///
    /// Matching is case-insensitive. When the code is unrecognized the
    /// category decides; with neither, the result is a backed-off
    /// `RetryableWithDelay` carrying `UNKNOWN_ERROR`.
    pub fn classify_error(&self, error_code: &str, category: Option<ErrorCategory>) -> RetryDecision {
        let code = error_code.trim().to_ascii_uppercase();

        let decision = match (family_for_code(&code), category) {
            (Some(family), _) => self.decision_for(family, code.clone()),
            (None, Some(category)) => {
                self.decision_for(family_for_category(category), category_reason_code(category))
            }
            (None, None) => self.unknown(&code),
        };

        debug!(
            error_code = %code,
            policy = %decision.policy,
            reason_code = %decision.reason_code,
            "classified deployment error"
        );
        decision
    }

    /// Whether an operation under `policy` may be retried again.
    ///
    /// Both the attempt cap and the retry window must allow it.
    pub fn should_retry(
        &self,
        policy: RetryPolicy,
        attempt_count: u32,
        first_attempt_time: DateTime<Utc>,
    ) -> bool {
        self.should_retry_at(policy, attempt_count, first_attempt_time, Utc::now())
    }

    /// [`RetryPolicyClassifier::should_retry`] evaluated at a fixed `now`
    pub fn should_retry_at(
        &self,
        policy: RetryPolicy,
        attempt_count: u32,
        first_attempt_time: DateTime<Utc>,
        now: DateTime<Utc>,
    ) -> bool {
        policy.allows_automatic_retry()
            && attempt_count < policy.default_max_attempts()
            && self.within_retry_window(first_attempt_time, now)
    }

    /// Whether `now` is still inside the retry window opened at `first_attempt_time`
    pub fn within_retry_window(&self, first_attempt_time: DateTime<Utc>, now: DateTime<Utc>) -> bool {
        within_window(self.config.retry_window, first_attempt_time, now)
    }

    /// Delay in seconds before attempt `attempt_count` (0-based).
    pub fn calculate_retry_delay(
        &self,
        policy: RetryPolicy,
        attempt_count: u32,
        use_exponential_backoff: bool,
    ) -> u64 {
        let base = match policy {
            RetryPolicy::RetryableWithDelay => self.config.base_delay_secs,
            RetryPolicy::RetryableWithCooldown => self.config.cooldown_delay_secs,
            RetryPolicy::RetryableImmediate
            | RetryPolicy::NotRetryable
            | RetryPolicy::RetryableAfterRemediation
            | RetryPolicy::RetryableAfterConfiguration => return 0,
        };

        if !use_exponential_backoff {
            return base.min(self.config.max_delay_secs);
        }

        2u64.checked_pow(attempt_count)
            .and_then(|factor| base.checked_mul(factor))
            .map_or(self.config.max_delay_secs, |delay| {
                delay.min(self.config.max_delay_secs)
            })
    }

    fn decision_for(&self, family: Family, reason_code: String) -> RetryDecision {
        let (policy, backoff, guidance, explanation) = match family {
            Family::Validation => (
                RetryPolicy::NotRetryable,
                false,
                "Correct the request parameters and submit a new deployment.",
                "The request was rejected as invalid; the caller must correct the input before trying again.",
            ),
            Family::Authorization => (
                RetryPolicy::NotRetryable,
                false,
                "Check the account's credentials and permissions, then submit a new deployment.",
                "The caller is not permitted to perform this deployment; retrying will not change the outcome.",
            ),
            Family::Transient => (
                RetryPolicy::RetryableWithDelay,
                true,
                "No action needed; the deployment will be retried automatically.",
                "A transient connectivity or upstream failure occurred; retrying after a backed-off delay is safe.",
            ),
            Family::Resubmit => (
                RetryPolicy::RetryableImmediate,
                false,
                "No action needed; the transaction will be rebuilt and resubmitted.",
                "The transaction conflicted with a pending one and can be resubmitted immediately.",
            ),
            Family::Throttled => (
                RetryPolicy::RetryableWithCooldown,
                true,
                "No action needed; the deployment will be retried after a cooldown.",
                "The upstream service is throttling requests; retry only after a cooldown period.",
            ),
            Family::InsufficientFunds => (
                RetryPolicy::RetryableAfterRemediation,
                false,
                "Fund the deployer account with enough native currency to cover fees, then retry.",
                "The deployer account cannot pay for the transaction; a human must add funds first.",
            ),
            Family::Compliance => (
                RetryPolicy::RetryableAfterRemediation,
                false,
                "Complete KYC verification for the account, then retry.",
                "Identity verification is required before tokens can be deployed.",
            ),
            Family::Subscription => (
                RetryPolicy::RetryableAfterRemediation,
                false,
                "Upgrade the subscription plan or wait for the usage period to reset, then retry.",
                "The account has reached its deployment allowance.",
            ),
            Family::Configuration => (
                RetryPolicy::RetryableAfterConfiguration,
                false,
                "Contact support: the deployment service is misconfigured for this network.",
                "A server-side configuration problem prevents deployment; an operator must fix it first.",
            ),
        };

        self.build(policy, backoff, guidance, reason_code, explanation)
    }

    fn unknown(&self, code: &str) -> RetryDecision {
        let explanation = if code.is_empty() {
            "No error code was reported; retrying conservatively with backoff.".to_string()
        } else {
            format!(
                "Error code {} is not recognized; retrying conservatively with backoff.",
                code
            )
        };

        self.build(
            RetryPolicy::RetryableWithDelay,
            true,
            "If the failure persists after automatic retries, contact support with the deployment id.",
            codes::UNKNOWN_ERROR.to_string(),
            &explanation,
        )
    }

    fn build(
        &self,
        policy: RetryPolicy,
        use_exponential_backoff: bool,
        guidance: &str,
        reason_code: String,
        explanation: &str,
    ) -> RetryDecision {
        RetryDecision {
            policy,
            max_retry_attempts: Some(policy.default_max_attempts()),
            suggested_delay_seconds: self.calculate_retry_delay(policy, 0, use_exponential_backoff),
            use_exponential_backoff,
            remediation_guidance: guidance.to_string(),
            reason_code,
            explanation: explanation.to_string(),
            retry_window_secs: self.config.retry_window.as_secs(),
        }
    }
}

pub(crate) fn within_window(
    window: Duration,
    first_attempt_time: DateTime<Utc>,
    now: DateTime<Utc>,
) -> bool {
    match (now - first_attempt_time).to_std() {
        Ok(elapsed) => elapsed < window,
        // first attempt in the future: clock skew, treat as just started
        Err(_) => true,
    }
}

fn family_for_code(code: &str) -> Option<Family> {
    let family = match code {
        codes::INVALID_REQUEST
        | codes::MISSING_REQUIRED_FIELD
        | codes::INVALID_NETWORK
        | codes::INVALID_TOKEN_PARAMETERS
        | codes::METADATA_VALIDATION_FAILED
        | codes::NOT_FOUND
        | codes::ALREADY_EXISTS => Family::Validation,

        codes::UNAUTHORIZED | codes::FORBIDDEN => Family::Authorization,

        codes::NETWORK_ERROR
        | codes::BLOCKCHAIN_CONNECTION_ERROR
        | codes::TIMEOUT
        | codes::EXTERNAL_SERVICE_ERROR
        | codes::IPFS_SERVICE_ERROR
        | codes::TRANSACTION_FAILED
        | codes::INTERNAL_SERVER_ERROR => Family::Transient,

        codes::NONCE_CONFLICT => Family::Resubmit,

        codes::CIRCUIT_BREAKER_OPEN | codes::RATE_LIMIT_EXCEEDED => Family::Throttled,

        codes::INSUFFICIENT_FUNDS => Family::InsufficientFunds,
        codes::KYC_REQUIRED | codes::KYC_NOT_VERIFIED => Family::Compliance,
        codes::SUBSCRIPTION_LIMIT_EXCEEDED => Family::Subscription,

        codes::CONFIGURATION_ERROR | codes::MISSING_CONFIGURATION => Family::Configuration,

        _ => return None,
    };
    Some(family)
}

fn family_for_category(category: ErrorCategory) -> Family {
    match category {
        ErrorCategory::Validation => Family::Validation,
        ErrorCategory::Authentication => Family::Authorization,
        ErrorCategory::NetworkError
        | ErrorCategory::Timeout
        | ErrorCategory::ExternalService
        | ErrorCategory::Blockchain
        | ErrorCategory::Internal => Family::Transient,
        ErrorCategory::RateLimit => Family::Throttled,
        ErrorCategory::InsufficientFunds => Family::InsufficientFunds,
        ErrorCategory::Compliance => Family::Compliance,
        ErrorCategory::Subscription => Family::Subscription,
        ErrorCategory::Configuration => Family::Configuration,
    }
}

fn category_reason_code(category: ErrorCategory) -> String {
    let code = match category {
        ErrorCategory::Validation => "VALIDATION_ERROR",
        ErrorCategory::Authentication => "AUTHENTICATION_ERROR",
        ErrorCategory::NetworkError => codes::NETWORK_ERROR,
        ErrorCategory::Timeout => codes::TIMEOUT,
        ErrorCategory::ExternalService => codes::EXTERNAL_SERVICE_ERROR,
        ErrorCategory::Blockchain => "BLOCKCHAIN_ERROR",
        ErrorCategory::Internal => codes::INTERNAL_SERVER_ERROR,
        ErrorCategory::RateLimit => codes::RATE_LIMIT_EXCEEDED,
        ErrorCategory::InsufficientFunds => codes::INSUFFICIENT_FUNDS,
        ErrorCategory::Compliance => "COMPLIANCE_ERROR",
        ErrorCategory::Subscription => codes::SUBSCRIPTION_LIMIT_EXCEEDED,
        ErrorCategory::Configuration => codes::CONFIGURATION_ERROR,
    };
    code.to_string()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Duration as TimeDelta;

    #[test]
    fn test_code_lookup_is_case_insensitive() {
        let classifier = RetryPolicyClassifier::default();
        let decision = classifier.classify_error(" timeout ", None);
        assert_eq!(decision.policy, RetryPolicy::RetryableWithDelay);
        assert_eq!(decision.reason_code, codes::TIMEOUT);
    }

    #[test]
    fn test_known_code_wins_over_category() {
        let classifier = RetryPolicyClassifier::default();
        let decision =
            classifier.classify_error(codes::INVALID_REQUEST, Some(ErrorCategory::NetworkError));
        assert_eq!(decision.policy, RetryPolicy::NotRetryable);
    }

    #[test]
    fn test_nonce_conflict_is_immediate() {
        let decision = RetryPolicyClassifier::default().classify_error(codes::NONCE_CONFLICT, None);
        assert_eq!(decision.policy, RetryPolicy::RetryableImmediate);
        assert_eq!(decision.suggested_delay_seconds, 0);
    }

    #[test]
    fn test_future_first_attempt_is_within_window() {
        let classifier = RetryPolicyClassifier::default();
        let now = Utc::now();
        assert!(classifier.within_retry_window(now + TimeDelta::seconds(5), now));
    }

    #[test]
    fn test_decision_keeps_classifier_window() {
        let classifier = RetryPolicyClassifier::new(RetryConfig {
            retry_window: Duration::from_secs(60),
            ..RetryConfig::default()
        });
        let decision = classifier.classify_error(codes::TIMEOUT, None);
        let now = Utc::now();
        let first_attempt = now - TimeDelta::minutes(5);

        assert_eq!(decision.retry_window_secs, 60);
        assert!(!classifier.should_retry_at(decision.policy, 0, first_attempt, now));
        assert!(!decision.should_retry_at(0, first_attempt, now));
        assert!(decision.should_retry_at(0, now - TimeDelta::seconds(30), now));
    }

    #[test]
    fn test_huge_attempt_count_saturates_at_cap() {
        let classifier = RetryPolicyClassifier::default();
        assert_eq!(
            classifier.calculate_retry_delay(RetryPolicy::RetryableWithDelay, 200, true),
            300
        );
    }

    #[test]
    fn test_custom_config_changes_timing() {
        let classifier = RetryPolicyClassifier::new(RetryConfig {
            base_delay_secs: 2,
            max_delay_secs: 10,
            ..RetryConfig::default()
        });
        assert_eq!(classifier.calculate_retry_delay(RetryPolicy::RetryableWithDelay, 1, true), 4);
        assert_eq!(classifier.calculate_retry_delay(RetryPolicy::RetryableWithDelay, 9, true), 10);
        // cooldown base above the custom cap is clamped
        assert_eq!(
            classifier.calculate_retry_delay(RetryPolicy::RetryableWithCooldown, 0, false),
            10
        );
    }
}
