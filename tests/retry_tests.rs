// Copyright (c) 2025 - Cowboy AI, Inc.
//! Retry Policy Classifier Tests

use chrono::{Duration, Utc};
use pretty_assertions::assert_eq;
use test_case::test_case;

use token_deployment_lifecycle::config::RetryConfig;
use token_deployment_lifecycle::retry::{
    calculate_retry_delay, classify_error, error_codes, should_retry, ErrorCategory, RetryPolicy,
    RetryPolicyClassifier,
};

#[test]
fn invalid_request_is_not_retryable() {
    let decision = classify_error(error_codes::INVALID_REQUEST, None);

    assert_eq!(decision.policy, RetryPolicy::NotRetryable);
    assert_eq!(decision.max_retry_attempts, Some(0));
    assert_eq!(decision.suggested_delay_seconds, 0);
    assert!(decision.explanation.contains("correct the input"));
}

#[test_case(error_codes::RATE_LIMIT_EXCEEDED; "rate limit")]
#[test_case(error_codes::CIRCUIT_BREAKER_OPEN; "circuit breaker")]
fn throttling_uses_cooldown(code: &str) {
    let decision = classify_error(code, None);

    assert_eq!(decision.policy, RetryPolicy::RetryableWithCooldown);
    assert!(decision.suggested_delay_seconds >= 60);
    assert!(decision.use_exponential_backoff);
    assert!(decision.max_retry_attempts.unwrap_or(0) >= 1);
}

#[test_case(error_codes::NETWORK_ERROR; "network")]
#[test_case(error_codes::TIMEOUT; "timeout")]
#[test_case(error_codes::IPFS_SERVICE_ERROR; "ipfs")]
#[test_case(error_codes::BLOCKCHAIN_CONNECTION_ERROR; "blockchain connection")]
fn connectivity_is_retried_with_backoff(code: &str) {
    let decision = classify_error(code, None);

    assert_eq!(decision.policy, RetryPolicy::RetryableWithDelay);
    assert!(decision.use_exponential_backoff);
    assert!(decision.max_retry_attempts.unwrap_or(0) >= 1);
    assert!(decision.suggested_delay_seconds < 30);
}

#[test_case(error_codes::INSUFFICIENT_FUNDS, "Fund"; "insufficient funds")]
#[test_case(error_codes::KYC_REQUIRED, "KYC"; "kyc")]
fn remediation_requires_human_action(code: &str, guidance: &str) {
    let decision = classify_error(code, None);

    assert_eq!(decision.policy, RetryPolicy::RetryableAfterRemediation);
    assert_eq!(decision.max_retry_attempts, Some(0));
    assert!(decision.remediation_guidance.contains(guidance));
}

#[test]
fn configuration_errors_point_to_support() {
    let decision = classify_error(error_codes::CONFIGURATION_ERROR, None);

    assert_eq!(decision.policy, RetryPolicy::RetryableAfterConfiguration);
    assert_eq!(decision.max_retry_attempts, Some(0));
    assert!(decision.remediation_guidance.contains("Contact support"));
}

#[test]
fn unknown_code_degrades_to_delayed_retry() {
    let decision = classify_error("SOMETHING_NEW", None);

    assert_eq!(decision.policy, RetryPolicy::RetryableWithDelay);
    assert_eq!(decision.reason_code, error_codes::UNKNOWN_ERROR);
    assert!(decision.use_exponential_backoff);
}

#[test]
fn category_classifies_unknown_code() {
    let decision = classify_error("CUSTOM_NODE_FAILURE", Some(ErrorCategory::NetworkError));
    assert_eq!(decision.policy, RetryPolicy::RetryableWithDelay);

    let decision = classify_error("CUSTOM_QUOTA", Some(ErrorCategory::RateLimit));
    assert_eq!(decision.policy, RetryPolicy::RetryableWithCooldown);

    let decision = classify_error("CUSTOM_BAD_INPUT", Some(ErrorCategory::Validation));
    assert_eq!(decision.policy, RetryPolicy::NotRetryable);
}

#[test_case(RetryPolicy::NotRetryable; "not retryable")]
#[test_case(RetryPolicy::RetryableAfterRemediation; "remediation")]
#[test_case(RetryPolicy::RetryableAfterConfiguration; "configuration")]
fn blocked_policies_never_retry(policy: RetryPolicy) {
    assert!(!should_retry(policy, 0, Utc::now()));
}

#[test]
fn should_retry_stops_at_attempt_cap() {
    let policy = RetryPolicy::RetryableWithDelay;
    let cap = policy.default_max_attempts();
    let started = Utc::now();

    assert!(should_retry(policy, cap - 1, started));
    assert!(!should_retry(policy, cap, started));
}

#[test]
fn should_retry_stops_after_window() {
    let policy = RetryPolicy::RetryableWithDelay;

    assert!(should_retry(policy, 0, Utc::now() - Duration::minutes(9)));
    assert!(!should_retry(policy, 0, Utc::now() - Duration::minutes(11)));
}

#[test]
fn decision_should_retry_uses_its_own_cap() {
    let decision = classify_error(error_codes::NETWORK_ERROR, None);
    let cap = decision.max_retry_attempts.unwrap_or(0);

    assert!(decision.should_retry(0, Utc::now()));
    assert!(!decision.should_retry(cap, Utc::now()));
}

#[test]
fn immediate_policy_has_no_delay() {
    assert_eq!(calculate_retry_delay(RetryPolicy::RetryableImmediate, 4, true), 0);
}

#[test]
fn cooldown_base_exceeds_delay_base() {
    let delay = calculate_retry_delay(RetryPolicy::RetryableWithDelay, 0, false);
    let cooldown = calculate_retry_delay(RetryPolicy::RetryableWithCooldown, 0, false);

    assert!(delay < 30);
    assert!(cooldown > delay);
}

#[test]
fn backoff_grows_until_cap() {
    let delays: Vec<u64> = (0..12)
        .map(|attempt| calculate_retry_delay(RetryPolicy::RetryableWithDelay, attempt, true))
        .collect();

    let cap_at = delays
        .iter()
        .position(|&delay| delay == 300)
        .expect("backoff should reach the cap");

    for pair in delays[..=cap_at].windows(2) {
        assert!(pair[0] < pair[1], "{:?} is not strictly increasing", delays);
    }
    assert!(delays[cap_at..].iter().all(|&delay| delay == 300));
}

#[test]
fn decision_next_delay_follows_backoff_flag() {
    let decision = classify_error(error_codes::RATE_LIMIT_EXCEEDED, None);

    assert_eq!(decision.next_delay(0), 60);
    assert_eq!(decision.next_delay(1), 120);
    assert_eq!(decision.next_delay(10), 300);
}

#[test]
fn configured_window_applies_to_decisions() {
    let classifier = RetryPolicyClassifier::new(RetryConfig {
        retry_window: std::time::Duration::from_secs(60),
        ..RetryConfig::default()
    });
    let decision = classifier.classify_error(error_codes::NETWORK_ERROR, None);
    let first_attempt = Utc::now() - Duration::minutes(5);

    assert!(!classifier.should_retry(decision.policy, 0, first_attempt));
    assert!(!decision.should_retry(0, first_attempt));
    assert!(decision.should_retry(0, Utc::now()));
}
