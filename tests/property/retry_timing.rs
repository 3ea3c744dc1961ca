// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for Retry Timing

use chrono::{Duration, Utc};
use proptest::prelude::*;

use token_deployment_lifecycle::retry::{calculate_retry_delay, should_retry, RetryPolicy};

const MAX_DELAY_SECS: u64 = 300;

fn any_policy() -> impl Strategy<Value = RetryPolicy> {
    prop_oneof![
        Just(RetryPolicy::NotRetryable),
        Just(RetryPolicy::RetryableImmediate),
        Just(RetryPolicy::RetryableWithDelay),
        Just(RetryPolicy::RetryableWithCooldown),
        Just(RetryPolicy::RetryableAfterRemediation),
        Just(RetryPolicy::RetryableAfterConfiguration),
    ]
}

proptest! {
    /// Property: backoff never shrinks and never exceeds the cap
    #[test]
    fn prop_backoff_is_monotonic_and_capped(policy in any_policy(), attempt in 0u32..10_000) {
        let current = calculate_retry_delay(policy, attempt, true);
        let next = calculate_retry_delay(policy, attempt + 1, true);

        prop_assert!(current <= next);
        prop_assert!(next <= MAX_DELAY_SECS);
    }

    /// Property: without backoff the delay ignores the attempt number
    #[test]
    fn prop_fixed_delay_is_constant(policy in any_policy(), attempt in 0u32..1_000) {
        prop_assert_eq!(
            calculate_retry_delay(policy, attempt, false),
            calculate_retry_delay(policy, 0, false)
        );
    }

    /// Property: no policy retries past its attempt cap or the window
    #[test]
    fn prop_should_retry_respects_both_limits(
        policy in any_policy(),
        attempt in 0u32..20,
        elapsed_secs in 0i64..1_200,
    ) {
        let first_attempt = Utc::now() - Duration::seconds(elapsed_secs);
        let allowed = should_retry(policy, attempt, first_attempt);

        if allowed {
            prop_assert!(policy.allows_automatic_retry());
            prop_assert!(attempt < policy.default_max_attempts());
            prop_assert!(elapsed_secs < 600);
        }
    }
}
