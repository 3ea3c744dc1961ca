// Copyright (c) 2025 - Cowboy AI, Inc.
//! Property-Based Tests for the Transition Guard
//!
//! Drives the guard with arbitrary request sequences and checks the
//! lifecycle can never reach an illegal state.

use proptest::prelude::*;

use token_deployment_lifecycle::domain::{DeploymentStatus, TokenDeployment, TokenStandard};
use token_deployment_lifecycle::state_machine::{
    get_valid_next_states, reason_code_for, reason_codes, validate_transition,
};

// ============================================================================
// Strategies
// ============================================================================

fn any_status() -> impl Strategy<Value = DeploymentStatus> {
    prop::sample::select(DeploymentStatus::ALL.to_vec())
}

fn request_sequence() -> impl Strategy<Value = Vec<DeploymentStatus>> {
    prop::collection::vec(any_status(), 0..40)
}

fn record_in(status: DeploymentStatus, with_hash: bool) -> TokenDeployment {
    let mut record =
        TokenDeployment::new(TokenStandard::Erc721, "base-sepolia", "corr", "Art", "ART");
    record.current_status = status;
    if with_hash {
        record.transaction_hash = Some("0xfeed".to_string());
    }
    record
}

// ============================================================================
// Property Tests
// ============================================================================

proptest! {
    /// Property: every accepted change is a listed next state or a self-loop
    #[test]
    fn prop_accepted_changes_follow_next_states(requests in request_sequence()) {
        let mut current = DeploymentStatus::Queued;

        for requested in requests {
            let result = validate_transition(current, requested, None);
            if !result.is_allowed {
                continue;
            }

            if requested != current {
                prop_assert!(
                    get_valid_next_states(current).contains(&requested),
                    "{} → {} accepted but not listed", current, requested
                );
            }
            current = requested;
        }
    }

    /// Property: once terminal, a deployment stays terminal
    #[test]
    fn prop_terminal_is_absorbing(requests in request_sequence()) {
        let mut current = DeploymentStatus::Queued;
        let mut terminal_at: Option<DeploymentStatus> = None;

        for requested in requests {
            let result = validate_transition(current, requested, None);
            if result.is_allowed {
                current = requested;
            }

            if let Some(terminal) = terminal_at {
                prop_assert_eq!(current, terminal);
            } else if current.is_terminal() {
                terminal_at = Some(current);
            }
        }
    }

    /// Property: the guard always explains itself
    #[test]
    fn prop_reason_code_never_empty(from in any_status(), to in any_status()) {
        let result = validate_transition(from, to, None);

        prop_assert!(!result.reason_code.is_empty());
        prop_assert!(!reason_code_for(from, to).is_empty());
        if result.reason_code == reason_codes::INVALID_TRANSITION {
            prop_assert!(!result.valid_alternatives.is_empty());
        }
    }

    /// Property: supplying a record can only narrow what is allowed
    #[test]
    fn prop_record_only_narrows(from in any_status(), to in any_status(), with_hash in any::<bool>()) {
        let record = record_in(from, with_hash);
        let without = validate_transition(from, to, None);
        let with = validate_transition(from, to, Some(&record));

        if with.is_allowed {
            prop_assert!(without.is_allowed);
        }
        if with_hash {
            prop_assert_eq!(with.is_allowed, without.is_allowed);
        }
    }
}
