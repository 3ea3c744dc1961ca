// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Lifecycle Transition Guard
//!
//! Decides whether a requested status change is legal. Uses the generic
//! [`StateMachine`] trait for topology and layers record-aware invariants
//! on top.
//!
//! # Evaluation order
//!
//! 1. Terminal source (`Completed`, `Cancelled`) → `TERMINAL_STATE_VIOLATION`
//! 2. Same status → `IDEMPOTENT_UPDATE`
//! 3. Table edge or universal `→ Failed` edge, else `INVALID_TRANSITION`
//! 4. If a record is supplied: invariants → `INVARIANT_VIOLATION`
//!
//! Topology is always checked before invariants, so a cancel from
//! `Pending` reports `INVALID_TRANSITION`, never an invariant failure.

use super::{
    reason_codes, StateMachine, TransitionError, TransitionResult, TransitionValidationResult,
};
use crate::domain::{DeploymentStatus, TokenDeployment};

impl StateMachine for DeploymentStatus {
    type Input = DeploymentStatus;
    type Output = &'static str;

    fn transition(&self, target: &Self::Input) -> TransitionResult<(Self, Self::Output)> {
        use DeploymentStatus::*;

        let (from, to) = (*self, *target);

        if from.is_terminal() {
            return Err(TransitionError::TerminalState { from, to });
        }

        if from == to {
            return Ok((to, reason_codes::IDEMPOTENT_UPDATE));
        }

        let reason = match (from, to) {
            (Queued, Submitted) => reason_codes::DEPLOYMENT_SUBMITTED,
            (Queued, Cancelled) => reason_codes::USER_CANCELLED,
            (Submitted, Pending) => reason_codes::TRANSACTION_BROADCAST,
            (Pending, Confirmed) => reason_codes::TRANSACTION_CONFIRMED,
            (Confirmed, Indexed) => reason_codes::DEPLOYMENT_INDEXED,
            (Confirmed, Completed) | (Indexed, Completed) => reason_codes::DEPLOYMENT_COMPLETED,
            (Failed, Queued) => reason_codes::DEPLOYMENT_RETRY_REQUESTED,

            // Universal failure edge
            (_, Failed) => reason_codes::DEPLOYMENT_FAILED,

            _ => return Err(TransitionError::InvalidTransition { from, to }),
        };

        Ok((to, reason))
    }

    fn valid_inputs(&self) -> Vec<Self::Input> {
        get_valid_next_states(*self)
    }
}

/// Validate a requested status change.
///
/// Pass the current record as `record` to also check invariants. When the
/// service validates an update it passes the record with the caller's
/// supplied fields (e.g. a new transaction hash) already merged in.
pub fn validate_transition(
    from: DeploymentStatus,
    to: DeploymentStatus,
    record: Option<&TokenDeployment>,
) -> TransitionValidationResult {
    let reason = match from.transition(&to) {
        Ok((_, reason)) => reason,
        Err(error @ TransitionError::InvalidTransition { .. }) => {
            return TransitionValidationResult::rejected(&error, from.table_edges().to_vec());
        }
        Err(error) => return TransitionValidationResult::rejected(&error, Vec::new()),
    };

    if reason == reason_codes::IDEMPOTENT_UPDATE {
        return TransitionValidationResult::allowed(
            reason,
            format!("Deployment is already {}; no change recorded", to),
        );
    }

    if let Some(record) = record {
        let violations = check_invariants(to, record);
        if !violations.is_empty() {
            return TransitionValidationResult::rejected(
                &TransitionError::InvariantViolation(violations),
                Vec::new(),
            );
        }
    }

    TransitionValidationResult::allowed(reason, format!("Transition {} → {} is permitted", from, to))
}

/// Invariants that must hold on the record when entering `to`
fn check_invariants(to: DeploymentStatus, record: &TokenDeployment) -> Vec<String> {
    let mut violations = Vec::new();

    if to == DeploymentStatus::Submitted && !record.has_transaction_hash() {
        violations.push(
            "TransactionHash must be set before a deployment can enter Submitted".to_string(),
        );
    }

    violations
}

/// Legal next statuses from `status`.
///
/// The table's outbound edges plus `Failed` (unless already `Failed`);
/// empty for terminal statuses. The idempotent self-loop is not listed.
pub fn get_valid_next_states(status: DeploymentStatus) -> Vec<DeploymentStatus> {
    if status.is_terminal() {
        return Vec::new();
    }

    let mut next = status.table_edges().to_vec();
    if status != DeploymentStatus::Failed {
        next.push(DeploymentStatus::Failed);
    }
    next
}

/// Audit reason code for `from → to`.
///
/// Always returns a code: unrecognized pairs (including illegal ones) get
/// a synthesized `TRANSITION_<FROM>_<TO>`. Diagnostic only; authorization
/// goes through [`validate_transition`].
pub fn reason_code_for(from: DeploymentStatus, to: DeploymentStatus) -> String {
    match from.transition(&to) {
        Ok((_, reason)) => reason.to_string(),
        Err(_) => format!("TRANSITION_{}_{}", from.code(), to.code()),
    }
}
