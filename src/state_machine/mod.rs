// Copyright (c) 2025 - Cowboy AI, Inc.
//! Finite State Machine Abstractions
//!
//! This module provides the generic state machine trait and the structured
//! result type returned by transition guards. All state machines are pure:
//! transitions are deterministic functions with no side effects.
//!
//! # Mealy Machine
//!
//! Output depends on both current state and input:
//! ```text
//! (State, Input) → (State, Output)
//! ```
//!
//! The deployment lifecycle is a Mealy machine whose input is the requested
//! status and whose output is the audit reason code for the edge taken.
//!
//! # Rejections are values
//!
//! Guards never panic or error on an illegal request. They return a
//! [`TransitionValidationResult`] with `is_allowed == false`, a reason code,
//! and whatever the caller needs to self-correct.

use serde::{Deserialize, Serialize};

use crate::domain::DeploymentStatus;

pub mod deployment_lifecycle;

pub use deployment_lifecycle::{get_valid_next_states, reason_code_for, validate_transition};

/// Reason codes produced by the transition guard
pub mod reason_codes {
    pub const IDEMPOTENT_UPDATE: &str = "IDEMPOTENT_UPDATE";
    pub const INVALID_TRANSITION: &str = "INVALID_TRANSITION";
    pub const TERMINAL_STATE_VIOLATION: &str = "TERMINAL_STATE_VIOLATION";
    pub const INVARIANT_VIOLATION: &str = "INVARIANT_VIOLATION";

    pub const DEPLOYMENT_SUBMITTED: &str = "DEPLOYMENT_SUBMITTED";
    pub const TRANSACTION_BROADCAST: &str = "TRANSACTION_BROADCAST";
    pub const TRANSACTION_CONFIRMED: &str = "TRANSACTION_CONFIRMED";
    pub const DEPLOYMENT_INDEXED: &str = "DEPLOYMENT_INDEXED";
    pub const DEPLOYMENT_COMPLETED: &str = "DEPLOYMENT_COMPLETED";
    pub const DEPLOYMENT_FAILED: &str = "DEPLOYMENT_FAILED";
    pub const DEPLOYMENT_RETRY_REQUESTED: &str = "DEPLOYMENT_RETRY_REQUESTED";
    pub const USER_CANCELLED: &str = "USER_CANCELLED";
    pub const DEPLOYMENT_CREATED: &str = "DEPLOYMENT_CREATED";
}

/// Result of a state transition
pub type TransitionResult<S> = Result<S, TransitionError>;

/// Errors that can occur during state transitions
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum TransitionError {
    /// No edge from current state to target state
    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition {
        from: DeploymentStatus,
        to: DeploymentStatus,
    },

    /// Current state is terminal
    #[error("{from} is terminal; cannot transition to {to}")]
    TerminalState {
        from: DeploymentStatus,
        to: DeploymentStatus,
    },

    /// Edge exists but required context is missing
    #[error("Invariant violated: {}", .0.join("; "))]
    InvariantViolation(Vec<String>),
}

impl TransitionError {
    /// Reason code matching this error
    pub fn reason_code(&self) -> &'static str {
        match self {
            Self::InvalidTransition { .. } => reason_codes::INVALID_TRANSITION,
            Self::TerminalState { .. } => reason_codes::TERMINAL_STATE_VIOLATION,
            Self::InvariantViolation(_) => reason_codes::INVARIANT_VIOLATION,
        }
    }
}

/// Trait for finite state machines
///
/// Implement this trait to define a state machine with typed states,
/// inputs, and outputs.
pub trait StateMachine: Sized + Clone {
    /// Input type that triggers transitions
    type Input;

    /// Output type produced by transitions (use () if none)
    type Output;

    /// Attempt to transition to a new state given an input
    ///
    /// # Returns
    /// - Ok((new_state, output)) if transition is valid
    /// - Err(TransitionError) if transition is invalid
    fn transition(&self, input: &Self::Input) -> TransitionResult<(Self, Self::Output)>;

    /// Check if a transition is valid without performing it
    fn can_transition(&self, input: &Self::Input) -> bool {
        self.transition(input).is_ok()
    }

    /// Get all valid inputs from current state (if enumerable)
    fn valid_inputs(&self) -> Vec<Self::Input>
    where
        Self::Input: Clone,
    {
        Vec::new()
    }
}

/// Guard decision for a requested status change. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionValidationResult {
    /// Whether the transition may be applied
    pub is_allowed: bool,

    /// Machine-readable reason; never empty
    pub reason_code: String,

    /// Human-readable explanation
    pub explanation: String,

    /// Violated invariants; only non-empty for `INVARIANT_VIOLATION`
    pub violated_invariants: Vec<String>,

    /// Legal targets from the current status; only populated for `INVALID_TRANSITION`
    pub valid_alternatives: Vec<DeploymentStatus>,
}

impl TransitionValidationResult {
    /// Accepted transition
    pub fn allowed(reason_code: impl Into<String>, explanation: impl Into<String>) -> Self {
        Self {
            is_allowed: true,
            reason_code: reason_code.into(),
            explanation: explanation.into(),
            violated_invariants: Vec::new(),
            valid_alternatives: Vec::new(),
        }
    }

    /// Rejected transition built from the underlying error
    pub fn rejected(error: &TransitionError, valid_alternatives: Vec<DeploymentStatus>) -> Self {
        let violated_invariants = match error {
            TransitionError::InvariantViolation(violations) => violations.clone(),
            _ => Vec::new(),
        };

        Self {
            is_allowed: false,
            reason_code: error.reason_code().to_string(),
            explanation: error.to_string(),
            violated_invariants,
            valid_alternatives,
        }
    }

    /// Whether this was an accepted same-status update
    pub fn is_idempotent(&self) -> bool {
        self.is_allowed && self.reason_code == reason_codes::IDEMPOTENT_UPDATE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejected_carries_invariants() {
        let error = TransitionError::InvariantViolation(vec![
            "TransactionHash is required".to_string(),
        ]);
        let result = TransitionValidationResult::rejected(&error, Vec::new());

        assert!(!result.is_allowed);
        assert_eq!(result.reason_code, reason_codes::INVARIANT_VIOLATION);
        assert_eq!(result.violated_invariants.len(), 1);
        assert!(result.explanation.contains("TransactionHash"));
    }

    #[test]
    fn test_rejected_topology_has_no_invariants() {
        let error = TransitionError::InvalidTransition {
            from: DeploymentStatus::Queued,
            to: DeploymentStatus::Completed,
        };
        let result =
            TransitionValidationResult::rejected(&error, vec![DeploymentStatus::Submitted]);

        assert_eq!(result.reason_code, reason_codes::INVALID_TRANSITION);
        assert!(result.violated_invariants.is_empty());
        assert_eq!(result.valid_alternatives, vec![DeploymentStatus::Submitted]);
        assert_eq!(result.explanation, "Invalid transition from Queued to Completed");
    }

    #[test]
    fn test_idempotent_flag() {
        let result = TransitionValidationResult::allowed(reason_codes::IDEMPOTENT_UPDATE, "same");
        assert!(result.is_idempotent());

        let result =
            TransitionValidationResult::allowed(reason_codes::TRANSACTION_BROADCAST, "moved");
        assert!(!result.is_idempotent());
    }
}
