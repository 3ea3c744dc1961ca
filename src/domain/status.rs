// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Status
//!
//! The lifecycle vocabulary for a token deployment and the directed edge
//! table between statuses.
//!
//! ```text
//! Queued ──► Submitted ──► Pending ──► Confirmed ──► Indexed ──► Completed
//!   │                                      └──────────────────────►┘
//!   └──► Cancelled
//!
//! (any non-terminal) ──► Failed ──► Queued
//! ```
//!
//! `Completed` and `Cancelled` are terminal.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Deployment lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeploymentStatus {
    /// Accepted and waiting to be submitted
    Queued,

    /// Transaction built and handed to the network
    Submitted,

    /// Transaction broadcast, awaiting confirmation
    Pending,

    /// Transaction included in a block/round
    Confirmed,

    /// Token picked up by the indexer
    Indexed,

    /// Deployment finished (terminal)
    Completed,

    /// Deployment failed at some stage; may be re-queued
    Failed,

    /// Deployment cancelled by the user (terminal)
    Cancelled,
}

impl DeploymentStatus {
    /// Every status, in lifecycle order
    pub const ALL: [DeploymentStatus; 8] = [
        DeploymentStatus::Queued,
        DeploymentStatus::Submitted,
        DeploymentStatus::Pending,
        DeploymentStatus::Confirmed,
        DeploymentStatus::Indexed,
        DeploymentStatus::Completed,
        DeploymentStatus::Failed,
        DeploymentStatus::Cancelled,
    ];

    /// Whether no transition out of this status is permitted
    pub fn is_terminal(&self) -> bool {
        matches!(self, DeploymentStatus::Completed | DeploymentStatus::Cancelled)
    }

    /// Outbound edges from the transition table.
    ///
    /// Does not include the universal failure edge or the idempotent
    /// self-loop; those are layered on by the transition guard.
    pub fn table_edges(&self) -> &'static [DeploymentStatus] {
        use DeploymentStatus::*;

        match self {
            Queued => &[Submitted, Cancelled],
            Submitted => &[Pending],
            Pending => &[Confirmed],
            Confirmed => &[Indexed, Completed],
            Indexed => &[Completed],
            Failed => &[Queued],
            Completed | Cancelled => &[],
        }
    }

    /// Canonical upper-case token used when synthesizing reason codes
    pub fn code(&self) -> &'static str {
        match self {
            Self::Queued => "QUEUED",
            Self::Submitted => "SUBMITTED",
            Self::Pending => "PENDING",
            Self::Confirmed => "CONFIRMED",
            Self::Indexed => "INDEXED",
            Self::Completed => "COMPLETED",
            Self::Failed => "FAILED",
            Self::Cancelled => "CANCELLED",
        }
    }

    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Queued => "queued",
            Self::Submitted => "submitted",
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Indexed => "indexed",
            Self::Completed => "completed",
            Self::Failed => "failed",
            Self::Cancelled => "cancelled",
        }
    }

    /// Parse from string representation (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str().eq_ignore_ascii_case(s.trim()))
    }
}

impl fmt::Display for DeploymentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Queued => "Queued",
            Self::Submitted => "Submitted",
            Self::Pending => "Pending",
            Self::Confirmed => "Confirmed",
            Self::Indexed => "Indexed",
            Self::Completed => "Completed",
            Self::Failed => "Failed",
            Self::Cancelled => "Cancelled",
        };
        write!(f, "{}", name)
    }
}
