// Copyright (c) 2025 - Cowboy AI, Inc.

//! NATS subject hierarchy for deployment notifications
//!
//! All deployment events follow the hierarchical pattern:
//!
//! ```text
//! {prefix}.{network}.{deployment_id}.{operation}
//! ```
//!
//! This allows for:
//! - Precise subscriptions (`deployments.base-mainnet.<id>.status_changed`)
//! - Per-network wildcards (`deployments.base-mainnet.>`)
//! - Global subscriptions (`deployments.>`)
//!
//! Network names are sanitized into a single subject token, so
//! `mainnet-v1.0` becomes `mainnet-v1_0`.
//!
//! # Examples
//!
//! ```rust
//! use token_deployment_lifecycle::subjects::{Operation, SubjectBuilder};
//! use uuid::Uuid;
//!
//! let id = Uuid::nil();
//! let subject = SubjectBuilder::new("deployments")
//!     .network("base-mainnet")
//!     .deployment(id)
//!     .build(Operation::StatusChanged);
//! assert_eq!(
//!     subject,
//!     "deployments.base-mainnet.00000000-0000-0000-0000-000000000000.status_changed"
//! );
//! ```

use std::fmt;
use uuid::Uuid;

/// Default root namespace for deployment subjects
pub const DEPLOYMENTS_ROOT: &str = "deployments";

/// Deployment operations (event types)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Operation {
    /// A deployment record was created in `Queued`
    Created,
    /// A deployment moved between statuses
    StatusChanged,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Created => write!(f, "created"),
            Operation::StatusChanged => write!(f, "status_changed"),
        }
    }
}

/// Builder for deployment NATS subjects
#[derive(Debug, Clone)]
pub struct SubjectBuilder {
    prefix: String,
    network: Option<String>,
    deployment: Option<Uuid>,
}

impl SubjectBuilder {
    /// Create a new subject builder rooted at `prefix`
    pub fn new(prefix: impl Into<String>) -> Self {
        Self {
            prefix: prefix.into(),
            network: None,
            deployment: None,
        }
    }

    /// Set the network token
    pub fn network(mut self, network: &str) -> Self {
        self.network = Some(sanitize_token(network));
        self
    }

    /// Set the deployment id token
    pub fn deployment(mut self, deployment_id: Uuid) -> Self {
        self.deployment = Some(deployment_id);
        self
    }

    /// Build the complete subject string.
    ///
    /// Missing network or deployment tokens are filled with `*`, which
    /// yields a valid subscription pattern.
    pub fn build(self, operation: Operation) -> String {
        format!("{}.{}", self.base(), operation)
    }

    /// Build a wildcard subscription below whatever tokens are set
    pub fn build_wildcard(self) -> String {
        match (&self.network, &self.deployment) {
            (None, None) => format!("{}.>", self.prefix),
            (Some(network), None) => format!("{}.{}.>", self.prefix, network),
            _ => format!("{}.>", self.base()),
        }
    }

    fn base(&self) -> String {
        let network = self.network.as_deref().unwrap_or("*");
        let deployment = self
            .deployment
            .map_or_else(|| "*".to_string(), |id| id.to_string());
        format!("{}.{}.{}", self.prefix, network, deployment)
    }
}

impl Default for SubjectBuilder {
    fn default() -> Self {
        Self::new(DEPLOYMENTS_ROOT)
    }
}

/// Replace characters that have meaning in NATS subjects
fn sanitize_token(raw: &str) -> String {
    let token: String = raw
        .trim()
        .chars()
        .map(|c| match c {
            '.' | '*' | '>' => '_',
            c if c.is_whitespace() => '_',
            c => c.to_ascii_lowercase(),
        })
        .collect();

    if token.is_empty() {
        "unknown".to_string()
    } else {
        token
    }
}
