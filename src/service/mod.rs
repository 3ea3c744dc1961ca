// Copyright (c) 2025 - Cowboy AI, Inc.
//! Service Layer for Deployment Lifecycle Management
//!
//! The deployment status service owns every mutation of a deployment
//! record. It coordinates the transition guard, the record store and the
//! notification sink.
//!
//! # Architecture
//!
//! ```text
//! Caller (API layer)
//!     ↓
//! DeploymentStatusService (this module)
//!     ↓ per-deployment lock
//! Store.get → Guard.validate_transition → Store.save
//!     ↓
//! NotificationSink.emit_event
//! ```
//!
//! # Outcomes
//!
//! Business-rule rejections come back as [`StatusUpdate::Rejected`], not as
//! errors. `ServiceError` is reserved for unknown ids, bad input, and store
//! faults.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

use crate::domain::{
    DeploymentFilter, DeploymentPage, DeploymentStatus, DeploymentStatusHistoryEntry,
    TokenDeployment, TokenStandard,
};
use crate::errors::InfrastructureError;
use crate::state_machine::TransitionValidationResult;

pub mod deployment_status;
pub mod locks;

pub use deployment_status::StoreBackedDeploymentStatusService;
pub use locks::{DeploymentLockGuard, DeploymentLocks};

/// Service layer result type
pub type ServiceResult<T> = Result<T, ServiceError>;

/// Service layer errors
#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    /// No deployment with this id
    #[error("Deployment not found: {0}")]
    NotFound(Uuid),

    /// Request is malformed
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// Store or other infrastructure fault
    #[error("Store error: {0}")]
    Store(#[from] InfrastructureError),
}

impl ServiceError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, Self::NotFound(_))
    }
}

/// Request to create a deployment
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateDeploymentCommand {
    pub token_standard: TokenStandard,
    pub network: String,
    pub correlation_id: String,
    pub asset_name: String,
    pub asset_symbol: String,
}

/// Request to move a deployment to a new status
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateStatusCommand {
    pub new_status: DeploymentStatus,
    pub message: Option<String>,
    pub transaction_hash: Option<String>,
    pub confirmed_round: Option<u64>,
}

impl UpdateStatusCommand {
    pub fn new(new_status: DeploymentStatus) -> Self {
        Self {
            new_status,
            message: None,
            transaction_hash: None,
            confirmed_round: None,
        }
    }

    pub fn with_message(mut self, message: impl Into<String>) -> Self {
        self.message = Some(message.into());
        self
    }

    pub fn with_transaction_hash(mut self, hash: impl Into<String>) -> Self {
        self.transaction_hash = Some(hash.into());
        self
    }

    pub fn with_confirmed_round(mut self, round: u64) -> Self {
        self.confirmed_round = Some(round);
        self
    }
}

/// Outcome of a status update request
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StatusUpdate {
    /// Status changed and a history entry was appended
    Applied {
        from: DeploymentStatus,
        to: DeploymentStatus,
        reason_code: String,
    },

    /// Same status requested; fields updated, history unchanged
    Unchanged { status: DeploymentStatus },

    /// Guard refused the transition; nothing was written
    Rejected(TransitionValidationResult),
}

impl StatusUpdate {
    /// Whether the request was accepted (applied or idempotent)
    pub fn is_accepted(&self) -> bool {
        !matches!(self, Self::Rejected(_))
    }

    /// Guard result when rejected
    pub fn rejection(&self) -> Option<&TransitionValidationResult> {
        match self {
            Self::Rejected(result) => Some(result),
            _ => None,
        }
    }
}

/// Deployment status service interface
#[async_trait]
pub trait DeploymentStatusService: Send + Sync {
    /// Create a deployment in `Queued` with one history entry
    async fn create_deployment(&self, command: CreateDeploymentCommand) -> ServiceResult<Uuid>;

    /// Request a status change, updating denormalized fields when supplied
    async fn update_status(
        &self,
        deployment_id: Uuid,
        command: UpdateStatusCommand,
    ) -> ServiceResult<StatusUpdate>;

    /// Record the on-chain identifier; independent of status
    ///
    /// Returns `false` when the deployment is `Cancelled`.
    async fn update_asset_identifier(
        &self,
        deployment_id: Uuid,
        asset_identifier: &str,
    ) -> ServiceResult<bool>;

    /// Move to `Failed`, recording `isRetryable` in the history metadata
    async fn mark_failed(
        &self,
        deployment_id: Uuid,
        error_message: &str,
        is_retryable: bool,
    ) -> ServiceResult<StatusUpdate>;

    /// Cancel a deployment that is still `Queued`
    async fn cancel_deployment(&self, deployment_id: Uuid, reason: &str)
        -> ServiceResult<StatusUpdate>;

    /// Re-queue a `Failed` deployment
    async fn retry_deployment(&self, deployment_id: Uuid, reason: &str)
        -> ServiceResult<StatusUpdate>;

    /// Current record, `None` if unknown
    async fn get_deployment(&self, deployment_id: Uuid) -> ServiceResult<Option<TokenDeployment>>;

    /// History in creation order
    async fn get_status_history(
        &self,
        deployment_id: Uuid,
    ) -> ServiceResult<Vec<DeploymentStatusHistoryEntry>>;

    /// Filtered, paginated listing, newest first
    async fn list_deployments(&self, filter: DeploymentFilter) -> ServiceResult<DeploymentPage>;

    /// Legal next statuses for a stored deployment
    async fn valid_next_states(&self, deployment_id: Uuid)
        -> ServiceResult<Vec<DeploymentStatus>>;

    /// Number of deployments per status, optionally for one network
    async fn status_counts(
        &self,
        network: Option<String>,
    ) -> ServiceResult<BTreeMap<DeploymentStatus, usize>>;
}
