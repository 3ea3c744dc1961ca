// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Record Store Abstraction
//!
//! Durable storage for deployment records and their status history, keyed
//! by deployment id. The orchestration core only talks to this trait, so a
//! durable, transactional backend can replace the in-memory reference
//! implementation without touching the service.
//!
//! # Store Requirements
//!
//! 1. **Append-Only History**: entries are never updated or deleted
//! 2. **Ordered**: history is returned in creation order
//! 3. **Atomic Save**: the current record and its new history entry are
//!    written together or not at all
//! 4. **Consistent**: the record's `current_status` always equals the
//!    status of the newest history entry
//! 5. **No Reuse**: an id that already exists cannot be inserted again

use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{DeploymentFilter, DeploymentPage, DeploymentStatusHistoryEntry, TokenDeployment};
use crate::errors::InfrastructureResult;

pub mod memory;

pub use memory::InMemoryDeploymentStore;

/// Storage interface for deployment records
#[async_trait]
pub trait DeploymentRecordStore: Send + Sync {
    /// Insert a new deployment with its initial history entry
    ///
    /// # Errors
    ///
    /// - `StoreInconsistency` if the id already exists or the entry does
    ///   not match the record
    async fn insert(
        &self,
        deployment: TokenDeployment,
        initial_entry: DeploymentStatusHistoryEntry,
    ) -> InfrastructureResult<()>;

    /// Read the current record, `None` if unknown
    async fn get(&self, deployment_id: Uuid) -> InfrastructureResult<Option<TokenDeployment>>;

    /// Read the full history in creation order, `None` if the deployment is unknown
    async fn get_history(
        &self,
        deployment_id: Uuid,
    ) -> InfrastructureResult<Option<Vec<DeploymentStatusHistoryEntry>>>;

    /// Replace the current record and, if given, append one history entry
    ///
    /// Without an entry the stored status must not change.
    ///
    /// # Errors
    ///
    /// - `StoreInconsistency` if the deployment is unknown, or the write
    ///   would let record and history diverge
    async fn save(
        &self,
        deployment: TokenDeployment,
        entry: Option<DeploymentStatusHistoryEntry>,
    ) -> InfrastructureResult<()>;

    /// List deployments matching `filter`, newest first, sliced to one page
    ///
    /// `page` (1-based) and `page_size` are already normalized by the caller.
    async fn list(
        &self,
        filter: &DeploymentFilter,
        page: u32,
        page_size: u32,
    ) -> InfrastructureResult<DeploymentPage>;
}
