// Copyright (c) 2025 - Cowboy AI, Inc.
//! In-memory deployment record store
//!
//! Reference implementation of [`DeploymentRecordStore`]. Each deployment
//! sits behind its own mutex, so writes to different deployments never
//! contend; the outer map lock is only held long enough to find an entry.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::{Mutex, RwLock};
use tracing::debug;
use uuid::Uuid;

use super::DeploymentRecordStore;
use crate::domain::{DeploymentFilter, DeploymentPage, DeploymentStatusHistoryEntry, TokenDeployment};
use crate::errors::{InfrastructureError, InfrastructureResult};

#[derive(Debug)]
struct StoredDeployment {
    record: TokenDeployment,
    history: Vec<DeploymentStatusHistoryEntry>,
}

/// Deployment store held in process memory
#[derive(Debug, Default)]
pub struct InMemoryDeploymentStore {
    records: RwLock<HashMap<Uuid, Arc<Mutex<StoredDeployment>>>>,
}

impl InMemoryDeploymentStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored deployments
    pub async fn len(&self) -> usize {
        self.records.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.records.read().await.is_empty()
    }

    async fn entry(&self, deployment_id: Uuid) -> Option<Arc<Mutex<StoredDeployment>>> {
        self.records.read().await.get(&deployment_id).cloned()
    }
}

fn check_entry_matches(
    record: &TokenDeployment,
    entry: &DeploymentStatusHistoryEntry,
) -> InfrastructureResult<()> {
    if entry.deployment_id != record.deployment_id {
        return Err(InfrastructureError::StoreInconsistency(format!(
            "history entry for {} cannot be stored under {}",
            entry.deployment_id, record.deployment_id
        )));
    }
    if entry.status != record.current_status {
        return Err(InfrastructureError::StoreInconsistency(format!(
            "history entry status {} does not match current status {} of {}",
            entry.status, record.current_status, record.deployment_id
        )));
    }
    Ok(())
}

#[async_trait]
impl DeploymentRecordStore for InMemoryDeploymentStore {
    async fn insert(
        &self,
        deployment: TokenDeployment,
        initial_entry: DeploymentStatusHistoryEntry,
    ) -> InfrastructureResult<()> {
        check_entry_matches(&deployment, &initial_entry)?;

        let mut records = self.records.write().await;
        if records.contains_key(&deployment.deployment_id) {
            return Err(InfrastructureError::StoreInconsistency(format!(
                "deployment {} already exists",
                deployment.deployment_id
            )));
        }

        debug!(deployment_id = %deployment.deployment_id, "inserted deployment");
        records.insert(
            deployment.deployment_id,
            Arc::new(Mutex::new(StoredDeployment {
                record: deployment,
                history: vec![initial_entry],
            })),
        );
        Ok(())
    }

    async fn get(&self, deployment_id: Uuid) -> InfrastructureResult<Option<TokenDeployment>> {
        match self.entry(deployment_id).await {
            Some(entry) => Ok(Some(entry.lock().await.record.clone())),
            None => Ok(None),
        }
    }

    async fn get_history(
        &self,
        deployment_id: Uuid,
    ) -> InfrastructureResult<Option<Vec<DeploymentStatusHistoryEntry>>> {
        match self.entry(deployment_id).await {
            Some(entry) => Ok(Some(entry.lock().await.history.clone())),
            None => Ok(None),
        }
    }

    async fn save(
        &self,
        deployment: TokenDeployment,
        entry: Option<DeploymentStatusHistoryEntry>,
    ) -> InfrastructureResult<()> {
        let stored = self.entry(deployment.deployment_id).await.ok_or_else(|| {
            InfrastructureError::StoreInconsistency(format!(
                "deployment {} does not exist",
                deployment.deployment_id
            ))
        })?;
        let mut stored = stored.lock().await;

        match entry {
            Some(entry) => {
                check_entry_matches(&deployment, &entry)?;
                stored.history.push(entry);
            }
            None if stored.record.current_status != deployment.current_status => {
                return Err(InfrastructureError::StoreInconsistency(format!(
                    "status change {} → {} for {} has no history entry",
                    stored.record.current_status,
                    deployment.current_status,
                    deployment.deployment_id
                )));
            }
            None => {}
        }

        stored.record = deployment;
        Ok(())
    }

    async fn list(
        &self,
        filter: &DeploymentFilter,
        page: u32,
        page_size: u32,
    ) -> InfrastructureResult<DeploymentPage> {
        let entries: Vec<_> = self.records.read().await.values().cloned().collect();

        let mut matches = Vec::new();
        for entry in entries {
            let stored = entry.lock().await;
            if filter.matches(&stored.record) {
                matches.push(stored.record.clone());
            }
        }

        matches.sort_by(|a, b| {
            b.created_at
                .cmp(&a.created_at)
                .then_with(|| b.deployment_id.cmp(&a.deployment_id))
        });

        Ok(DeploymentPage::from_matches(matches, page, page_size))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{DeploymentStatus, TokenStandard};

    fn new_deployment(network: &str) -> (TokenDeployment, DeploymentStatusHistoryEntry) {
        let deployment = TokenDeployment::new(TokenStandard::Erc20, network, "corr", "Token", "TKN");
        let entry = DeploymentStatusHistoryEntry::new(
            deployment.deployment_id,
            DeploymentStatus::Queued,
            "created",
        );
        (deployment, entry)
    }

    #[test]
    fn test_insert_and_get() {
        tokio_test::block_on(async {
            let store = InMemoryDeploymentStore::new();
            let (deployment, entry) = new_deployment("base-mainnet");
            let id = deployment.deployment_id;

            store.insert(deployment.clone(), entry).await.unwrap();

            assert_eq!(store.get(id).await.unwrap(), Some(deployment));
            assert_eq!(store.get_history(id).await.unwrap().unwrap().len(), 1);
            assert_eq!(store.len().await, 1);
        });
    }

    #[tokio::test]
    async fn test_unknown_id_reads_none() {
        let store = InMemoryDeploymentStore::new();
        assert!(store.get(Uuid::now_v7()).await.unwrap().is_none());
        assert!(store.get_history(Uuid::now_v7()).await.unwrap().is_none());
        assert!(store.is_empty().await);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = InMemoryDeploymentStore::new();
        let (deployment, entry) = new_deployment("base-mainnet");

        store.insert(deployment.clone(), entry.clone()).await.unwrap();
        let err = store.insert(deployment, entry).await.unwrap_err();

        assert!(matches!(err, InfrastructureError::StoreInconsistency(_)));
    }

    #[tokio::test]
    async fn test_status_change_without_entry_rejected() {
        let store = InMemoryDeploymentStore::new();
        let (mut deployment, entry) = new_deployment("base-mainnet");
        store.insert(deployment.clone(), entry).await.unwrap();

        deployment.current_status = DeploymentStatus::Failed;
        let err = store.save(deployment.clone(), None).await.unwrap_err();
        assert!(matches!(err, InfrastructureError::StoreInconsistency(_)));

        let stored = store.get(deployment.deployment_id).await.unwrap().unwrap();
        assert_eq!(stored.current_status, DeploymentStatus::Queued);
    }

    #[tokio::test]
    async fn test_mismatched_entry_rejected() {
        let store = InMemoryDeploymentStore::new();
        let (mut deployment, entry) = new_deployment("base-mainnet");
        store.insert(deployment.clone(), entry).await.unwrap();

        deployment.current_status = DeploymentStatus::Failed;
        let wrong = DeploymentStatusHistoryEntry::new(
            deployment.deployment_id,
            DeploymentStatus::Cancelled,
            "mismatch",
        );

        assert!(store.save(deployment.clone(), Some(wrong)).await.is_err());
        assert_eq!(
            store.get_history(deployment.deployment_id).await.unwrap().unwrap().len(),
            1
        );
    }

    #[tokio::test]
    async fn test_list_newest_first() {
        let store = InMemoryDeploymentStore::new();
        let mut ids = Vec::new();
        for _ in 0..3 {
            let (deployment, entry) = new_deployment("base-mainnet");
            ids.push(deployment.deployment_id);
            store.insert(deployment, entry).await.unwrap();
        }

        let page = store.list(&DeploymentFilter::new(), 1, 10).await.unwrap();
        let listed: Vec<_> = page.items.iter().map(|d| d.deployment_id).collect();

        let mut expected = ids;
        expected.reverse();
        assert_eq!(listed, expected);
    }
}
