// Copyright (c) 2025 - Cowboy AI, Inc.
//! Store-backed Deployment Status Service
//!
//! # Transaction Semantics
//!
//! Every status change is one serialized read-modify-write per deployment:
//! 1. Acquire the deployment's lock
//! 2. Load the current record from the store
//! 3. Merge caller-supplied fields and run the transition guard
//! 4. Save record and history entry together
//! 5. Emit the status change event
//!
//! A rejected transition writes nothing. A failed emission is logged and
//! does not undo the saved change. The lock is held through emission so
//! events for one deployment leave in the order they were applied.

use async_trait::async_trait;
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::{debug, info, instrument, warn};
use uuid::Uuid;

use super::{
    CreateDeploymentCommand, DeploymentLocks, DeploymentStatusService, ServiceError,
    ServiceResult, StatusUpdate, UpdateStatusCommand,
};
use crate::config::PaginationConfig;
use crate::domain::{
    DeploymentFilter, DeploymentPage, DeploymentStatus, DeploymentStatusHistoryEntry,
    TokenDeployment, METADATA_IS_RETRYABLE, METADATA_REASON_CODE, METADATA_RETRY_OF,
};
use crate::notification::{LoggingNotificationSink, NotificationSink, StatusChangeEvent};
use crate::state_machine::{get_valid_next_states, reason_codes, validate_transition};
use crate::store::{DeploymentRecordStore, InMemoryDeploymentStore};

/// A status change as the service applies it
#[derive(Debug, Default)]
struct TransitionRequest {
    message: Option<String>,
    transaction_hash: Option<String>,
    confirmed_round: Option<u64>,
    metadata: Vec<(&'static str, String)>,
}

impl From<UpdateStatusCommand> for TransitionRequest {
    fn from(command: UpdateStatusCommand) -> Self {
        Self {
            message: command.message,
            transaction_hash: command.transaction_hash,
            confirmed_round: command.confirmed_round,
            metadata: Vec::new(),
        }
    }
}

/// Deployment status service over a [`DeploymentRecordStore`]
pub struct StoreBackedDeploymentStatusService {
    store: Arc<dyn DeploymentRecordStore>,
    sink: Arc<dyn NotificationSink>,
    locks: DeploymentLocks,
    pagination: PaginationConfig,
}

impl StoreBackedDeploymentStatusService {
    /// Create a service with default pagination limits
    pub fn new(store: Arc<dyn DeploymentRecordStore>, sink: Arc<dyn NotificationSink>) -> Self {
        Self::with_pagination(store, sink, PaginationConfig::default())
    }

    pub fn with_pagination(
        store: Arc<dyn DeploymentRecordStore>,
        sink: Arc<dyn NotificationSink>,
        pagination: PaginationConfig,
    ) -> Self {
        Self {
            store,
            sink,
            locks: DeploymentLocks::new(),
            pagination,
        }
    }

    /// In-memory store with a logging sink
    pub fn in_memory() -> Self {
        Self::new(
            Arc::new(InMemoryDeploymentStore::new()),
            Arc::new(LoggingNotificationSink::new()),
        )
    }

    /// Per-deployment lock registry
    pub fn locks(&self) -> &DeploymentLocks {
        &self.locks
    }

    async fn load(&self, deployment_id: Uuid) -> ServiceResult<TokenDeployment> {
        self.store
            .get(deployment_id)
            .await?
            .ok_or(ServiceError::NotFound(deployment_id))
    }

    async fn notify(&self, event: StatusChangeEvent) {
        if let Err(e) = self.sink.emit_event(&event).await {
            warn!(
                deployment_id = %event.deployment_id,
                to = %event.to_status,
                error = %e,
                "failed to emit status change event"
            );
        }
    }

    async fn transition(
        &self,
        deployment_id: Uuid,
        target: DeploymentStatus,
        request: TransitionRequest,
    ) -> ServiceResult<StatusUpdate> {
        if let Some(hash) = &request.transaction_hash {
            require_non_blank("transaction_hash", hash)?;
        }

        let _guard = self.locks.acquire(deployment_id).await;

        let current = self.load(deployment_id).await?;
        let from = current.current_status;

        let mut candidate = current.clone();
        if let Some(hash) = request.transaction_hash {
            candidate.transaction_hash = Some(hash);
        }
        if let Some(round) = request.confirmed_round {
            candidate.confirmed_round = Some(round);
        }
        if target == DeploymentStatus::Failed {
            if let Some(message) = &request.message {
                candidate.error_message = Some(message.clone());
            }
        }

        let decision = validate_transition(from, target, Some(&candidate));
        if !decision.is_allowed {
            warn!(
                %deployment_id,
                %from,
                to = %target,
                reason_code = %decision.reason_code,
                "transition rejected"
            );
            return Ok(StatusUpdate::Rejected(decision));
        }

        if decision.is_idempotent() {
            if candidate != current {
                candidate.touch();
                self.store.save(candidate, None).await?;
            }
            debug!(%deployment_id, status = %from, "idempotent status update");
            return Ok(StatusUpdate::Unchanged { status: from });
        }

        let retry_of = match (from, target) {
            (DeploymentStatus::Failed, DeploymentStatus::Queued) => candidate.error_message.take(),
            _ => None,
        };

        if target == DeploymentStatus::Failed && request.message.is_none() {
            candidate.error_message = Some(decision.explanation.clone());
        }

        candidate.current_status = target;
        candidate.touch();

        let message = request
            .message
            .unwrap_or_else(|| decision.explanation.clone());
        let mut entry = DeploymentStatusHistoryEntry::new(deployment_id, target, message.clone())
            .with_metadata(METADATA_REASON_CODE, decision.reason_code.clone());
        for (key, value) in request.metadata {
            entry = entry.with_metadata(key, value);
        }
        if let Some(failure) = retry_of {
            entry = entry.with_metadata(METADATA_RETRY_OF, failure);
        }

        self.store.save(candidate.clone(), Some(entry)).await?;

        info!(
            %deployment_id,
            %from,
            to = %target,
            reason_code = %decision.reason_code,
            "transition applied"
        );

        self.notify(StatusChangeEvent::for_deployment(
            &candidate,
            Some(from),
            decision.reason_code.clone(),
            message,
        ))
        .await;

        Ok(StatusUpdate::Applied {
            from,
            to: target,
            reason_code: decision.reason_code,
        })
    }
}

fn require_non_blank(field: &str, value: &str) -> ServiceResult<()> {
    if value.trim().is_empty() {
        return Err(ServiceError::InvalidInput(format!("{} must not be empty", field)));
    }
    Ok(())
}

#[async_trait]
impl DeploymentStatusService for StoreBackedDeploymentStatusService {
    #[instrument(skip(self, command), fields(network = %command.network))]
    async fn create_deployment(&self, command: CreateDeploymentCommand) -> ServiceResult<Uuid> {
        require_non_blank("network", &command.network)?;
        require_non_blank("asset_name", &command.asset_name)?;
        require_non_blank("asset_symbol", &command.asset_symbol)?;

        let deployment = TokenDeployment::new(
            command.token_standard,
            command.network,
            command.correlation_id,
            command.asset_name,
            command.asset_symbol,
        );
        let deployment_id = deployment.deployment_id;

        let admission = validate_transition(
            DeploymentStatus::Queued,
            deployment.current_status,
            Some(&deployment),
        );
        if !admission.is_allowed {
            return Err(ServiceError::InvalidInput(admission.explanation));
        }

        let message = "Deployment queued";
        let entry = DeploymentStatusHistoryEntry::new(
            deployment_id,
            DeploymentStatus::Queued,
            message,
        )
        .with_metadata(METADATA_REASON_CODE, reason_codes::DEPLOYMENT_CREATED);

        let _guard = self.locks.acquire(deployment_id).await;
        self.store.insert(deployment.clone(), entry).await?;

        info!(%deployment_id, standard = %deployment.token_standard, "deployment created");

        self.notify(StatusChangeEvent::for_deployment(
            &deployment,
            None,
            reason_codes::DEPLOYMENT_CREATED,
            message,
        ))
        .await;

        Ok(deployment_id)
    }

    #[instrument(skip(self, command), fields(to = %command.new_status))]
    async fn update_status(
        &self,
        deployment_id: Uuid,
        command: UpdateStatusCommand,
    ) -> ServiceResult<StatusUpdate> {
        let target = command.new_status;
        self.transition(deployment_id, target, command.into()).await
    }

    #[instrument(skip(self))]
    async fn update_asset_identifier(
        &self,
        deployment_id: Uuid,
        asset_identifier: &str,
    ) -> ServiceResult<bool> {
        require_non_blank("asset_identifier", asset_identifier)?;

        let _guard = self.locks.acquire(deployment_id).await;
        let mut deployment = self.load(deployment_id).await?;

        if deployment.current_status == DeploymentStatus::Cancelled {
            warn!(%deployment_id, "asset identifier not recorded on cancelled deployment");
            return Ok(false);
        }

        deployment.asset_identifier = Some(asset_identifier.to_string());
        deployment.touch();
        self.store.save(deployment, None).await?;

        debug!(%deployment_id, "asset identifier recorded");
        Ok(true)
    }

    #[instrument(skip(self, error_message))]
    async fn mark_failed(
        &self,
        deployment_id: Uuid,
        error_message: &str,
        is_retryable: bool,
    ) -> ServiceResult<StatusUpdate> {
        let request = TransitionRequest {
            message: Some(error_message.to_string()),
            metadata: vec![(METADATA_IS_RETRYABLE, is_retryable.to_string())],
            ..Default::default()
        };
        self.transition(deployment_id, DeploymentStatus::Failed, request)
            .await
    }

    #[instrument(skip(self, reason))]
    async fn cancel_deployment(
        &self,
        deployment_id: Uuid,
        reason: &str,
    ) -> ServiceResult<StatusUpdate> {
        let request = TransitionRequest {
            message: Some(reason.to_string()),
            ..Default::default()
        };
        self.transition(deployment_id, DeploymentStatus::Cancelled, request)
            .await
    }

    #[instrument(skip(self, reason))]
    async fn retry_deployment(
        &self,
        deployment_id: Uuid,
        reason: &str,
    ) -> ServiceResult<StatusUpdate> {
        let request = TransitionRequest {
            message: Some(reason.to_string()),
            ..Default::default()
        };
        self.transition(deployment_id, DeploymentStatus::Queued, request)
            .await
    }

    async fn get_deployment(&self, deployment_id: Uuid) -> ServiceResult<Option<TokenDeployment>> {
        Ok(self.store.get(deployment_id).await?)
    }

    async fn get_status_history(
        &self,
        deployment_id: Uuid,
    ) -> ServiceResult<Vec<DeploymentStatusHistoryEntry>> {
        self.store
            .get_history(deployment_id)
            .await?
            .ok_or(ServiceError::NotFound(deployment_id))
    }

    #[instrument(skip(self))]
    async fn list_deployments(&self, filter: DeploymentFilter) -> ServiceResult<DeploymentPage> {
        let (page, page_size) = filter.normalized_page(
            self.pagination.default_page_size,
            self.pagination.max_page_size,
        );
        Ok(self.store.list(&filter, page, page_size).await?)
    }

    async fn valid_next_states(
        &self,
        deployment_id: Uuid,
    ) -> ServiceResult<Vec<DeploymentStatus>> {
        let deployment = self.load(deployment_id).await?;
        Ok(get_valid_next_states(deployment.current_status))
    }

    #[instrument(skip(self))]
    async fn status_counts(
        &self,
        network: Option<String>,
    ) -> ServiceResult<BTreeMap<DeploymentStatus, usize>> {
        let mut base = DeploymentFilter::new();
        if let Some(network) = network {
            base = base.with_network(network);
        }

        let mut counts = BTreeMap::new();
        for status in DeploymentStatus::ALL {
            let filter = base.clone().with_status(status);
            let page = self.store.list(&filter, 1, 1).await?;
            counts.insert(status, page.total_count);
        }
        Ok(counts)
    }
}
