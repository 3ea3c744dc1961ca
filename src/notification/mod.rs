// Copyright (c) 2025 - Cowboy AI, Inc.
//! Status Change Notification
//!
//! The deployment status service emits one [`StatusChangeEvent`] per accepted
//! change (creation included). Delivery is the sink's concern: the service
//! treats emission as fire-and-forget and only logs sink failures.
//!
//! # Sinks
//!
//! - [`LoggingNotificationSink`] - writes events to `tracing`
//! - [`CollectingNotificationSink`] - keeps events in memory for inspection
//! - [`NatsNotificationSink`] - publishes JSON to the deployment subject hierarchy

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::sync::Mutex;
use tracing::info;
use uuid::Uuid;

use crate::domain::{DeploymentStatus, TokenDeployment};
use crate::errors::InfrastructureResult;

pub mod nats;

pub use nats::NatsNotificationSink;

/// One accepted status change
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusChangeEvent {
    /// Unique event identifier (UUID v7), usable for consumer de-duplication
    pub event_id: Uuid,

    pub deployment_id: Uuid,
    pub network: String,
    pub correlation_id: String,

    /// `None` for the creation event
    pub from_status: Option<DeploymentStatus>,
    pub to_status: DeploymentStatus,

    pub reason_code: String,
    pub message: String,
    pub timestamp: DateTime<Utc>,
}

impl StatusChangeEvent {
    /// Build an event from the deployment record after the change was applied
    pub fn for_deployment(
        deployment: &TokenDeployment,
        from_status: Option<DeploymentStatus>,
        reason_code: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        Self {
            event_id: Uuid::now_v7(),
            deployment_id: deployment.deployment_id,
            network: deployment.network.clone(),
            correlation_id: deployment.correlation_id.clone(),
            from_status,
            to_status: deployment.current_status,
            reason_code: reason_code.into(),
            message: message.into(),
            timestamp: deployment.updated_at,
        }
    }
}

/// Receives status change events
#[async_trait]
pub trait NotificationSink: Send + Sync {
    /// Emit one event. Errors are reported back but never roll back the change.
    async fn emit_event(&self, event: &StatusChangeEvent) -> InfrastructureResult<()>;
}

/// Logs events via `tracing` and does nothing else
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingNotificationSink;

impl LoggingNotificationSink {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl NotificationSink for LoggingNotificationSink {
    async fn emit_event(&self, event: &StatusChangeEvent) -> InfrastructureResult<()> {
        info!(
            deployment_id = %event.deployment_id,
            from = ?event.from_status,
            to = %event.to_status,
            reason_code = %event.reason_code,
            "deployment status changed"
        );
        Ok(())
    }
}

/// Collects events in memory
#[derive(Debug, Default)]
pub struct CollectingNotificationSink {
    collected: Mutex<Vec<StatusChangeEvent>>,
}

impl CollectingNotificationSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Snapshot of all collected events, in emission order
    pub async fn events(&self) -> Vec<StatusChangeEvent> {
        self.collected.lock().await.clone()
    }

    /// Events for one deployment, in emission order
    pub async fn events_for(&self, deployment_id: Uuid) -> Vec<StatusChangeEvent> {
        self.collected
            .lock()
            .await
            .iter()
            .filter(|event| event.deployment_id == deployment_id)
            .cloned()
            .collect()
    }

    /// Take all collected events, leaving the collector empty
    pub async fn take_events(&self) -> Vec<StatusChangeEvent> {
        std::mem::take(&mut *self.collected.lock().await)
    }
}

#[async_trait]
impl NotificationSink for CollectingNotificationSink {
    async fn emit_event(&self, event: &StatusChangeEvent) -> InfrastructureResult<()> {
        self.collected.lock().await.push(event.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TokenStandard;

    fn event() -> StatusChangeEvent {
        let deployment =
            TokenDeployment::new(TokenStandard::Arc3, "testnet-v1.0", "corr-9", "Art", "ART");
        StatusChangeEvent::for_deployment(&deployment, None, "DEPLOYMENT_CREATED", "created")
    }

    #[tokio::test]
    async fn test_collecting_sink() {
        let sink = CollectingNotificationSink::new();
        let first = event();
        let second = event();

        sink.emit_event(&first).await.unwrap();
        sink.emit_event(&second).await.unwrap();

        assert_eq!(sink.events().await.len(), 2);
        assert_eq!(sink.events_for(first.deployment_id).await, vec![first]);

        let taken = sink.take_events().await;
        assert_eq!(taken.len(), 2);
        assert!(sink.events().await.is_empty());
    }

    #[tokio::test]
    async fn test_logging_sink_accepts_everything() {
        LoggingNotificationSink::new().emit_event(&event()).await.unwrap();
    }

    #[test]
    fn test_event_serializes_statuses_snake_case() {
        let json = serde_json::to_value(event()).unwrap();
        assert_eq!(json["to_status"], "queued");
        assert!(json["from_status"].is_null());
    }
}
