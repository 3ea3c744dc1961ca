// Copyright (c) 2025 - Cowboy AI, Inc.
//! NATS notification sink
//!
//! Publishes each [`StatusChangeEvent`] as JSON on
//! `{prefix}.{network}.{deployment_id}.{created|status_changed}`.
//! Core NATS publish is at-most-once; consumers needing durability should
//! capture the subject tree in a JetStream stream.

use async_trait::async_trait;

use super::{NotificationSink, StatusChangeEvent};
use crate::errors::InfrastructureResult;
use crate::nats::NatsClient;
use crate::subjects::{Operation, SubjectBuilder, DEPLOYMENTS_ROOT};

/// Publishes status changes to NATS
#[derive(Clone)]
pub struct NatsNotificationSink {
    client: NatsClient,
    subject_prefix: String,
}

impl NatsNotificationSink {
    /// Create a sink publishing under the default `deployments` root
    pub fn new(client: NatsClient) -> Self {
        Self::with_prefix(client, DEPLOYMENTS_ROOT)
    }

    /// Create a sink publishing under a custom root
    pub fn with_prefix(client: NatsClient, subject_prefix: impl Into<String>) -> Self {
        Self {
            client,
            subject_prefix: subject_prefix.into(),
        }
    }

    /// Subject an event is published on
    pub fn subject_for(&self, event: &StatusChangeEvent) -> String {
        subject_for(&self.subject_prefix, event)
    }
}

fn subject_for(prefix: &str, event: &StatusChangeEvent) -> String {
    let operation = match event.from_status {
        None => Operation::Created,
        Some(_) => Operation::StatusChanged,
    };

    SubjectBuilder::new(prefix)
        .network(&event.network)
        .deployment(event.deployment_id)
        .build(operation)
}

#[async_trait]
impl NotificationSink for NatsNotificationSink {
    async fn emit_event(&self, event: &StatusChangeEvent) -> InfrastructureResult<()> {
        let subject = self.subject_for(event);
        self.client.publish(&subject, event).await
    }
}
