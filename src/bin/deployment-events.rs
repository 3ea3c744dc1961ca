// Copyright (c) 2025 - Cowboy AI, Inc.
//! Deployment Events Tail
//!
//! Subscribes to the deployment status subject tree and logs every status
//! change as it is published.
//!
//! Run with: cargo run --bin deployment-events
//!
//! Optional arguments narrow the subscription:
//!
//! ```text
//! deployment-events                 # {prefix}.>
//! deployment-events base-mainnet    # {prefix}.base-mainnet.>
//! ```
//!
//! Connection settings come from `NATS_URL`, `NATS_CLIENT_NAME` and
//! `DEPLOYMENT_SUBJECT_PREFIX`.

use anyhow::{Context, Result};
use futures::StreamExt;
use token_deployment_lifecycle::{
    config::OrchestratorConfig, nats::NatsClient, notification::StatusChangeEvent,
    subjects::SubjectBuilder,
};
use tracing::{debug, info, warn};

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::INFO.into()),
        )
        .init();

    let config = OrchestratorConfig::from_env().context("Failed to load configuration")?;
    info!("NATS servers: {:?}", config.nats.servers);
    info!("Subject prefix: {}", config.subject_prefix);

    let mut builder = SubjectBuilder::new(config.subject_prefix.clone());
    if let Some(network) = std::env::args().nth(1) {
        builder = builder.network(&network);
    }
    let subject = builder.build_wildcard();

    let client = NatsClient::new(config.nats.clone())
        .await
        .context("Failed to connect to NATS")?;
    let mut subscriber = client
        .subscribe(&subject)
        .await
        .context("Failed to subscribe")?;

    info!("Listening on {}", subject);

    let mut event_count = 0u64;
    let mut error_count = 0u64;

    while let Some(message) = subscriber.next().await {
        debug!("Received message on {}", message.subject);

        match serde_json::from_slice::<StatusChangeEvent>(&message.payload) {
            Ok(event) => {
                event_count += 1;
                info!(
                    deployment_id = %event.deployment_id,
                    network = %event.network,
                    correlation_id = %event.correlation_id,
                    from = ?event.from_status,
                    to = %event.to_status,
                    reason_code = %event.reason_code,
                    "{}",
                    event.message
                );
            }
            Err(e) => {
                error_count += 1;
                warn!("Failed to parse event on {}: {}", message.subject, e);
            }
        }
    }

    info!(
        "Subscription closed after {} events ({} unparseable)",
        event_count, error_count
    );
    Ok(())
}
