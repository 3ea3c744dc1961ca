// Copyright (c) 2025 - Cowboy AI, Inc.
//! Test Fixtures for token-deployment-lifecycle
//!
//! Deterministic records and services shared by the integration tests.
//! Ids and timestamps on fixture records are fixed constants; services
//! built here always start from an empty in-memory store.

#![allow(dead_code)]

use chrono::{DateTime, Utc};
use std::sync::Arc;
use uuid::Uuid;

use token_deployment_lifecycle::domain::{DeploymentStatus, TokenDeployment, TokenStandard};
use token_deployment_lifecycle::notification::CollectingNotificationSink;
use token_deployment_lifecycle::service::{
    CreateDeploymentCommand, StoreBackedDeploymentStatusService,
};
use token_deployment_lifecycle::store::InMemoryDeploymentStore;

pub const DEPLOYMENT_ID_1: &str = "01934f4a-1000-7000-8000-000000001000";

pub const CORRELATION_ID_1: &str = "01934f4a-c001-7000-8000-00000000c001";

pub const TRANSACTION_HASH_1: &str =
    "0x5c504ed432cb51138bcf09aa5e8a410dd4a1e204ef84bfed1be16dfba1b22060";

// Fixed test timestamp (2026-01-19T12:00:00Z)
pub const FIXED_TIMESTAMP: &str = "2026-01-19T12:00:00Z";

/// Parse a fixed UUID from a constant string
pub fn parse_uuid(s: &str) -> Uuid {
    Uuid::parse_str(s).expect("Invalid UUID in test fixture")
}

/// Parse the fixed timestamp
pub fn fixed_timestamp() -> DateTime<Utc> {
    DateTime::parse_from_rfc3339(FIXED_TIMESTAMP)
        .expect("Invalid timestamp in test fixture")
        .with_timezone(&Utc)
}

/// A deployment record in `status` with fixed id and timestamps
pub fn deployment_fixture(status: DeploymentStatus, transaction_hash: Option<&str>) -> TokenDeployment {
    TokenDeployment {
        deployment_id: parse_uuid(DEPLOYMENT_ID_1),
        token_standard: TokenStandard::Erc20,
        network: "base-mainnet".to_string(),
        correlation_id: CORRELATION_ID_1.to_string(),
        asset_name: "Gold Token".to_string(),
        asset_symbol: "GLD".to_string(),
        current_status: status,
        transaction_hash: transaction_hash.map(str::to_string),
        asset_identifier: None,
        confirmed_round: None,
        error_message: None,
        created_at: fixed_timestamp(),
        updated_at: fixed_timestamp(),
    }
}

/// Creation command for `network`
pub fn create_command(network: &str) -> CreateDeploymentCommand {
    CreateDeploymentCommand {
        token_standard: TokenStandard::Erc20,
        network: network.to_string(),
        correlation_id: CORRELATION_ID_1.to_string(),
        asset_name: "Gold Token".to_string(),
        asset_symbol: "GLD".to_string(),
    }
}

/// Service over an empty in-memory store, with the sink it emits to
pub fn service_with_sink() -> (
    Arc<StoreBackedDeploymentStatusService>,
    Arc<CollectingNotificationSink>,
) {
    let sink = Arc::new(CollectingNotificationSink::new());
    let service = StoreBackedDeploymentStatusService::new(
        Arc::new(InMemoryDeploymentStore::new()),
        sink.clone(),
    );
    (Arc::new(service), sink)
}
