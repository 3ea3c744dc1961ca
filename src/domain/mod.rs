// Copyright (c) 2025 - Cowboy AI, Inc.
//! Token Deployment Domain Models
//!
//! Core records owned by the deployment status service.
//!
//! - [`DeploymentStatus`] - lifecycle vocabulary and edge table
//! - [`TokenDeployment`] - the current record for one deployment attempt
//! - [`DeploymentStatusHistoryEntry`] - append-only audit of accepted changes
//! - [`DeploymentFilter`] / [`DeploymentPage`] - listing and pagination

pub mod deployment;
pub mod query;
pub mod status;

pub use deployment::{
    DeploymentStatusHistoryEntry, TokenDeployment, TokenStandard, METADATA_IS_RETRYABLE,
    METADATA_REASON_CODE, METADATA_RETRY_OF,
};
pub use query::{DeploymentFilter, DeploymentPage};
pub use status::DeploymentStatus;
