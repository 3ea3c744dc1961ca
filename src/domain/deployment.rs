// Copyright (c) 2025 - Cowboy AI, Inc.
//! Token Deployment Records
//!
//! A [`TokenDeployment`] is one attempt to create a token on a specific
//! network. Its status history is an append-only list of
//! [`DeploymentStatusHistoryEntry`] values; the record's `current_status`
//! always equals the status of the newest history entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;
use uuid::Uuid;

use super::DeploymentStatus;

/// Metadata key recording whether a failure may be retried
pub const METADATA_IS_RETRYABLE: &str = "isRetryable";

/// Metadata key recording the guard's reason code for the transition
pub const METADATA_REASON_CODE: &str = "reasonCode";

/// Metadata key recording the failure message that preceded a retry
pub const METADATA_RETRY_OF: &str = "retryOf";

/// Token standard being deployed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TokenStandard {
    /// EVM fungible token
    Erc20,
    /// EVM non-fungible token
    Erc721,
    /// EVM multi-token
    Erc1155,
    /// Algorand Standard Asset
    Asa,
    /// Algorand ARC-3 asset (IPFS metadata)
    Arc3,
    /// Algorand ARC-19 asset (mutable metadata)
    Arc19,
    /// Algorand ARC-69 asset (note-field metadata)
    Arc69,
    /// Algorand ARC-200 smart-contract token
    Arc200,
    /// Algorand ARC-1400 security token
    Arc1400,
}

impl TokenStandard {
    /// Get the canonical string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Erc20 => "erc20",
            Self::Erc721 => "erc721",
            Self::Erc1155 => "erc1155",
            Self::Asa => "asa",
            Self::Arc3 => "arc3",
            Self::Arc19 => "arc19",
            Self::Arc69 => "arc69",
            Self::Arc200 => "arc200",
            Self::Arc1400 => "arc1400",
        }
    }

    /// Whether the token lives on an EVM chain
    pub fn is_evm(&self) -> bool {
        matches!(self, Self::Erc20 | Self::Erc721 | Self::Erc1155)
    }
}

impl fmt::Display for TokenStandard {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str().to_uppercase())
    }
}

/// One deployment attempt, tracked from queueing to a terminal outcome
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenDeployment {
    /// Unique identifier, assigned at creation and never reused
    pub deployment_id: Uuid,

    /// Token standard (immutable)
    pub token_standard: TokenStandard,

    /// Target network, e.g. `base-mainnet` or `mainnet-v1.0` (immutable)
    pub network: String,

    /// Caller-supplied correlation id for request tracing
    pub correlation_id: String,

    /// Token name (immutable)
    pub asset_name: String,

    /// Token symbol / unit name (immutable)
    pub asset_symbol: String,

    /// Current lifecycle status
    ///
    /// **Invariant**: equals the status of the newest history entry
    pub current_status: DeploymentStatus,

    /// Transaction hash, set once the transaction is built
    ///
    /// **Invariant**: present whenever the deployment has entered `Submitted`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transaction_hash: Option<String>,

    /// On-chain identifier (contract address or asset id)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub asset_identifier: Option<String>,

    /// Round / block height at which the transaction was confirmed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub confirmed_round: Option<u64>,

    /// Failure description while in `Failed`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_message: Option<String>,

    /// Creation timestamp
    pub created_at: DateTime<Utc>,

    /// Last mutation timestamp
    pub updated_at: DateTime<Utc>,
}

impl TokenDeployment {
    /// Create a new deployment in `Queued`
    pub fn new(
        token_standard: TokenStandard,
        network: impl Into<String>,
        correlation_id: impl Into<String>,
        asset_name: impl Into<String>,
        asset_symbol: impl Into<String>,
    ) -> Self {
        let now = Utc::now();

        Self {
            deployment_id: Uuid::now_v7(),
            token_standard,
            network: network.into(),
            correlation_id: correlation_id.into(),
            asset_name: asset_name.into(),
            asset_symbol: asset_symbol.into(),
            current_status: DeploymentStatus::Queued,
            transaction_hash: None,
            asset_identifier: None,
            confirmed_round: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }

    /// Whether a non-empty transaction hash is recorded
    pub fn has_transaction_hash(&self) -> bool {
        self.transaction_hash
            .as_deref()
            .is_some_and(|hash| !hash.trim().is_empty())
    }

    /// Whether the deployment has reached a terminal status
    pub fn is_terminal(&self) -> bool {
        self.current_status.is_terminal()
    }

    /// Bump `updated_at`
    pub fn touch(&mut self) {
        self.updated_at = Utc::now();
    }
}

/// One accepted status change, in creation order
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentStatusHistoryEntry {
    /// Entry identifier (UUID v7, time ordered)
    pub entry_id: Uuid,

    /// Deployment this entry belongs to
    pub deployment_id: Uuid,

    /// Status entered by this change
    pub status: DeploymentStatus,

    /// Free-text description
    pub message: String,

    /// Extra context, e.g. `isRetryable` on failures
    #[serde(skip_serializing_if = "HashMap::is_empty", default)]
    pub metadata: HashMap<String, String>,

    /// When the change was accepted
    pub timestamp: DateTime<Utc>,
}

impl DeploymentStatusHistoryEntry {
    /// Create an entry stamped now
    pub fn new(deployment_id: Uuid, status: DeploymentStatus, message: impl Into<String>) -> Self {
        Self {
            entry_id: Uuid::now_v7(),
            deployment_id,
            status,
            message: message.into(),
            metadata: HashMap::new(),
            timestamp: Utc::now(),
        }
    }

    /// Add a metadata entry
    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }
}
