//! Token deployment lifecycle orchestration
//!
//! Tracks each token deployment from queueing to a terminal outcome,
//! guards every status transition, and classifies failures into retry
//! policies. Persistence and notification sit behind traits so the core
//! stays agnostic of storage and transport.

pub mod config;
pub mod domain;
pub mod errors;
pub mod nats;
pub mod notification;
pub mod retry;
pub mod service;
pub mod state_machine;
pub mod store;
pub mod subjects;

// Re-export commonly used types
pub use config::{OrchestratorConfig, PaginationConfig, RetryConfig};
pub use domain::{
    DeploymentFilter, DeploymentPage, DeploymentStatus, DeploymentStatusHistoryEntry,
    TokenDeployment, TokenStandard,
};
pub use errors::{InfrastructureError, InfrastructureResult};
pub use nats::{NatsClient, NatsConfig};
pub use notification::{NotificationSink, StatusChangeEvent};
pub use retry::{classify_error, ErrorCategory, RetryDecision, RetryPolicy, RetryPolicyClassifier};
pub use service::{
    CreateDeploymentCommand, DeploymentStatusService, ServiceError, ServiceResult,
    StatusUpdate, StoreBackedDeploymentStatusService, UpdateStatusCommand,
};
pub use state_machine::{get_valid_next_states, validate_transition, TransitionValidationResult};
pub use store::{DeploymentRecordStore, InMemoryDeploymentStore};
