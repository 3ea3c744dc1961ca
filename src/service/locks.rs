// Copyright (c) 2025 - Cowboy AI, Inc.
//! Per-deployment mutual exclusion
//!
//! Status updates are read-modify-write sequences. Holding the lock for a
//! deployment id serializes them for that id only; different ids never
//! wait on each other beyond the brief map lookup.
//!
//! An entry lives only while a guard for it is held or awaited. The last
//! guard to drop removes it, so ids that were looked up once (including
//! unknown ones) leave nothing behind.

use std::collections::HashMap;
use std::sync::{Arc, Mutex as StdMutex, PoisonError};
use tokio::sync::{Mutex, OwnedMutexGuard};
use uuid::Uuid;

type Registry = Arc<StdMutex<HashMap<Uuid, Arc<Mutex<()>>>>>;

/// Lock registry keyed by deployment id
#[derive(Debug, Default)]
pub struct DeploymentLocks {
    locks: Registry,
}

/// Exclusive access to one deployment; released on drop
#[derive(Debug)]
pub struct DeploymentLockGuard {
    deployment_id: Uuid,
    registry: Registry,
    guard: Option<OwnedMutexGuard<()>>,
}

impl DeploymentLocks {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wait for exclusive access to `deployment_id`
    pub async fn acquire(&self, deployment_id: Uuid) -> DeploymentLockGuard {
        // The registry mutex is never held across an await
        let lock = {
            let mut locks = self.locks.lock().unwrap_or_else(PoisonError::into_inner);
            Arc::clone(locks.entry(deployment_id).or_default())
        };

        DeploymentLockGuard {
            deployment_id,
            registry: Arc::clone(&self.locks),
            guard: Some(lock.lock_owned().await),
        }
    }

    /// Number of ids currently locked or awaited
    pub fn len(&self) -> usize {
        self.locks
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

impl Drop for DeploymentLockGuard {
    fn drop(&mut self) {
        drop(self.guard.take());

        let mut locks = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        // Only the registry still references the mutex: no holder, no waiter
        if locks
            .get(&self.deployment_id)
            .is_some_and(|lock| Arc::strong_count(lock) == 1)
        {
            locks.remove(&self.deployment_id);
        }
    }
}
