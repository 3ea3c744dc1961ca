// Copyright (c) 2025 - Cowboy AI, Inc.
//! Orchestrator configuration
//!
//! Defaults match production behavior; every value can be overridden from
//! the environment via [`OrchestratorConfig::from_env`].

use std::str::FromStr;
use std::time::Duration;

use crate::errors::{InfrastructureError, InfrastructureResult};
use crate::nats::NatsConfig;

/// Retry timing used by the retry policy classifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetryConfig {
    /// Retry window measured from the first attempt
    pub retry_window: Duration,

    /// Base delay for plain delayed retries (seconds)
    pub base_delay_secs: u64,

    /// Base delay for cooldown retries (seconds)
    pub cooldown_delay_secs: u64,

    /// Upper bound for any computed delay (seconds)
    pub max_delay_secs: u64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            retry_window: Duration::from_secs(600),
            base_delay_secs: 5,
            cooldown_delay_secs: 60,
            max_delay_secs: 300,
        }
    }
}

impl RetryConfig {
    /// Reject settings that would make retry decisions meaningless
    pub fn validate(&self) -> InfrastructureResult<()> {
        if self.retry_window.is_zero() {
            return Err(InfrastructureError::Configuration(
                "retry window must be greater than zero".to_string(),
            ));
        }
        if self.base_delay_secs == 0 || self.cooldown_delay_secs == 0 {
            return Err(InfrastructureError::Configuration(
                "base retry delays must be greater than zero".to_string(),
            ));
        }
        if self.max_delay_secs == 0 {
            return Err(InfrastructureError::Configuration(
                "max retry delay must be greater than zero".to_string(),
            ));
        }
        if self.base_delay_secs > self.max_delay_secs
            || self.cooldown_delay_secs > self.max_delay_secs
        {
            return Err(InfrastructureError::Configuration(format!(
                "base delays ({}s, {}s) must not exceed max delay {}s",
                self.base_delay_secs, self.cooldown_delay_secs, self.max_delay_secs
            )));
        }
        Ok(())
    }
}

/// Listing limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PaginationConfig {
    pub default_page_size: u32,
    pub max_page_size: u32,
}

impl Default for PaginationConfig {
    fn default() -> Self {
        Self {
            default_page_size: 20,
            max_page_size: 100,
        }
    }
}

/// Top-level configuration
#[derive(Debug, Clone)]
pub struct OrchestratorConfig {
    pub retry: RetryConfig,
    pub pagination: PaginationConfig,
    pub nats: NatsConfig,

    /// Root of the status-change subject hierarchy
    pub subject_prefix: String,
}

impl Default for OrchestratorConfig {
    fn default() -> Self {
        Self {
            retry: RetryConfig::default(),
            pagination: PaginationConfig::default(),
            nats: NatsConfig::default(),
            subject_prefix: crate::subjects::DEPLOYMENTS_ROOT.to_string(),
        }
    }
}

impl OrchestratorConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> InfrastructureResult<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Load configuration through an arbitrary key lookup
    pub fn from_lookup<F>(lookup: F) -> InfrastructureResult<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();

        let retry = RetryConfig {
            retry_window: Duration::from_secs(parse_or(
                &lookup,
                "DEPLOYMENT_RETRY_WINDOW_SECS",
                defaults.retry.retry_window.as_secs(),
            )?),
            base_delay_secs: parse_or(
                &lookup,
                "DEPLOYMENT_RETRY_BASE_DELAY_SECS",
                defaults.retry.base_delay_secs,
            )?,
            cooldown_delay_secs: parse_or(
                &lookup,
                "DEPLOYMENT_RETRY_COOLDOWN_SECS",
                defaults.retry.cooldown_delay_secs,
            )?,
            max_delay_secs: parse_or(
                &lookup,
                "DEPLOYMENT_RETRY_MAX_DELAY_SECS",
                defaults.retry.max_delay_secs,
            )?,
        };
        retry.validate()?;

        let pagination = PaginationConfig {
            default_page_size: parse_or(
                &lookup,
                "DEPLOYMENT_DEFAULT_PAGE_SIZE",
                defaults.pagination.default_page_size,
            )?,
            max_page_size: parse_or(
                &lookup,
                "DEPLOYMENT_MAX_PAGE_SIZE",
                defaults.pagination.max_page_size,
            )?,
        };

        let mut nats = defaults.nats;
        if let Some(urls) = lookup("NATS_URL") {
            nats.servers = urls
                .split(',')
                .map(str::trim)
                .filter(|url| !url.is_empty())
                .map(str::to_string)
                .collect();
        }
        if let Some(name) = lookup("NATS_CLIENT_NAME") {
            nats.name = name;
        }

        let subject_prefix = lookup("DEPLOYMENT_SUBJECT_PREFIX").unwrap_or(defaults.subject_prefix);

        Ok(Self {
            retry,
            pagination,
            nats,
            subject_prefix,
        })
    }
}

fn parse_or<F, T>(lookup: &F, key: &str, default: T) -> InfrastructureResult<T>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        Some(raw) => raw.trim().parse().map_err(|_| {
            InfrastructureError::Configuration(format!("{} has invalid value {:?}", key, raw))
        }),
        None => Ok(default),
    }
}
