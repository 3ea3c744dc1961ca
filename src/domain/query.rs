// Copyright (c) 2025 - Cowboy AI, Inc.
//! Listing filters and paginated results

use serde::{Deserialize, Serialize};

use super::{DeploymentStatus, TokenDeployment, TokenStandard};

/// Filter for listing deployments. Pages are 1-based.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentFilter {
    /// Only deployments on this network
    pub network: Option<String>,

    /// Only deployments currently in this status
    pub status: Option<DeploymentStatus>,

    /// Only deployments of this token standard
    pub token_standard: Option<TokenStandard>,

    /// Only deployments created under this correlation id
    pub correlation_id: Option<String>,

    /// Requested page; values below 1 are treated as 1
    pub page: u32,

    /// Requested page size; 0 selects the configured default
    pub page_size: u32,
}

impl DeploymentFilter {
    /// Filter with no predicates, first page
    pub fn new() -> Self {
        Self {
            page: 1,
            ..Self::default()
        }
    }

    pub fn with_network(mut self, network: impl Into<String>) -> Self {
        self.network = Some(network.into());
        self
    }

    pub fn with_status(mut self, status: DeploymentStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_token_standard(mut self, standard: TokenStandard) -> Self {
        self.token_standard = Some(standard);
        self
    }

    pub fn with_correlation_id(mut self, correlation_id: impl Into<String>) -> Self {
        self.correlation_id = Some(correlation_id.into());
        self
    }

    pub fn with_page(mut self, page: u32, page_size: u32) -> Self {
        self.page = page;
        self.page_size = page_size;
        self
    }

    /// Whether a deployment satisfies every predicate set on this filter
    pub fn matches(&self, deployment: &TokenDeployment) -> bool {
        self.network
            .as_deref()
            .map_or(true, |network| deployment.network.eq_ignore_ascii_case(network))
            && self
                .status
                .map_or(true, |status| deployment.current_status == status)
            && self
                .token_standard
                .map_or(true, |standard| deployment.token_standard == standard)
            && self
                .correlation_id
                .as_deref()
                .map_or(true, |id| deployment.correlation_id == id)
    }

    /// Resolve `(page, page_size)` against pagination limits
    pub fn normalized_page(&self, default_page_size: u32, max_page_size: u32) -> (u32, u32) {
        let page = self.page.max(1);
        let page_size = match self.page_size {
            0 => default_page_size,
            requested => requested,
        }
        .clamp(1, max_page_size.max(1));

        (page, page_size)
    }
}

/// One page of deployments
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeploymentPage {
    /// Deployments on this page
    pub items: Vec<TokenDeployment>,

    /// Number of deployments matching the filter across all pages
    pub total_count: usize,

    /// 1-based page number
    pub page: u32,

    /// Page size used
    pub page_size: u32,

    /// `ceil(total_count / page_size)`, 0 when nothing matched
    pub total_pages: u32,
}

impl DeploymentPage {
    /// Slice an already filtered and ordered list into the requested page
    pub fn from_matches(matches: Vec<TokenDeployment>, page: u32, page_size: u32) -> Self {
        let total_count = matches.len();
        let size = page_size.max(1) as usize;
        let total_pages = u32::try_from(total_count.div_ceil(size)).unwrap_or(u32::MAX);
        let skip = (page.max(1) as usize - 1).saturating_mul(size);

        let items = matches.into_iter().skip(skip).take(size).collect();

        Self {
            items,
            total_count,
            page,
            page_size,
            total_pages,
        }
    }

    /// Whether a later page exists
    pub fn has_next_page(&self) -> bool {
        self.page < self.total_pages
    }
}
