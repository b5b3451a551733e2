//! Common types used across the platform

use serde::{Deserialize, Serialize};

/// Default page size for list endpoints
pub const DEFAULT_LIST_LIMIT: u32 = 100;

/// Largest page a single list request may return
pub const MAX_LIST_LIMIT: u32 = 1000;

/// Offset pagination parameters (`?skip=0&limit=100`)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct ListParams {
    #[serde(default)]
    pub skip: u32,
    #[serde(default = "default_limit")]
    pub limit: u32,
}

fn default_limit() -> u32 {
    DEFAULT_LIST_LIMIT
}

impl Default for ListParams {
    fn default() -> Self {
        Self {
            skip: 0,
            limit: DEFAULT_LIST_LIMIT,
        }
    }
}

impl ListParams {
    pub fn new(skip: u32, limit: u32) -> Self {
        Self { skip, limit }
    }

    /// SQL `OFFSET` value
    pub fn offset(&self) -> i64 {
        i64::from(self.skip)
    }

    /// SQL `LIMIT` value, clamped to `1..=MAX_LIST_LIMIT`
    pub fn effective_limit(&self) -> i64 {
        i64::from(self.limit.clamp(1, MAX_LIST_LIMIT))
    }
}
