//! Paginated list envelopes.

use serde::{Deserialize, Serialize};

/// Pagination metadata returned alongside list data.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "camelCase")]
pub struct PageMeta {
    pub page: u32,
    pub limit: u32,
    pub total: u64,
    pub total_pages: u32,
    pub has_next: bool,
    pub has_prev: bool,
}

/// Generic `{ data, meta }` list returned by the catalogue and admin
/// user endpoints.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DataListResponse<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: PageMeta,
}

impl<T> DataListResponse<T> {
    /// Whether the page holds no items.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}
