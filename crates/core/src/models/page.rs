//! Paginated list envelope.

use serde::{Deserialize, Serialize};

/// One page of a backend list endpoint.
///
/// The backend is not consistent about naming: lists arrive under `data`,
/// `items`, `products` or `docs`, and the page count under `totalPages` or
/// `pages`. All of them land here.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Page<T> {
    #[serde(alias = "items", alias = "products", alias = "docs", alias = "results")]
    pub data: Vec<T>,
    #[serde(default, alias = "currentPage")]
    pub page: Option<u32>,
    #[serde(default, alias = "pages", alias = "pageCount")]
    pub total_pages: Option<u32>,
    #[serde(default, alias = "totalItems", alias = "count", alias = "totalDocs")]
    pub total: Option<u64>,
}

impl<T> Page<T> {
    /// Page with the given items and no paging metadata.
    #[must_use]
    pub const fn from_items(data: Vec<T>) -> Self {
        Self {
            data,
            page: None,
            total_pages: None,
            total: None,
        }
    }

    /// Whether the backend says there is a page after `current` (1-based).
    ///
    /// Without a page count, a page shorter than `take` is the last one.
    #[must_use]
    pub fn has_more(&self, current: u32, take: usize) -> bool {
        match self.total_pages {
            Some(total) => current < total,
            None => !self.data.is_empty() && self.data.len() >= take,
        }
    }
}
