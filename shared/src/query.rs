//! List query parameters
//!
//! Serialized into the request query string (`?page=2&limit=20&status=ACTIVE`).

use serde::{Deserialize, Serialize};

/// Query for list endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ListQuery {
    /// Page number (1-based)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<u32>,
    /// Items per page
    #[serde(skip_serializing_if = "Option::is_none")]
    pub limit: Option<u32>,
    /// Status filter, already in wire form (e.g. "ACTIVE", "SUCCESS")
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    /// Free text search (name, registration number, receipt number...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub search: Option<String>,
}

impl ListQuery {
    /// Query for everything the backend returns by default
    pub fn all() -> Self {
        Self::default()
    }

    /// Add pagination
    pub fn paginate(mut self, page: u32, limit: u32) -> Self {
        self.page = Some(page);
        self.limit = Some(limit);
        self
    }

    /// Filter by status
    pub fn with_status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    /// Filter by search text; blank text clears the filter
    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        let search = search.into();
        let trimmed = search.trim();
        self.search = (!trimmed.is_empty()).then(|| trimmed.to_string());
        self
    }
}
