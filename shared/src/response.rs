//! API Response types
//!
//! Every backend response follows the same envelope:
//! ```json
//! {
//!     "success": true,
//!     "message": "Members fetched",
//!     "data": [ ... ],
//!     "pagination": { "page": 1, "limit": 20, "total": 42 }
//! }
//! ```
//! Failures carry `success: false`, a message, and optionally a field map
//! under `errors`.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// Field name -> human readable problem
pub type FieldErrors = BTreeMap<String, String>;

/// Unified API response structure
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiResponse<T> {
    /// Whether the backend considers the call successful
    #[serde(default = "default_success")]
    pub success: bool,
    /// Human-readable message
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    /// Response data (optional)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Present on list endpoints
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pagination: Option<Pagination>,
    /// Field-level validation problems
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub errors: Option<FieldErrors>,
}

fn default_success() -> bool {
    true
}

/// A response envelope that reported `success: false`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiFailure {
    pub message: String,
    pub fields: FieldErrors,
}

impl<T> ApiResponse<T> {
    /// Create a successful response
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            message: None,
            data: Some(data),
            pagination: None,
            errors: None,
        }
    }

    /// Create a successful list response
    pub fn page(data: T, pagination: Pagination) -> Self {
        Self {
            pagination: Some(pagination),
            ..Self::ok(data)
        }
    }

    /// Create an error response
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
            data: None,
            pagination: None,
            errors: None,
        }
    }

    /// Attach field errors to a response
    pub fn with_errors(mut self, errors: FieldErrors) -> Self {
        self.errors = Some(errors);
        self
    }

    /// Reject envelopes that reported failure, otherwise hand back the envelope.
    pub fn check(self) -> Result<Self, ApiFailure> {
        if self.success {
            return Ok(self);
        }
        Err(ApiFailure {
            message: self
                .message
                .unwrap_or_else(|| "Request failed".to_string()),
            fields: self.errors.unwrap_or_default(),
        })
    }
}

/// Pagination metadata
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Current page number (1-based)
    pub page: u32,
    /// Items per page
    pub limit: u32,
    /// Total number of items
    pub total: u64,
}

impl Pagination {
    pub fn new(page: u32, limit: u32, total: u64) -> Self {
        Self { page, limit, total }
    }

    /// Pagination for an unpaginated list holding `len` items
    pub fn single_page(len: usize) -> Self {
        Self::new(1, len as u32, len as u64)
    }

    pub fn total_pages(&self) -> u32 {
        if self.limit == 0 {
            return 0;
        }
        self.total.div_ceil(u64::from(self.limit)) as u32
    }

    pub fn has_next(&self) -> bool {
        self.page < self.total_pages()
    }
}

impl Default for Pagination {
    fn default() -> Self {
        Self::new(1, 20, 0)
    }
}
