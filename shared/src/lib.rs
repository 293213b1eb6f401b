//! Shared types for Samiti
//!
//! Wire types consumed by the client: the response envelope, pagination,
//! list queries, entity models, and the operator role gate.

pub mod auth;
pub mod models;
pub mod permissions;
pub mod query;
pub mod response;

// Re-exports
pub use serde::{Deserialize, Serialize};

pub use permissions::{Action, Role};
pub use query::ListQuery;
pub use response::{ApiFailure, ApiResponse, FieldErrors, Pagination};
