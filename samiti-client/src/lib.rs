//! Samiti Client - typed client for the Samiti membership backend
//!
//! HTTP adapter with bearer injection, persisted session, per-entity
//! resource slices, async operations over them, payment status polling and
//! view models.

pub mod api;
pub mod client;
pub mod config;
pub mod error;
pub mod payment;
pub mod session;
pub mod store;
pub mod view;

#[cfg(test)]
pub(crate) mod testing;

pub use api::SamitiApi;
pub use client::{HttpClient, NetworkHttpClient};
pub use config::ClientConfig;
pub use error::{ClientError, ClientResult};
pub use payment::{PaymentVerifier, PaymentWatcher, WatchHandle, WatchState, WatcherConfig};
pub use session::{Session, SessionError, SessionStore};
pub use store::{Resource, ResourceSlice, SliceHandle, Status, Store};
pub use view::RenderState;

// Re-export shared types for convenience
pub use shared::{Action, ApiResponse, ListQuery, Pagination, Role};
