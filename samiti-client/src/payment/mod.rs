//! Payment confirmation
//!
//! After checkout the gateway settles asynchronously. [`PaymentWatcher`]
//! asks the backend to verify an order on a fixed interval until the order
//! is terminal or the horizon passes.

mod watcher;

pub use watcher::{PaymentWatcher, WatchHandle, WatchState, WatcherConfig};

use async_trait::async_trait;
use shared::models::PaymentVerification;

use crate::ClientResult;

/// Source of truth for an order's settlement status
#[async_trait]
pub trait PaymentVerifier: Send + Sync + 'static {
    async fn verify(&self, order_id: &str) -> ClientResult<PaymentVerification>;
}
