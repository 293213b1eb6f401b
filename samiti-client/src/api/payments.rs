//! Payment verification against the backend

use std::sync::Arc;

use async_trait::async_trait;
use shared::ApiResponse;
use shared::models::PaymentVerification;

use super::into_data;
use crate::client::HttpClient;
use crate::payment::{PaymentVerifier, PaymentWatcher, WatcherConfig};
use crate::ClientResult;

pub struct PaymentApi<C> {
    http: Arc<C>,
}

impl<C> Clone for PaymentApi<C> {
    fn clone(&self) -> Self {
        Self {
            http: self.http.clone(),
        }
    }
}

impl<C: HttpClient + 'static> PaymentApi<C> {
    pub fn new(http: Arc<C>) -> Self {
        Self { http }
    }

    pub fn verify_path(order_id: &str) -> String {
        format!("api/payments/{}/verify", order_id)
    }

    /// Watcher polling this API
    pub fn watcher(&self, config: WatcherConfig) -> PaymentWatcher<Self> {
        PaymentWatcher::new(Arc::new(self.clone()), config)
    }
}

#[async_trait]
impl<C: HttpClient + 'static> PaymentVerifier for PaymentApi<C> {
    async fn verify(&self, order_id: &str) -> ClientResult<PaymentVerification> {
        self.http
            .get::<ApiResponse<PaymentVerification>>(&Self::verify_path(order_id))
            .await
            .and_then(into_data)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::payment::WatchState;
    use crate::testing::ScriptedClient;
    use serde_json::json;
    use shared::models::TransactionStatus;
    use std::time::Duration;

    #[tokio::test(start_paused = true)]
    async fn test_watcher_confirms_through_backend() {
        let client = ScriptedClient::new();
        let path = PaymentApi::<ScriptedClient>::verify_path("order_9");
        client.ok("GET", &path, json!({"orderId": "order_9", "status": "PENDING"}));
        client.ok(
            "GET",
            &path,
            json!({"orderId": "order_9", "status": "SUCCESS", "transactionId": "pay_1", "receiptNumber": "R-9"}),
        );
        let client = Arc::new(client);
        let api = PaymentApi::new(client.clone());

        let mut handle = api.watcher(WatcherConfig::default()).start("order_9");
        let WatchState::Confirmed(verification) = handle.finished().await else {
            panic!("expected confirmation");
        };
        assert_eq!(verification.status, TransactionStatus::Success);
        assert_eq!(verification.receipt_number.as_deref(), Some("R-9"));
        assert_eq!(client.count("GET", &path), 2);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unknown_order_fails_watch() {
        let client = ScriptedClient::new();
        client.fail("GET", &PaymentApi::<ScriptedClient>::verify_path("nope"), 404, "Order not found");
        let api = PaymentApi::new(Arc::new(client));

        let config = WatcherConfig {
            interval: Duration::from_secs(1),
            horizon: Duration::from_secs(5),
        };
        let mut handle = api.watcher(config).start("nope");
        assert_eq!(handle.finished().await, WatchState::Failed("Order not found".into()));
    }
}
