//! Donations: listing, initiation and receipts

use std::path::{Path, PathBuf};
use std::sync::Arc;

use rust_decimal::Decimal;
use shared::models::{Donation, DonationRequest, DonorSnapshot, PaymentOrder};
use shared::{ApiResponse, ListQuery};
use uuid::Uuid;

use super::{ResourceApi, into_data};
use crate::client::HttpClient;
use crate::store::{MutationOutcome, SliceHandle};
use crate::{ClientError, ClientResult};

pub const DONATIONS_PATH: &str = "api/donations";
pub const VISITOR_DONATION_PATH: &str = "api/donations/visitor";
pub const MEMBER_DONATION_PATH: &str = "api/donations/member";
pub const MY_DONATIONS_PATH: &str = "api/members/me/donations";

pub struct DonationApi<C> {
    inner: ResourceApi<Donation, C>,
}

impl<C> Clone for DonationApi<C> {
    fn clone(&self) -> Self {
        Self {
            inner: self.inner.clone(),
        }
    }
}

impl<C: HttpClient> DonationApi<C> {
    pub fn new(http: Arc<C>, slice: SliceHandle<Donation>) -> Self {
        Self {
            inner: ResourceApi::new(http, slice, DONATIONS_PATH),
        }
    }

    pub fn slice(&self) -> &SliceHandle<Donation> {
        self.inner.slice()
    }

    /// All donations (back office)
    pub async fn list(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list(query).await
    }

    pub async fn get(&self, id: &str) -> ClientResult<Donation> {
        self.inner.fetch_by_id(id).await
    }

    /// Donations of the logged-in member
    pub async fn my_donations(&self, query: &ListQuery) -> ClientResult<usize> {
        self.inner.fetch_list_from(MY_DONATIONS_PATH, query).await
    }

    /// Start an anonymous donation; returns the gateway order to pay
    pub async fn donate_as_visitor(&self, amount: Decimal, donor: DonorSnapshot) -> ClientResult<PaymentOrder> {
        let mut donor = donor;
        donor.name = donor.name.trim().to_string();
        if donor.name.is_empty() {
            return Err(self
                .inner
                .reject_locally(ClientError::field("name", "Donor name is required")));
        }
        self.initiate(VISITOR_DONATION_PATH, amount, donor).await
    }

    /// Start a donation as the logged-in member
    pub async fn donate_as_member(&self, amount: Decimal) -> ClientResult<PaymentOrder> {
        let donor = self
            .inner
            .http()
            .session()
            .current()
            .map(|s| DonorSnapshot {
                name: s.principal.name().to_string(),
                ..Default::default()
            })
            .unwrap_or_default();
        self.initiate(MEMBER_DONATION_PATH, amount, donor).await
    }

    async fn initiate(&self, path: &str, amount: Decimal, donor: DonorSnapshot) -> ClientResult<PaymentOrder> {
        validate_amount(amount).map_err(|e| self.inner.reject_locally(e))?;

        let body = DonationRequest {
            amount,
            donor,
            client_reference: Uuid::new_v4().to_string(),
        };
        tracing::info!(%amount, reference = %body.client_reference, "Initiating donation");
        let http = self.inner.http();
        let request = async {
            http.post::<ApiResponse<PaymentOrder>, _>(path, &body)
                .await
                .and_then(into_data)
        };
        self.inner
            .run_action("initiate", request, |_| MutationOutcome::Unchanged)
            .await
    }

    /// Save the receipt of a successful donation into `dir`
    pub async fn download_receipt(&self, donation: &Donation, dir: &Path) -> ClientResult<PathBuf> {
        let Some(number) = donation.receipt_number.as_deref().filter(|_| donation.has_receipt()) else {
            return Err(ClientError::InvalidState(
                "A receipt is only available for successful donations".to_string(),
            ));
        };
        let path = format!("{}/receipt", self.inner.item_path(&donation.id));
        self.inner
            .download(&path, dir, &format!("receipt-{}.pdf", number))
            .await
    }
}

/// Amounts must be positive
pub fn validate_amount(amount: Decimal) -> ClientResult<()> {
    if amount <= Decimal::ZERO {
        return Err(ClientError::field("amount", "Amount must be greater than zero"));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::Status;
    use crate::testing::{Reply, ScriptedClient, fixtures};
    use serde_json::json;
    use shared::models::TransactionStatus;

    fn api(client: ScriptedClient) -> DonationApi<ScriptedClient> {
        DonationApi::new(Arc::new(client), SliceHandle::new())
    }

    fn order() -> serde_json::Value {
        json!({"orderId": "order_1", "amount": 250, "checkoutUrl": "https://pay.example/o/1"})
    }

    #[tokio::test]
    async fn test_list_parses_decimal_amounts() {
        let client = ScriptedClient::new();
        client.ok(
            "GET",
            DONATIONS_PATH,
            json!([fixtures::donation("d1", 500, "SUCCESS"), fixtures::donation("d2", 120, "PENDING")]),
        );
        let api = api(client);

        assert_eq!(api.list(&ListQuery::all()).await.unwrap(), 2);
        let slice = api.slice().snapshot();
        assert_eq!(slice.items[0].amount, Decimal::from(500));
        assert_eq!(slice.items[1].status, TransactionStatus::Pending);
    }

    #[tokio::test]
    async fn test_pending_row_loses_receipt_number() {
        let client = ScriptedClient::new();
        let mut pending = fixtures::donation("d2", 120, "PENDING");
        pending["receiptNumber"] = json!("R-2");
        let mut paid = fixtures::donation("d1", 500, "SUCCESS");
        paid["receiptNumber"] = json!("R-1");
        client.ok("GET", DONATIONS_PATH, json!([paid, pending]));
        let api = api(client);

        api.list(&ListQuery::all()).await.unwrap();
        let slice = api.slice().snapshot();
        assert_eq!(slice.items[0].receipt_number.as_deref(), Some("R-1"));
        assert_eq!(slice.items[1].receipt_number, None);
    }

    #[tokio::test]
    async fn test_visitor_donation_returns_order() {
        let client = ScriptedClient::new();
        client.ok("POST", VISITOR_DONATION_PATH, order());
        let api = api(client);

        let donor = DonorSnapshot {
            name: " Meera ".into(),
            ..Default::default()
        };
        let order = api.donate_as_visitor(Decimal::from(250), donor).await.unwrap();
        assert_eq!(order.order_id, "order_1");
        assert_eq!(order.currency, "INR");

        let call = &api.inner.http().calls()[0];
        let body = call.body.as_ref().unwrap();
        assert_eq!(body["donor"]["name"], "Meera");
        assert!(Uuid::parse_str(body["clientReference"].as_str().unwrap()).is_ok());
        assert_eq!(api.slice().snapshot().action_status, Status::Succeeded);
    }

    #[tokio::test]
    async fn test_non_positive_amount_never_sent() {
        let api = api(ScriptedClient::new());
        let donor = DonorSnapshot {
            name: "Meera".into(),
            ..Default::default()
        };
        let err = api.donate_as_visitor(Decimal::ZERO, donor).await.unwrap_err();
        assert!(err.field_errors().unwrap().contains_key("amount"));
        let err = api.donate_as_member(Decimal::from(-5)).await.unwrap_err();
        assert!(matches!(err, ClientError::Validation { .. }));
        assert!(api.inner.http().calls().is_empty());
        assert_eq!(api.slice().snapshot().action_status, Status::Failed);
    }

    #[tokio::test]
    async fn test_my_donations_fill_slice() {
        let client = ScriptedClient::new();
        client.ok("GET", MY_DONATIONS_PATH, json!([fixtures::donation("d7", 100, "FAILED")]));
        let api = api(client);

        api.my_donations(&ListQuery::all()).await.unwrap();
        assert_eq!(api.slice().snapshot().items[0].id, "d7");
    }

    #[tokio::test]
    async fn test_receipt_download_requires_success() {
        let dir = tempfile::TempDir::new().unwrap();
        let client = ScriptedClient::new();
        client.reply("GET", "api/donations/d1/receipt", Reply::Bytes(b"%PDF".to_vec()));
        let api = api(client);

        let mut donation: Donation =
            serde_json::from_value(fixtures::donation("d1", 500, "PENDING")).unwrap();
        donation.receipt_number = Some("R-9".into());
        let err = api.download_receipt(&donation, dir.path()).await.unwrap_err();
        assert!(matches!(err, ClientError::InvalidState(_)));

        donation.status = TransactionStatus::Success;
        let path = api.download_receipt(&donation, dir.path()).await.unwrap();
        assert_eq!(path.file_name().unwrap(), "receipt-R-9.pdf");
    }
}
