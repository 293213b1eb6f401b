//! Donation and payment models

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Gateway transaction status shared by donations and fee payments.
///
/// `Pending` moves to `Success` or `Failed` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransactionStatus {
    Pending,
    Success,
    Failed,
}

impl TransactionStatus {
    pub fn is_terminal(&self) -> bool {
        !matches!(self, Self::Pending)
    }

    pub fn can_transition_to(&self, next: TransactionStatus) -> bool {
        *self == Self::Pending && next.is_terminal()
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "PENDING",
            Self::Success => "SUCCESS",
            Self::Failed => "FAILED",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum DonationKind {
    Visitor,
    Member,
}

/// Payer details captured at donation time
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonorSnapshot {
    pub name: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub email: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub mobile: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pan: Option<String>,
}

/// Donation entity (visitor or member)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Donation {
    pub id: String,
    pub amount: Decimal,
    #[serde(default)]
    pub donor: DonorSnapshot,
    #[serde(default)]
    pub member_id: Option<String>,
    #[serde(default = "default_kind")]
    pub kind: DonationKind,
    #[serde(default)]
    pub transaction_id: Option<String>,
    /// Assigned only once the donation succeeds
    #[serde(default)]
    pub receipt_number: Option<String>,
    pub status: TransactionStatus,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

fn default_kind() -> DonationKind {
    DonationKind::Visitor
}

impl Donation {
    /// A receipt exists only for successful donations
    pub fn has_receipt(&self) -> bool {
        self.status == TransactionStatus::Success
    }

    /// Drop a receipt number reported on a donation that has not succeeded.
    /// Returns the dropped number.
    pub fn strip_unearned_receipt(&mut self) -> Option<String> {
        if self.has_receipt() {
            return None;
        }
        self.receipt_number.take()
    }
}

/// Donation request, from a visitor or a logged-in member
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DonationRequest {
    pub amount: Decimal,
    pub donor: DonorSnapshot,
    /// Idempotency key so a retried submit does not open a second order
    pub client_reference: String,
}

/// Order opened with the payment gateway
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentOrder {
    pub order_id: String,
    pub amount: Decimal,
    #[serde(default = "default_currency")]
    pub currency: String,
    #[serde(default)]
    pub checkout_url: Option<String>,
}

fn default_currency() -> String {
    "INR".to_string()
}

/// Result of `GET api/payments/{order_id}/verify`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PaymentVerification {
    pub order_id: String,
    pub status: TransactionStatus,
    #[serde(default)]
    pub transaction_id: Option<String>,
    #[serde(default)]
    pub receipt_number: Option<String>,
}
