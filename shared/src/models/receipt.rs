//! Receipt Model

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ReceiptKind {
    Registration,
    MemberDonation,
}

/// Receipt for a registration fee or member donation. Immutable once issued.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Receipt {
    pub id: String,
    pub receipt_number: String,
    pub member_id: String,
    #[serde(default)]
    pub member_name: Option<String>,
    pub amount: Decimal,
    pub kind: ReceiptKind,
    #[serde(default)]
    pub transaction_id: Option<String>,
    pub issued_at: DateTime<Utc>,
}

impl Receipt {
    /// Suggested filename for the downloaded PDF
    pub fn file_name(&self) -> String {
        format!("receipt-{}.pdf", self.receipt_number)
    }
}
