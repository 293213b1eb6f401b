//! Donation table and totals

use rust_decimal::Decimal;
use shared::models::{Donation, DonationKind, TransactionStatus};

use super::RenderState;
use crate::store::ResourceSlice;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationRow {
    pub id: String,
    pub donor: String,
    pub kind: DonationKind,
    pub amount: Decimal,
    pub status: TransactionStatus,
    pub receipt_number: Option<String>,
    pub download_enabled: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DonationsView {
    pub state: RenderState,
    pub rows: Vec<DonationRow>,
    /// Successful donations only
    pub total: Decimal,
    pub downloading: bool,
}

/// Sum of successful donations; pending and failed ones never count
pub fn successful_total(donations: &[Donation]) -> Decimal {
    donations
        .iter()
        .filter(|d| d.status == TransactionStatus::Success)
        .map(|d| d.amount)
        .sum()
}

pub fn donations_view(slice: &ResourceSlice<Donation>) -> DonationsView {
    let rows = slice
        .items
        .iter()
        .map(|d| DonationRow {
            id: d.id.clone(),
            donor: if d.donor.name.is_empty() {
                "Anonymous".to_string()
            } else {
                d.donor.name.clone()
            },
            kind: d.kind,
            amount: d.amount,
            status: d.status,
            receipt_number: d.receipt_number.clone(),
            download_enabled: d.has_receipt(),
        })
        .collect();
    DonationsView {
        state: RenderState::of_list(slice, "No donations yet"),
        rows,
        total: successful_total(&slice.items),
        downloading: slice.download_status.is_loading(),
    }
}
