//! Member dashboard: profile plus the member's own collections

use std::sync::Arc;

use rust_decimal::Decimal;
use shared::ListQuery;
use shared::models::Member;

use super::{CertificateApi, DonationApi, MemberApi, NoticeApi, ReceiptApi};
use crate::client::HttpClient;
use crate::store::{SliceHandle, Store};
use crate::view::donations::successful_total;

/// Each section has its own slice, so one failing section does not blank
/// the others.
pub struct MemberDashboard<C> {
    slices: Store,
    profile: MemberApi<C>,
    donations: DonationApi<C>,
    receipts: ReceiptApi<C>,
    certificates: CertificateApi<C>,
    notices: NoticeApi<C>,
}

/// Outcome of one dashboard load
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardSummary {
    pub profile: Option<Member>,
    pub donations: usize,
    pub receipts: usize,
    pub certificates: usize,
    pub notices: usize,
    /// Sum over successful donations only
    pub total_donated: Decimal,
    /// Sections whose fetch failed
    pub failed: Vec<&'static str>,
}

impl<C: HttpClient> MemberDashboard<C> {
    pub fn new(http: Arc<C>) -> Self {
        let slices = Store::new();
        Self {
            profile: MemberApi::new(http.clone(), slices.members.clone()),
            donations: DonationApi::new(http.clone(), slices.donations.clone()),
            receipts: ReceiptApi::new(http.clone(), slices.receipts.clone()),
            certificates: CertificateApi::new(http.clone(), slices.certificates.clone()),
            notices: NoticeApi::new(http, slices.notices.clone()),
            slices,
        }
    }

    /// Dashboard slices; the profile lives in `members.selected`
    pub fn slices(&self) -> &Store {
        &self.slices
    }

    pub fn profile(&self) -> &SliceHandle<Member> {
        self.profile.slice()
    }

    /// Fetch every section concurrently
    pub async fn load(&self) -> DashboardSummary {
        let query = ListQuery::all();
        let (profile, donations, receipts, certificates, notices) = tokio::join!(
            self.profile.my_profile(),
            self.donations.my_donations(&query),
            self.receipts.my_receipts(&query),
            self.certificates.my_certificates(&query),
            self.notices.my_notices(&query),
        );

        let mut failed = Vec::new();
        let mut count = |section: &'static str, result: crate::ClientResult<usize>| {
            result.unwrap_or_else(|_| {
                failed.push(section);
                0
            })
        };
        let donations = count("donations", donations);
        let receipts = count("receipts", receipts);
        let certificates = count("certificates", certificates);
        let notices = count("notices", notices);
        let profile = match profile {
            Ok(member) => Some(member),
            Err(_) => {
                failed.insert(0, "profile");
                None
            }
        };

        let total_donated = self
            .slices
            .donations
            .with(|slice| successful_total(&slice.items));
        if !failed.is_empty() {
            tracing::warn!(sections = ?failed, "Dashboard partially loaded");
        }

        DashboardSummary {
            profile,
            donations,
            receipts,
            certificates,
            notices,
            total_donated,
            failed,
        }
    }
}
