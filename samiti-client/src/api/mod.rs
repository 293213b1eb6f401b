//! Thunked operations per feature area
//!
//! [`SamitiApi`] bundles one typed API per entity, all sharing the same
//! HTTP adapter and [`Store`].

pub mod auth;
pub mod certificates;
pub mod contributions;
pub mod dashboard;
pub mod donations;
pub mod members;
pub mod notices;
pub mod operators;
pub mod payments;
pub mod receipts;
pub mod registration;
mod thunks;

pub use auth::AuthApi;
pub use certificates::CertificateApi;
pub use contributions::ContributionApi;
pub use dashboard::{DashboardSummary, MemberDashboard};
pub use donations::DonationApi;
pub use members::MemberApi;
pub use notices::NoticeApi;
pub use operators::OperatorApi;
pub use payments::PaymentApi;
pub use receipts::ReceiptApi;
pub use registration::{RegistrationApi, RegistrationForm, RegistrationWizard, WizardStep};
pub use thunks::ResourceApi;

use std::sync::Arc;

use shared::{ApiResponse, Pagination};

use crate::client::HttpClient;
use crate::store::{Page, Store};
use crate::{ClientError, ClientResult};

/// Unwrap an envelope that must carry data
pub(crate) fn into_data<T>(resp: ApiResponse<T>) -> ClientResult<T> {
    resp.check()?
        .data
        .ok_or_else(|| ClientError::InvalidResponse("Missing response data".into()))
}

/// Unwrap a list envelope; unpaginated lists count as a single page
pub(crate) fn into_page<T>(resp: ApiResponse<Vec<T>>) -> ClientResult<Page<T>> {
    let resp = resp.check()?;
    let items = resp
        .data
        .ok_or_else(|| ClientError::InvalidResponse("Missing list data".into()))?;
    let pagination = resp
        .pagination
        .unwrap_or_else(|| Pagination::single_page(items.len()));
    Ok(Page { items, pagination })
}

/// Every feature API over one adapter and one store
pub struct SamitiApi<C> {
    http: Arc<C>,
    pub store: Store,
    pub auth: AuthApi<C>,
    pub members: MemberApi<C>,
    pub donations: DonationApi<C>,
    pub receipts: ReceiptApi<C>,
    pub certificates: CertificateApi<C>,
    pub notices: NoticeApi<C>,
    pub operators: OperatorApi<C>,
    pub contributions: ContributionApi<C>,
    pub payments: PaymentApi<C>,
    pub registration: RegistrationApi<C>,
}

impl<C: HttpClient + 'static> SamitiApi<C> {
    pub fn new(http: Arc<C>, store: Store) -> Self {
        Self {
            auth: AuthApi::new(http.clone(), store.clone()),
            members: MemberApi::new(http.clone(), store.members.clone()),
            donations: DonationApi::new(http.clone(), store.donations.clone()),
            receipts: ReceiptApi::new(http.clone(), store.receipts.clone()),
            certificates: CertificateApi::new(http.clone(), store.certificates.clone()),
            notices: NoticeApi::new(http.clone(), store.notices.clone()),
            operators: OperatorApi::new(http.clone(), store.operators.clone()),
            contributions: ContributionApi::new(http.clone(), store.contribution_groups.clone()),
            payments: PaymentApi::new(http.clone()),
            registration: RegistrationApi::new(http.clone()),
            http,
            store,
        }
    }

    pub fn http(&self) -> &Arc<C> {
        &self.http
    }

    /// Dashboard for the logged-in member, with its own slices
    pub fn member_dashboard(&self) -> MemberDashboard<C> {
        MemberDashboard::new(self.http.clone())
    }
}
