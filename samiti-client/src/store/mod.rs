//! Client-side store
//!
//! One [`SliceHandle`] per backend collection, bundled into a [`Store`]
//! that is passed to whoever needs it instead of living in a global.

mod handle;
pub mod slice;

pub use handle::SliceHandle;
pub use slice::{MutationOutcome, Page, Patch, ResourceSlice, SliceAction, Status};

use shared::models::{
    Certificate, ContributionGroup, Donation, Member, Notice, Operator, Receipt,
};

/// An entity that can live in a slice
pub trait Resource: Clone + std::fmt::Debug + Send + Sync + 'static {
    /// Used in logs and messages
    const NAME: &'static str;

    fn id(&self) -> &str;

    /// Bring a decoded payload in line with the entity's invariants
    fn narrow(self) -> Self {
        self
    }
}

macro_rules! impl_resource {
    ($($ty:ty => $name:literal),* $(,)?) => {
        $(
            impl Resource for $ty {
                const NAME: &'static str = $name;

                fn id(&self) -> &str {
                    &self.id
                }
            }
        )*
    };
}

impl_resource! {
    Member => "member",
    Receipt => "receipt",
    Certificate => "certificate",
    Notice => "notice",
    Operator => "operator",
    ContributionGroup => "contribution group",
}

impl Resource for Donation {
    const NAME: &'static str = "donation";

    fn id(&self) -> &str {
        &self.id
    }

    fn narrow(mut self) -> Self {
        if let Some(receipt) = self.strip_unearned_receipt() {
            tracing::warn!(
                donation_id = %self.id,
                status = self.status.as_str(),
                receipt = %receipt,
                "Ignoring receipt number on a donation that has not succeeded"
            );
        }
        self
    }
}

/// All slices of the application
#[derive(Debug, Clone, Default)]
pub struct Store {
    pub members: SliceHandle<Member>,
    pub donations: SliceHandle<Donation>,
    pub receipts: SliceHandle<Receipt>,
    pub certificates: SliceHandle<Certificate>,
    pub notices: SliceHandle<Notice>,
    pub operators: SliceHandle<Operator>,
    pub contribution_groups: SliceHandle<ContributionGroup>,
}

impl Store {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop every cached collection (logout)
    pub fn reset(&self) {
        self.members.reset();
        self.donations.reset();
        self.receipts.reset();
        self.certificates.reset();
        self.notices.reset();
        self.operators.reset();
        self.contribution_groups.reset();
    }
}
