//! View models
//!
//! Pure functions from slice snapshots to what a page renders: a loading
//! indicator, an inline error, an explicit empty state, or rows.

pub mod donations;
pub mod members;

use crate::payment::WatchState;
use crate::store::{ResourceSlice, Resource, Status};

/// What a list page shows
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RenderState {
    Loading,
    /// Inline error; the user retries explicitly
    Failed(String),
    Empty(String),
    Ready,
}

impl RenderState {
    /// Render state of a list slice.
    ///
    /// Cached rows keep showing while a re-fetch is in flight; a failed
    /// fetch shows its error even if stale rows are cached.
    pub fn of_list<T: Resource>(slice: &ResourceSlice<T>, empty_message: &str) -> Self {
        match slice.list_status {
            Status::Loading if slice.is_empty() => Self::Loading,
            Status::Idle => Self::Loading,
            Status::Failed => Self::Failed(
                slice
                    .error
                    .clone()
                    .unwrap_or_else(|| "Something went wrong".to_string()),
            ),
            _ if slice.is_empty() => Self::Empty(empty_message.to_string()),
            _ => Self::Ready,
        }
    }

    /// Render state of the detail view (`selected`)
    pub fn of_detail<T: Resource>(slice: &ResourceSlice<T>) -> Self {
        match (slice.detail_status, &slice.selected) {
            (Status::Failed, _) => Self::Failed(
                slice
                    .error
                    .clone()
                    .unwrap_or_else(|| "Something went wrong".to_string()),
            ),
            (_, Some(_)) => Self::Ready,
            (Status::Succeeded, None) => Self::Empty("Not found".to_string()),
            _ => Self::Loading,
        }
    }
}

/// Payment status page
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaymentView {
    pub headline: String,
    pub detail: Option<String>,
    pub is_error: bool,
    pub is_final: bool,
}

impl From<&WatchState> for PaymentView {
    fn from(state: &WatchState) -> Self {
        match state {
            WatchState::Idle | WatchState::Polling { .. } => Self {
                headline: "Verifying your payment...".to_string(),
                detail: None,
                is_error: false,
                is_final: false,
            },
            WatchState::Confirmed(v) => Self {
                headline: "Payment successful".to_string(),
                detail: v
                    .receipt_number
                    .as_ref()
                    .map(|n| format!("Receipt number {}", n)),
                is_error: false,
                is_final: true,
            },
            WatchState::Failed(message) => Self {
                headline: "Payment failed".to_string(),
                detail: Some(message.clone()),
                is_error: true,
                is_final: true,
            },
            WatchState::TimedOut => Self {
                headline: "Your payment is still processing".to_string(),
                detail: Some("We will update your records once the bank confirms it.".to_string()),
                is_error: false,
                is_final: true,
            },
        }
    }
}
