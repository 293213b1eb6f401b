//! Resource slice state and its reducer
//!
//! A slice holds the client's copy of one backend collection. It changes
//! only through [`ResourceSlice::reduce`]; each call runs to completion
//! before the next one starts (see [`super::SliceHandle`]).

use std::fmt;
use std::sync::Arc;

use shared::Pagination;

use super::Resource;

/// Request lifecycle status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Status {
    #[default]
    Idle,
    Loading,
    Succeeded,
    Failed,
}

impl Status {
    pub fn is_loading(&self) -> bool {
        *self == Self::Loading
    }
}

/// One page of items as returned by a list endpoint
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub pagination: Pagination,
}

/// In-place update applied to the item with a given id
pub type Patch<T> = Arc<dyn Fn(&mut T) + Send + Sync>;

/// What a successful mutation does to the cached list
pub enum MutationOutcome<T> {
    /// Apply `patch` to the item with `id` (status changes)
    Patched { id: String, patch: Patch<T> },
    /// Replace the item carrying the same id
    Replaced(T),
    /// Drop the item with this id (delete)
    Removed(String),
    /// Leave the list alone; the caller re-fetches (create)
    Unchanged,
}

impl<T: fmt::Debug> fmt::Debug for MutationOutcome<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Patched { id, .. } => f.debug_struct("Patched").field("id", id).finish(),
            Self::Replaced(item) => f.debug_tuple("Replaced").field(item).finish(),
            Self::Removed(id) => f.debug_tuple("Removed").field(id).finish(),
            Self::Unchanged => f.write_str("Unchanged"),
        }
    }
}

/// Declared state transitions of a slice.
///
/// List and detail requests carry a ticket; a response whose ticket is not
/// the latest issued one is stale and ignored.
#[derive(Debug)]
pub enum SliceAction<T> {
    ListPending { ticket: u64 },
    ListFulfilled { ticket: u64, page: Page<T> },
    ListRejected { ticket: u64, error: String },
    DetailPending { ticket: u64 },
    DetailFulfilled { ticket: u64, item: T },
    DetailRejected { ticket: u64, error: String },
    ActionPending,
    ActionFulfilled(MutationOutcome<T>),
    ActionRejected(String),
    DownloadPending,
    DownloadFulfilled,
    DownloadRejected(String),
    ClearSelection,
    ClearError,
    /// Back to the initial state. `fence` is a ticket no request holds, so
    /// every response issued before the reset is discarded.
    Reset { fence: u64 },
}

/// Client-side state for one entity collection
#[derive(Debug, Clone)]
pub struct ResourceSlice<T> {
    /// Server order
    pub items: Vec<T>,
    pub pagination: Pagination,
    pub list_status: Status,
    pub detail_status: Status,
    pub action_status: Status,
    pub download_status: Status,
    pub selected: Option<T>,
    pub error: Option<String>,
    latest_list: u64,
    latest_detail: u64,
}

impl<T> Default for ResourceSlice<T> {
    fn default() -> Self {
        Self {
            items: Vec::new(),
            pagination: Pagination::default(),
            list_status: Status::Idle,
            detail_status: Status::Idle,
            action_status: Status::Idle,
            download_status: Status::Idle,
            selected: None,
            error: None,
            latest_list: 0,
            latest_detail: 0,
        }
    }
}

impl<T: Resource> ResourceSlice<T> {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: &str) -> Option<&T> {
        self.items.iter().find(|item| item.id() == id)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Apply one action
    pub fn reduce(&mut self, action: SliceAction<T>) {
        match action {
            SliceAction::ListPending { ticket } => {
                self.latest_list = ticket;
                self.list_status = Status::Loading;
            }
            SliceAction::ListFulfilled { ticket, page } => {
                if ticket != self.latest_list {
                    tracing::debug!(resource = T::NAME, ticket, "discarding stale list response");
                    return;
                }
                self.items = page.items;
                self.pagination = page.pagination;
                self.list_status = Status::Succeeded;
                self.error = None;
            }
            SliceAction::ListRejected { ticket, error } => {
                if ticket != self.latest_list {
                    return;
                }
                self.list_status = Status::Failed;
                self.error = Some(error);
            }
            SliceAction::DetailPending { ticket } => {
                self.latest_detail = ticket;
                self.detail_status = Status::Loading;
            }
            SliceAction::DetailFulfilled { ticket, item } => {
                if ticket != self.latest_detail {
                    tracing::debug!(resource = T::NAME, ticket, "discarding stale detail response");
                    return;
                }
                self.selected = Some(item);
                self.detail_status = Status::Succeeded;
                self.error = None;
            }
            SliceAction::DetailRejected { ticket, error } => {
                if ticket != self.latest_detail {
                    return;
                }
                self.detail_status = Status::Failed;
                self.error = Some(error);
            }
            SliceAction::ActionPending => {
                self.action_status = Status::Loading;
            }
            SliceAction::ActionFulfilled(outcome) => {
                self.apply_outcome(outcome);
                self.action_status = Status::Succeeded;
                self.error = None;
            }
            SliceAction::ActionRejected(error) => {
                self.action_status = Status::Failed;
                self.error = Some(error);
            }
            SliceAction::DownloadPending => {
                self.download_status = Status::Loading;
            }
            SliceAction::DownloadFulfilled => {
                self.download_status = Status::Succeeded;
            }
            SliceAction::DownloadRejected(error) => {
                self.download_status = Status::Failed;
                self.error = Some(error);
            }
            SliceAction::ClearSelection => {
                self.selected = None;
                self.detail_status = Status::Idle;
            }
            SliceAction::ClearError => {
                self.error = None;
            }
            SliceAction::Reset { fence } => {
                *self = Self::default();
                self.latest_list = fence;
                self.latest_detail = fence;
            }
        }
    }

    fn apply_outcome(&mut self, outcome: MutationOutcome<T>) {
        match outcome {
            MutationOutcome::Patched { id, patch } => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id() == id) {
                    patch(item);
                }
                if let Some(selected) = self.selected.as_mut().filter(|s| s.id() == id) {
                    patch(selected);
                }
            }
            MutationOutcome::Replaced(next) => {
                if let Some(item) = self.items.iter_mut().find(|item| item.id() == next.id()) {
                    *item = next.clone();
                }
                if self.selected.as_ref().is_some_and(|s| s.id() == next.id()) {
                    self.selected = Some(next);
                }
            }
            MutationOutcome::Removed(id) => {
                let before = self.items.len();
                self.items.retain(|item| item.id() != id);
                if self.items.len() < before {
                    self.pagination.total = self.pagination.total.saturating_sub(1);
                }
                if self.selected.as_ref().is_some_and(|s| s.id() == id) {
                    self.selected = None;
                    self.detail_status = Status::Idle;
                }
            }
            MutationOutcome::Unchanged => {}
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, PartialEq)]
    struct Row {
        id: String,
        status: &'static str,
    }

    impl Resource for Row {
        const NAME: &'static str = "row";
        fn id(&self) -> &str {
            &self.id
        }
    }

    fn row(id: &str, status: &'static str) -> Row {
        Row { id: id.into(), status }
    }

    fn page(items: Vec<Row>) -> Page<Row> {
        let pagination = Pagination::single_page(items.len());
        Page { items, pagination }
    }

    #[test]
    fn test_list_success_replaces_items() {
        let mut slice = ResourceSlice::new();
        slice.reduce(SliceAction::ListPending { ticket: 1 });
        assert_eq!(slice.list_status, Status::Loading);

        slice.reduce(SliceAction::ListFulfilled { ticket: 1, page: page(vec![row("a", "x"), row("b", "y")]) });
        assert_eq!(slice.list_status, Status::Succeeded);
        assert_eq!(slice.items.len(), 2);
        assert_eq!(slice.pagination.total, 2);
    }

    #[test]
    fn test_list_failure_keeps_previous_items() {
        let mut slice = ResourceSlice::new();
        slice.reduce(SliceAction::ListPending { ticket: 1 });
        slice.reduce(SliceAction::ListFulfilled { ticket: 1, page: page(vec![row("a", "x")]) });

        slice.reduce(SliceAction::ListPending { ticket: 2 });
        slice.reduce(SliceAction::ListRejected { ticket: 2, error: "offline".into() });
        assert_eq!(slice.list_status, Status::Failed);
        assert_eq!(slice.error.as_deref(), Some("offline"));
        assert_eq!(slice.items, vec![row("a", "x")]);
    }

    #[test]
    fn test_stale_list_response_is_ignored() {
        let mut slice = ResourceSlice::new();
        slice.reduce(SliceAction::ListPending { ticket: 1 });
        slice.reduce(SliceAction::ListPending { ticket: 2 });
        slice.reduce(SliceAction::ListFulfilled { ticket: 2, page: page(vec![row("new", "x")]) });
        slice.reduce(SliceAction::ListFulfilled { ticket: 1, page: page(vec![row("old", "x")]) });
        assert_eq!(slice.items, vec![row("new", "x")]);
        slice.reduce(SliceAction::ListRejected { ticket: 1, error: "late".into() });
        assert_eq!(slice.list_status, Status::Succeeded);
        assert!(slice.error.is_none());
    }

    #[test]
    fn test_patch_touches_only_target() {
        let mut slice = ResourceSlice::new();
        slice.reduce(SliceAction::ListPending { ticket: 1 });
        slice.reduce(SliceAction::ListFulfilled {
            ticket: 1,
            page: page(vec![row("a", "active"), row("b", "active"), row("c", "pending")]),
        });
        let before = slice.items.clone();

        slice.reduce(SliceAction::ActionPending);
        slice.reduce(SliceAction::ActionFulfilled(MutationOutcome::Patched {
            id: "b".into(),
            patch: Arc::new(|r: &mut Row| r.status = "blocked"),
        }));

        assert_eq!(slice.action_status, Status::Succeeded);
        assert_eq!(slice.items[1].status, "blocked");
        assert_eq!(slice.items[0], before[0]);
        assert_eq!(slice.items[2], before[2]);
    }

    #[test]
    fn test_remove_updates_total_and_selection() {
        let mut slice = ResourceSlice::new();
        slice.reduce(SliceAction::ListPending { ticket: 1 });
        slice.reduce(SliceAction::ListFulfilled { ticket: 1, page: page(vec![row("a", "x"), row("b", "x")]) });
        slice.reduce(SliceAction::DetailPending { ticket: 1 });
        slice.reduce(SliceAction::DetailFulfilled { ticket: 1, item: row("a", "x") });

        slice.reduce(SliceAction::ActionFulfilled(MutationOutcome::Removed("a".into())));
        assert_eq!(slice.items, vec![row("b", "x")]);
        assert_eq!(slice.pagination.total, 1);
        assert!(slice.selected.is_none());
    }

    #[test]
    fn test_download_status_is_independent() {
        let mut slice: ResourceSlice<Row> = ResourceSlice::new();
        slice.reduce(SliceAction::ListPending { ticket: 1 });
        slice.reduce(SliceAction::DownloadPending);
        slice.reduce(SliceAction::DownloadRejected("404".into()));
        assert_eq!(slice.list_status, Status::Loading);
        assert_eq!(slice.action_status, Status::Idle);
        assert_eq!(slice.download_status, Status::Failed);
    }

    #[test]
    fn test_failed_action_leaves_items() {
        let mut slice = ResourceSlice::new();
        slice.reduce(SliceAction::ListPending { ticket: 1 });
        slice.reduce(SliceAction::ListFulfilled { ticket: 1, page: page(vec![row("a", "x")]) });
        slice.reduce(SliceAction::ActionPending);
        slice.reduce(SliceAction::ActionRejected("denied".into()));
        assert_eq!(slice.action_status, Status::Failed);
        assert_eq!(slice.items.len(), 1);
        assert_eq!(slice.list_status, Status::Succeeded);
    }
}
