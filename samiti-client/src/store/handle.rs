//! Single-writer handle to a slice

use std::sync::Arc;
use std::sync::atomic::{AtomicU64, Ordering};

use tokio::sync::watch;

use super::Resource;
use super::slice::{ResourceSlice, SliceAction};

/// Cloneable handle to one [`ResourceSlice`].
///
/// All writes go through [`SliceHandle::dispatch`]; views read snapshots or
/// subscribe for changes.
#[derive(Debug)]
pub struct SliceHandle<T> {
    state: Arc<watch::Sender<ResourceSlice<T>>>,
    tickets: Arc<AtomicU64>,
}

impl<T> Clone for SliceHandle<T> {
    fn clone(&self) -> Self {
        Self {
            state: self.state.clone(),
            tickets: self.tickets.clone(),
        }
    }
}

impl<T: Resource> Default for SliceHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Resource> SliceHandle<T> {
    pub fn new() -> Self {
        let (state, _) = watch::channel(ResourceSlice::new());
        Self {
            state: Arc::new(state),
            tickets: Arc::new(AtomicU64::new(0)),
        }
    }

    /// Apply an action and notify subscribers
    pub fn dispatch(&self, action: SliceAction<T>) {
        self.state.send_modify(|slice| slice.reduce(action));
    }

    /// Ticket for the next list/detail request
    pub fn next_ticket(&self) -> u64 {
        self.tickets.fetch_add(1, Ordering::Relaxed) + 1
    }

    /// Drop the cached state and orphan every in-flight list/detail request
    pub fn reset(&self) {
        let fence = self.next_ticket();
        self.dispatch(SliceAction::Reset { fence });
    }

    /// Copy of the current state
    pub fn snapshot(&self) -> ResourceSlice<T> {
        self.state.borrow().clone()
    }

    /// Read the current state without cloning it
    pub fn with<R>(&self, f: impl FnOnce(&ResourceSlice<T>) -> R) -> R {
        f(&self.state.borrow())
    }

    /// Receive every committed state
    pub fn subscribe(&self) -> watch::Receiver<ResourceSlice<T>> {
        self.state.subscribe()
    }
}
