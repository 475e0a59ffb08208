//! Collection Stores
//!
//! One reactive store per backend collection. Each mirrors the server copy,
//! applies server responses in place, and exposes `loading`/`error` for the
//! operation in flight.

mod auth;
mod category;
mod debt;
mod todo;
mod transaction;

pub use auth::AuthStore;
pub use category::{CategoryLists, CategoryState, CategoryStore};
pub use debt::{DebtState, DebtStore};
pub use todo::{TodoState, TodoStore};
pub use transaction::{TransactionState, TransactionStore};

use crate::api::RequestFailure;
use crate::models::{Id, Identified};
use crate::normalize::error_message;

/// Status of the operation in flight
#[derive(Clone, Debug, Default, PartialEq)]
pub struct SyncStatus {
    pub loading: bool,
    pub error: Option<String>,
}

/// Access to a store's [`SyncStatus`]
pub trait SyncTracked: Copy + Send + Sync + 'static {
    fn status(&self) -> SyncStatus;

    fn write_status(&self, f: impl FnOnce(&mut SyncStatus));

    fn loading(&self) -> bool {
        self.status().loading
    }

    fn error(&self) -> Option<String> {
        self.status().error
    }
}

/// Runs `release` when dropped, on every exit path
pub struct LoadingGuard<F: FnOnce()> {
    release: Option<F>,
}

impl<F: FnOnce()> LoadingGuard<F> {
    pub fn new(release: F) -> Self {
        Self { release: Some(release) }
    }
}

impl<F: FnOnce()> Drop for LoadingGuard<F> {
    fn drop(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }
}

/// Mark an operation as started: `loading` on, previous `error` cleared
pub(crate) fn begin<S: SyncTracked>(store: S) -> LoadingGuard<impl FnOnce()> {
    store.write_status(|status| {
        status.loading = true;
        status.error = None;
    });
    LoadingGuard::new(move || store.write_status(|status| status.loading = false))
}

/// Record a failure on the store and hand it back for propagation
pub(crate) fn fail<S: SyncTracked>(store: S, failure: RequestFailure, fallback: &str) -> RequestFailure {
    let message = error_message(&failure, fallback);
    log::warn!("{}: {}", message, failure);
    store.write_status(|status| status.error = Some(message));
    failure
}

// ========================
// Collection Helpers
// ========================

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum Placement {
    /// Newest first
    Front,
    Back,
}

pub fn insert<T>(items: &mut Vec<T>, item: T, placement: Placement) {
    match placement {
        Placement::Front => items.insert(0, item),
        Placement::Back => items.push(item),
    }
}

/// Replace the element with `id`; returns false (and inserts nothing) when absent
pub fn replace_by_id<T: Identified>(items: &mut [T], id: Id, updated: T) -> bool {
    match items.iter_mut().find(|item| item.id() == id) {
        Some(item) => {
            *item = updated;
            true
        }
        None => false,
    }
}

pub fn remove_by_id<T: Identified>(items: &mut Vec<T>, id: Id) {
    items.retain(|item| item.id() != id);
}
