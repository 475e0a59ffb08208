//! Category Store
//!
//! Categories live in two lists keyed by type. Every write goes through
//! [`CategoryLists`] inside a single store write, so observers never see a
//! category in both lists or in neither.

use std::sync::Arc;

use leptos::prelude::*;
use reactive_stores::Store;

use super::{begin, fail, replace_by_id, SyncStatus, SyncTracked};
use crate::api::{self, RequestFailure, RequestGateway};
use crate::models::{Category, CategoryInput, EntryKind, Id};

const CATEGORIES: &str = "/api/categories";

fn category_path(id: Id) -> String {
    format!("{}/{}", CATEGORIES, id)
}

fn categories_of_kind_path(kind: EntryKind) -> String {
    format!("{}?type={}", CATEGORIES, kind.as_str())
}

/// Income and expense categories, each in server order
#[derive(Clone, Debug, Default, PartialEq)]
pub struct CategoryLists {
    pub income: Vec<Category>,
    pub expense: Vec<Category>,
}

impl CategoryLists {
    pub fn list(&self, kind: EntryKind) -> &Vec<Category> {
        match kind {
            EntryKind::Income => &self.income,
            EntryKind::Expense => &self.expense,
        }
    }

    pub fn list_mut(&mut self, kind: EntryKind) -> &mut Vec<Category> {
        match kind {
            EntryKind::Income => &mut self.income,
            EntryKind::Expense => &mut self.expense,
        }
    }

    pub fn add(&mut self, category: Category) {
        self.reconcile(category.id, category);
    }

    /// Replace one type's list with a fetched page; entries typed otherwise go to their own list
    pub fn replace_list(&mut self, kind: EntryKind, fetched: Vec<Category>) {
        self.list_mut(kind).clear();
        for category in fetched {
            self.reconcile(category.id, category);
        }
    }

    /// Apply an updated category, moving it to the list its type names
    pub fn reconcile(&mut self, id: Id, updated: Category) {
        let kind = updated.kind;
        self.list_mut(kind.opposite()).retain(|c| c.id != id);
        let target = self.list_mut(kind);
        if !replace_by_id(target, id, updated.clone()) {
            target.push(updated);
        }
    }

    pub fn remove(&mut self, id: Id) {
        self.income.retain(|c| c.id != id);
        self.expense.retain(|c| c.id != id);
    }

    pub fn find(&self, id: Id) -> Option<&Category> {
        self.income.iter().chain(self.expense.iter()).find(|c| c.id == id)
    }
}

#[derive(Clone, Debug, Default, Store)]
pub struct CategoryState {
    pub lists: CategoryLists,
    pub status: SyncStatus,
}

#[derive(Clone, Copy)]
pub struct CategoryStore {
    state: Store<CategoryState>,
    gateway: StoredValue<Arc<dyn RequestGateway>>,
}

impl SyncTracked for CategoryStore {
    fn status(&self) -> SyncStatus {
        self.state.status().get()
    }

    fn write_status(&self, f: impl FnOnce(&mut SyncStatus)) {
        f(&mut self.state.status().write());
    }
}

impl CategoryStore {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            state: Store::new(CategoryState::default()),
            gateway: StoredValue::new(gateway),
        }
    }

    pub fn income_categories(&self) -> Vec<Category> {
        self.state.lists().read().income.clone()
    }

    pub fn expense_categories(&self) -> Vec<Category> {
        self.state.lists().read().expense.clone()
    }

    /// Name of a cached category, empty when unknown
    pub fn category_name(&self, id: Id) -> String {
        self.state
            .lists()
            .read()
            .find(id)
            .map(|c| c.name.clone())
            .unwrap_or_default()
    }

    /// Reload one type's list, leaving the other untouched
    pub async fn fetch_categories(&self, kind: EntryKind) -> Result<Vec<Category>, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let fallback = format!("Failed to fetch {} categories", kind.as_str());
        let categories: Option<Vec<Category>> = api::get(&*gateway, &categories_of_kind_path(kind))
            .await
            .map_err(|e| fail(*self, e, &fallback))?;
        let categories = categories.unwrap_or_default();
        self.state.lists().write().replace_list(kind, categories.clone());
        Ok(categories)
    }

    pub async fn add_category(&self, input: &CategoryInput) -> Result<Category, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let created: Category = api::post(&*gateway, CATEGORIES, input)
            .await
            .map_err(|e| fail(*self, e, "Failed to add category"))?;
        self.state.lists().write().add(created.clone());
        Ok(created)
    }

    /// Update a category; the server's answer decides which list it ends up in
    pub async fn update_category(&self, id: Id, input: &CategoryInput) -> Result<Category, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let updated: Category = api::put(&*gateway, &category_path(id), input)
            .await
            .map_err(|e| fail(*self, e, "Failed to update category"))?;
        self.state.lists().write().reconcile(id, updated.clone());
        Ok(updated)
    }

    pub async fn delete_category(&self, id: Id) -> Result<(), RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        api::delete(&*gateway, &category_path(id))
            .await
            .map_err(|e| fail(*self, e, "Failed to delete category"))?;
        self.state.lists().write().remove(id);
        Ok(())
    }
}
