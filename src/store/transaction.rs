//! Transaction Store
//!
//! Newest-first transaction list plus the backend summary. The income and
//! expense views are filtered from `items` on every read. The summary is
//! re-fetched after every committed change and never derived locally.

use std::sync::Arc;

use leptos::prelude::*;
use reactive_stores::Store;

use super::{begin, fail, insert, remove_by_id, replace_by_id, Placement, SyncStatus, SyncTracked};
use crate::api::{self, RequestFailure, RequestGateway};
use crate::models::{EntryKind, Id, Transaction, TransactionInput, TransactionSummary};

const TRANSACTIONS: &str = "/api/transactions";
const SUMMARY: &str = "/api/transactions/summary";

fn transaction_path(id: Id) -> String {
    format!("{}/{}", TRANSACTIONS, id)
}

#[derive(Clone, Debug, Default, Store)]
pub struct TransactionState {
    pub items: Vec<Transaction>,
    pub summary: TransactionSummary,
    pub status: SyncStatus,
}

#[derive(Clone, Copy)]
pub struct TransactionStore {
    state: Store<TransactionState>,
    gateway: StoredValue<Arc<dyn RequestGateway>>,
}

impl SyncTracked for TransactionStore {
    fn status(&self) -> SyncStatus {
        self.state.status().get()
    }

    fn write_status(&self, f: impl FnOnce(&mut SyncStatus)) {
        f(&mut self.state.status().write());
    }
}

impl TransactionStore {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            state: Store::new(TransactionState::default()),
            gateway: StoredValue::new(gateway),
        }
    }

    pub fn transactions(&self) -> Vec<Transaction> {
        self.state.items().get()
    }

    pub fn summary(&self) -> TransactionSummary {
        self.state.summary().get()
    }

    pub fn income_transactions(&self) -> Vec<Transaction> {
        self.of_kind(EntryKind::Income)
    }

    pub fn expense_transactions(&self) -> Vec<Transaction> {
        self.of_kind(EntryKind::Expense)
    }

    fn of_kind(&self, kind: EntryKind) -> Vec<Transaction> {
        self.state
            .items()
            .read()
            .iter()
            .filter(|tx| tx.kind == kind)
            .cloned()
            .collect()
    }

    pub async fn fetch_transactions(&self) -> Result<Vec<Transaction>, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let transactions: Option<Vec<Transaction>> = api::get(&*gateway, TRANSACTIONS)
            .await
            .map_err(|e| fail(*self, e, "Failed to fetch transactions"))?;
        let transactions = transactions.unwrap_or_default();
        *self.state.items().write() = transactions.clone();
        self.refresh_summary().await;
        Ok(transactions)
    }

    /// Replace the summary with the backend's; a failure lands in `error`
    pub async fn fetch_summary(&self) -> Result<TransactionSummary, RequestFailure> {
        let gateway = self.gateway.get_value();
        let summary: Option<TransactionSummary> = api::get(&*gateway, SUMMARY)
            .await
            .map_err(|e| fail(*self, e, "Failed to fetch summary"))?;
        let summary = summary.unwrap_or_default();
        *self.state.summary().write() = summary;
        Ok(summary)
    }

    /// Summary refresh after a committed change; the change stands either way
    async fn refresh_summary(&self) {
        let _ = self.fetch_summary().await;
    }

    pub async fn add_transaction(&self, input: &TransactionInput) -> Result<Transaction, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let created: Transaction = api::post(&*gateway, TRANSACTIONS, input)
            .await
            .map_err(|e| fail(*self, e, "Failed to add transaction"))?;
        insert(&mut self.state.items().write(), created.clone(), Placement::Front);
        self.refresh_summary().await;
        Ok(created)
    }

    pub async fn update_transaction(&self, id: Id, input: &TransactionInput) -> Result<Transaction, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let updated: Transaction = api::put(&*gateway, &transaction_path(id), input)
            .await
            .map_err(|e| fail(*self, e, "Failed to update transaction"))?;
        replace_by_id(&mut self.state.items().write(), id, updated.clone());
        self.refresh_summary().await;
        Ok(updated)
    }

    pub async fn delete_transaction(&self, id: Id) -> Result<(), RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        api::delete(&*gateway, &transaction_path(id))
            .await
            .map_err(|e| fail(*self, e, "Failed to delete transaction"))?;
        remove_by_id(&mut self.state.items().write(), id);
        self.refresh_summary().await;
        Ok(())
    }
}
