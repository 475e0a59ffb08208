//! Debt Store
//!
//! Same shape as the transaction store: newest-first list, owed/owing views
//! filtered on read, backend summary refreshed after each committed change.

use std::sync::Arc;

use leptos::prelude::*;
use reactive_stores::Store;

use super::{begin, fail, insert, remove_by_id, replace_by_id, Placement, SyncStatus, SyncTracked};
use crate::api::{self, RequestFailure, RequestGateway};
use crate::models::{Debt, DebtInput, DebtKind, DebtSummary, Id, Payment};

const DEBTS: &str = "/api/debts";
const SUMMARY: &str = "/api/debts/summary";

fn debt_path(id: Id) -> String {
    format!("{}/{}", DEBTS, id)
}

fn payments_path(id: Id) -> String {
    format!("{}/{}/payments", DEBTS, id)
}

fn debts_of_kind_path(kind: DebtKind) -> String {
    format!("{}/type?type={}", DEBTS, kind.as_str())
}

#[derive(Clone, Debug, Default, Store)]
pub struct DebtState {
    pub items: Vec<Debt>,
    pub summary: DebtSummary,
    pub status: SyncStatus,
}

#[derive(Clone, Copy)]
pub struct DebtStore {
    state: Store<DebtState>,
    gateway: StoredValue<Arc<dyn RequestGateway>>,
}

impl SyncTracked for DebtStore {
    fn status(&self) -> SyncStatus {
        self.state.status().get()
    }

    fn write_status(&self, f: impl FnOnce(&mut SyncStatus)) {
        f(&mut self.state.status().write());
    }
}

impl DebtStore {
    pub fn new(gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            state: Store::new(DebtState::default()),
            gateway: StoredValue::new(gateway),
        }
    }

    pub fn debts(&self) -> Vec<Debt> {
        self.state.items().get()
    }

    pub fn summary(&self) -> DebtSummary {
        self.state.summary().get()
    }

    pub fn debts_owed(&self) -> Vec<Debt> {
        self.of_kind(DebtKind::Owed)
    }

    pub fn debts_owing(&self) -> Vec<Debt> {
        self.of_kind(DebtKind::Owing)
    }

    fn of_kind(&self, kind: DebtKind) -> Vec<Debt> {
        self.state
            .items()
            .read()
            .iter()
            .filter(|debt| debt.kind == kind)
            .cloned()
            .collect()
    }

    pub async fn fetch_debts(&self) -> Result<Vec<Debt>, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let debts: Option<Vec<Debt>> = api::get(&*gateway, DEBTS)
            .await
            .map_err(|e| fail(*self, e, "Failed to fetch debts"))?;
        let debts = debts.unwrap_or_default();
        *self.state.items().write() = debts.clone();
        self.refresh_summary().await;
        Ok(debts)
    }

    /// Replace `items` with the server's debts of one type
    pub async fn fetch_debts_by_type(&self, kind: DebtKind) -> Result<Vec<Debt>, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let fallback = format!("Failed to fetch {} debts", kind.as_str());
        let debts: Option<Vec<Debt>> = api::get(&*gateway, &debts_of_kind_path(kind))
            .await
            .map_err(|e| fail(*self, e, &fallback))?;
        let debts = debts.unwrap_or_default();
        *self.state.items().write() = debts.clone();
        Ok(debts)
    }

    /// Replace the summary with the backend's; a failure lands in `error`
    pub async fn fetch_summary(&self) -> Result<DebtSummary, RequestFailure> {
        let gateway = self.gateway.get_value();
        let summary: Option<DebtSummary> = api::get(&*gateway, SUMMARY)
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

    pub async fn add_debt(&self, input: &DebtInput) -> Result<Debt, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let created: Debt = api::post(&*gateway, DEBTS, input)
            .await
            .map_err(|e| fail(*self, e, "Failed to add debt"))?;
        insert(&mut self.state.items().write(), created.clone(), Placement::Front);
        self.refresh_summary().await;
        Ok(created)
    }

    pub async fn update_debt(&self, id: Id, input: &DebtInput) -> Result<Debt, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        log::debug!("updating debt {} with {:?}", id, input);
        let updated: Debt = api::put(&*gateway, &debt_path(id), input)
            .await
            .map_err(|e| fail(*self, e, "Failed to update debt"))?;
        replace_by_id(&mut self.state.items().write(), id, updated.clone());
        self.refresh_summary().await;
        Ok(updated)
    }

    pub async fn delete_debt(&self, id: Id) -> Result<(), RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        api::delete(&*gateway, &debt_path(id))
            .await
            .map_err(|e| fail(*self, e, "Failed to delete debt"))?;
        remove_by_id(&mut self.state.items().write(), id);
        self.refresh_summary().await;
        Ok(())
    }

    /// Record a payment; the server returns the debt with its payment history
    pub async fn make_payment(&self, id: Id, payment: &Payment) -> Result<Debt, RequestFailure> {
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        let updated: Debt = api::post(&*gateway, &payments_path(id), payment)
            .await
            .map_err(|e| fail(*self, e, "Failed to make payment"))?;
        replace_by_id(&mut self.state.items().write(), id, updated.clone());
        self.refresh_summary().await;
        Ok(updated)
    }
}
