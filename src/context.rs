//! Application Context
//!
//! Session and stores provided via Leptos Context API.

use std::sync::Arc;

use leptos::prelude::*;

use crate::api::RequestGateway;
use crate::session::Session;
use crate::store::{AuthStore, CategoryStore, DebtStore, TodoStore, TransactionStore};

/// App-wide handles provided via context
#[derive(Clone, Copy)]
pub struct AppContext {
    pub session: Session,
    pub auth: AuthStore,
    pub todos: TodoStore,
    pub transactions: TransactionStore,
    pub categories: CategoryStore,
    pub debts: DebtStore,
}

impl AppContext {
    /// Build every store on top of one shared gateway
    pub fn new(session: Session, gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            session,
            auth: AuthStore::new(session, gateway.clone()),
            todos: TodoStore::new(gateway.clone()),
            transactions: TransactionStore::new(gateway.clone()),
            categories: CategoryStore::new(gateway.clone()),
            debts: DebtStore::new(gateway),
        }
    }
}

/// Get the app context
pub fn use_app_context() -> AppContext {
    expect_context::<AppContext>()
}
