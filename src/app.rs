//! Finance Tracker App
//!
//! Host component: wires session, gateway and stores, loads the collections
//! once signed in, and leaves for the login page when the backend rejects
//! the credential.

use std::sync::Arc;

use leptos::prelude::*;
use leptos::task::spawn_local;

use crate::api::{FetchTransport, HttpGateway, RequestGateway};
use crate::config::GatewayConfig;
use crate::context::{use_app_context, AppContext};
use crate::models::EntryKind;
use crate::session::{BrowserStorage, Session};
use crate::store::SyncTracked;

const LOGIN_PATH: &str = "/login";

#[component]
pub fn App() -> impl IntoView {
    let session = Session::restore(Arc::new(BrowserStorage));
    let config = GatewayConfig::from_env();
    log::info!("API base URL {}", config.base_url);
    let gateway: Arc<dyn RequestGateway> = Arc::new(HttpGateway::new(config, session, FetchTransport));
    let ctx = AppContext::new(session, gateway);

    // Provide context to all children
    provide_context(ctx);

    // Credential rejected by the backend: go to the login page
    Effect::new(move |seen: Option<u64>| {
        let count = session.invalidations();
        if seen.is_some_and(|seen| count > seen) {
            redirect_to_login();
        }
        count
    });

    // Load collections whenever a session begins
    Effect::new(move |_| {
        if session.is_authenticated() {
            spawn_local(load_all(ctx));
        }
    });

    view! {
        <main class="app-layout">
            <Show
                when=move || session.is_authenticated()
                fallback=|| view! { <p class="signed-out">"Signed out. Please log in."</p> }
            >
                <Dashboard />
            </Show>
        </main>
    }
}

/// Totals and counts for the signed-in user
#[component]
fn Dashboard() -> impl IntoView {
    let ctx = use_app_context();

    view! {
        <section class="dashboard">
            <p class="user">{move || ctx.auth.username().unwrap_or_default()}</p>
            <p class="balance">{move || format!("Balance: {:.2}", ctx.transactions.summary().balance)}</p>
            <p class="debt-balance">{move || format!("Debt balance: {:.2}", ctx.debts.summary().balance)}</p>
            <p class="item-count">
                {move || format!(
                    "{} todos, {} income / {} expense transactions, {} owed / {} owing debts",
                    ctx.todos.todos().len(),
                    ctx.transactions.income_transactions().len(),
                    ctx.transactions.expense_transactions().len(),
                    ctx.debts.debts_owed().len(),
                    ctx.debts.debts_owing().len(),
                )}
            </p>
            {move || ctx.transactions.error().map(|e| view! { <p class="error">{e}</p> })}
            {move || ctx.debts.error().map(|e| view! { <p class="error">{e}</p> })}
            <button on:click=move |_| ctx.auth.logout()>"Log out"</button>
        </section>
    }
}

/// Fetch every collection; failures stay in each store's `error`
async fn load_all(ctx: AppContext) {
    let _ = ctx.todos.fetch_todos().await;
    let _ = ctx.transactions.fetch_transactions().await;
    let _ = ctx.categories.fetch_categories(EntryKind::Income).await;
    let _ = ctx.categories.fetch_categories(EntryKind::Expense).await;
    let _ = ctx.debts.fetch_debts().await;
}

fn redirect_to_login() {
    let Some(window) = web_sys::window() else {
        return;
    };
    if window.location().set_href(LOGIN_PATH).is_err() {
        log::error!("could not navigate to {}", LOGIN_PATH);
    }
}
