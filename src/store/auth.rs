//! Auth Store
//!
//! Login and registration. Outcomes are reported as [`OperationResult`] so
//! forms can show field errors or a single message.

use std::sync::Arc;

use leptos::prelude::*;
use reactive_stores::Store;
use serde_json::Value;

use super::{begin, fail, SyncStatus, SyncTracked};
use crate::api::{self, RequestGateway};
use crate::models::{Credentials, LoginResponse};
use crate::normalize::{normalize, OperationResult};
use crate::session::Session;

const LOGIN: &str = "/api/login";
const REGISTER: &str = "/api/register";

#[derive(Clone, Debug, Default, Store)]
pub struct AuthState {
    pub status: SyncStatus,
}

#[derive(Clone, Copy)]
pub struct AuthStore {
    state: Store<AuthState>,
    session: Session,
    gateway: StoredValue<Arc<dyn RequestGateway>>,
}

impl SyncTracked for AuthStore {
    fn status(&self) -> SyncStatus {
        self.state.status().get()
    }

    fn write_status(&self, f: impl FnOnce(&mut SyncStatus)) {
        f(&mut self.state.status().write());
    }
}

impl AuthStore {
    pub fn new(session: Session, gateway: Arc<dyn RequestGateway>) -> Self {
        Self {
            state: Store::new(AuthState::default()),
            session,
            gateway: StoredValue::new(gateway),
        }
    }

    pub fn is_authenticated(&self) -> bool {
        self.session.is_authenticated()
    }

    pub fn username(&self) -> Option<String> {
        self.session.username()
    }

    pub async fn login(&self, username: &str, password: &str) -> OperationResult {
        const FALLBACK: &str = "Login failed. Please try again.";
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        log::info!("attempting login for {}", username);
        match api::post::<_, LoginResponse>(&*gateway, LOGIN, &Credentials { username, password }).await {
            Ok(response) => {
                self.session.sign_in(response.token, username.to_string());
                log::info!("logged in as {}", username);
                OperationResult::Success
            }
            Err(failure) => {
                let result = normalize(&failure, FALLBACK);
                fail(*self, failure, FALLBACK);
                result
            }
        }
    }

    pub async fn register(&self, username: &str, password: &str) -> OperationResult {
        const FALLBACK: &str = "Registration failed. Please try again.";
        let _loading = begin(*self);
        let gateway = self.gateway.get_value();
        match api::post::<_, Value>(&*gateway, REGISTER, &Credentials { username, password }).await {
            Ok(_) => OperationResult::Success,
            Err(failure) => {
                let result = normalize(&failure, FALLBACK);
                fail(*self, failure, FALLBACK);
                result
            }
        }
    }

    pub fn logout(&self) {
        log::info!("logging out");
        self.session.sign_out();
    }

    /// Pick up credentials persisted by another tab or an earlier visit
    pub fn check_auth(&self) {
        self.session.check_auth();
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;
    use crate::api::mock::{client_error, MockGateway};
    use crate::api::{Method, RequestFailure};
    use crate::session::memory::MemoryStorage;
    use crate::session::{CredentialStorage, TOKEN_KEY};

    fn setup() -> (AuthStore, Session, Arc<MemoryStorage>, Arc<MockGateway>) {
        let storage = Arc::new(MemoryStorage::default());
        let session = Session::restore(storage.clone());
        let gateway = MockGateway::new();
        let store = AuthStore::new(session, gateway.clone());
        (store, session, storage, gateway)
    }

    #[tokio::test]
    async fn test_login_signs_in_and_persists() {
        let (store, session, storage, gateway) = setup();
        gateway.ok(Method::Post, LOGIN, json!({"token": "jwt-abc"}));

        let result = store.login("ana", "secret").await;

        assert!(result.is_success());
        assert!(store.is_authenticated());
        assert_eq!(session.token(), Some("jwt-abc".to_string()));
        assert_eq!(storage.load(TOKEN_KEY), Some("jwt-abc".to_string()));
        assert_eq!(store.username(), Some("ana".to_string()));
        assert_eq!(gateway.calls()[0].body, Some(json!({"username": "ana", "password": "secret"})));
    }

    #[tokio::test]
    async fn test_register_reports_field_errors() {
        let (store, _, _, gateway) = setup();
        gateway.fail(
            Method::Post,
            REGISTER,
            client_error(400, json!({"errors": {"password": "too short"}, "error": "invalid"})),
        );

        let result = store.register("ana", "x").await;

        assert_eq!(result.field_errors(), Some(json!({"password": "too short"}).as_object().unwrap()));
        assert_eq!(store.error(), Some("invalid".to_string()));
    }

    #[tokio::test]
    async fn test_login_network_failure_uses_fallback() {
        let (store, _, _, gateway) = setup();
        gateway.fail(Method::Post, LOGIN, RequestFailure::Network { reason: "offline".to_string() });

        let result = store.login("ana", "secret").await;

        assert_eq!(result.message(), Some("Login failed. Please try again."));
        assert!(!store.is_authenticated());
        assert!(!store.loading());
    }

    #[tokio::test]
    async fn test_logout_clears_credential() {
        let (store, session, storage, gateway) = setup();
        gateway.ok(Method::Post, LOGIN, json!({"token": "t"}));
        store.login("ana", "secret").await;

        store.logout();

        assert!(!store.is_authenticated());
        assert_eq!(storage.load(TOKEN_KEY), None);
        assert_eq!(session.invalidations(), 0);
    }
}
