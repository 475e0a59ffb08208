//! Session Context
//!
//! Holds the bearer credential shared by every request. The gateway is the
//! only writer on the failure path: a 401 clears the credential and bumps
//! `invalidations` once, and the host app reacts to that counter.

use std::sync::Arc;

use leptos::prelude::*;

pub const TOKEN_KEY: &str = "token";
pub const USERNAME_KEY: &str = "username";

/// Where the credential survives page reloads
pub trait CredentialStorage: Send + Sync {
    fn load(&self, key: &str) -> Option<String>;
    fn save(&self, key: &str, value: &str);
    fn remove(&self, key: &str);
}

/// `window.localStorage`
pub struct BrowserStorage;

impl BrowserStorage {
    fn local() -> Option<web_sys::Storage> {
        web_sys::window()?.local_storage().ok().flatten()
    }
}

impl CredentialStorage for BrowserStorage {
    fn load(&self, key: &str) -> Option<String> {
        Self::local()?.get_item(key).ok().flatten()
    }

    fn save(&self, key: &str, value: &str) {
        match Self::local() {
            Some(storage) => {
                if storage.set_item(key, value).is_err() {
                    log::warn!("could not persist {}", key);
                }
            }
            None => log::warn!("localStorage unavailable, {} not persisted", key),
        }
    }

    fn remove(&self, key: &str) {
        if let Some(storage) = Self::local() {
            let _ = storage.remove_item(key);
        }
    }
}

/// Credential state shared by the gateway and the auth store
#[derive(Clone, Copy)]
pub struct Session {
    token: RwSignal<Option<String>>,
    username: RwSignal<Option<String>>,
    invalidations: RwSignal<u64>,
    storage: StoredValue<Arc<dyn CredentialStorage>>,
}

impl Session {
    /// Build a session from whatever the storage already holds
    pub fn restore(storage: Arc<dyn CredentialStorage>) -> Self {
        let token = storage.load(TOKEN_KEY).filter(|t| !t.is_empty());
        let username = storage.load(USERNAME_KEY).filter(|u| !u.is_empty());
        Self {
            token: RwSignal::new(token),
            username: RwSignal::new(username),
            invalidations: RwSignal::new(0),
            storage: StoredValue::new(storage),
        }
    }

    /// Current bearer token, without subscribing
    pub fn token(&self) -> Option<String> {
        self.token.get_untracked()
    }

    pub fn username(&self) -> Option<String> {
        self.username.get()
    }

    pub fn is_authenticated(&self) -> bool {
        self.token.with(|token| token.is_some())
    }

    /// Number of times the backend rejected the credential
    pub fn invalidations(&self) -> u64 {
        self.invalidations.get()
    }

    pub fn sign_in(&self, token: String, username: String) {
        self.storage.with_value(|storage| {
            storage.save(TOKEN_KEY, &token);
            storage.save(USERNAME_KEY, &username);
        });
        self.token.set(Some(token));
        self.username.set(Some(username));
    }

    /// Forget the credential without announcing it
    pub fn sign_out(&self) {
        self.storage.with_value(|storage| {
            storage.remove(TOKEN_KEY);
            storage.remove(USERNAME_KEY);
        });
        self.token.set(None);
        self.username.set(None);
    }

    /// Forget the credential and notify the host app
    pub fn invalidate(&self) {
        log::warn!("credential rejected, signing out");
        self.sign_out();
        self.invalidations.update(|n| *n += 1);
    }

    /// Re-read persisted credentials, keeping current values when storage is empty
    pub fn check_auth(&self) {
        let (token, username) = self
            .storage
            .with_value(|storage| (storage.load(TOKEN_KEY), storage.load(USERNAME_KEY)));
        if let Some(token) = token.filter(|t| !t.is_empty()) {
            self.token.set(Some(token));
        }
        if let Some(username) = username.filter(|u| !u.is_empty()) {
            self.username.set(Some(username));
        }
    }
}


#[cfg(test)]
mod tests {
    use super::memory::MemoryStorage;
    use super::*;

    #[test]
    fn test_restore_reads_storage() {
        let session = Session::restore(Arc::new(MemoryStorage::with_token("abc")));
        assert_eq!(session.token(), Some("abc".to_string()));
        assert!(session.is_authenticated());
    }

    #[test]
    fn test_empty_token_is_unauthenticated() {
        let session = Session::restore(Arc::new(MemoryStorage::with_token("")));
        assert!(!session.is_authenticated());
    }

    #[test]
    fn test_sign_in_persists() {
        let storage = Arc::new(MemoryStorage::default());
        let session = Session::restore(storage.clone());
        session.sign_in("t0k".to_string(), "ana".to_string());
        assert_eq!(storage.load(TOKEN_KEY), Some("t0k".to_string()));
        assert_eq!(session.username(), Some("ana".to_string()));
    }

    #[test]
    fn test_invalidate_clears_and_counts() {
        let storage = Arc::new(MemoryStorage::with_token("abc"));
        let session = Session::restore(storage.clone());
        session.invalidate();
        assert_eq!(session.token(), None);
        assert_eq!(storage.load(TOKEN_KEY), None);
        assert_eq!(session.invalidations(), 1);
    }

    #[test]
    fn test_sign_out_does_not_count() {
        let session = Session::restore(Arc::new(MemoryStorage::with_token("abc")));
        session.sign_out();
        assert!(!session.is_authenticated());
        assert_eq!(session.invalidations(), 0);
    }

    #[test]
    fn test_check_auth_picks_up_external_login() {
        let storage = Arc::new(MemoryStorage::default());
        let session = Session::restore(storage.clone());
        storage.save(TOKEN_KEY, "later");
        session.check_auth();
        assert_eq!(session.token(), Some("later".to_string()));
    }
}
