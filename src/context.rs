//! Leptos context wiring for the auth store.
//!
//! DESIGN
//! ======
//! The store lives in a local `StoredValue`; a subscribed `RwSignal` mirrors
//! its state so components re-render on every transition. Writes go through
//! [`AuthContext`] so persistence is never bypassed.

#[cfg(test)]
#[path = "context_test.rs"]
mod context_test;

use leptos::prelude::*;

use crate::net::types::{BasicEmployeeInfo, UserData, UserDataPatch, UserDetailsData};
use crate::state::auth::{AuthState, AuthStore};
use crate::util::storage::StorageError;

/// Error returned while bootstrapping auth in the browser.
#[derive(Debug, thiserror::Error)]
pub enum InitError {
    #[error(transparent)]
    Config(#[from] crate::config::ConfigError),
    #[error(transparent)]
    Storage(#[from] StorageError),
}

/// Copyable handle to the auth store, provided through Leptos context.
#[derive(Clone, Copy)]
pub struct AuthContext {
    state: RwSignal<AuthState>,
    store: StoredValue<AuthStore, LocalStorage>,
}

impl AuthContext {
    /// Take ownership of `store` and mirror its state into a signal.
    pub fn new(mut store: AuthStore) -> Self {
        let state = RwSignal::new(store.state().clone());
        store.subscribe(move |next| state.set(next.clone()));
        Self { state, store: StoredValue::new_local(store) }
    }

    /// Reactive view of the current state.
    pub fn signal(&self) -> ReadSignal<AuthState> {
        self.state.read_only()
    }

    pub fn token(&self) -> Option<String> {
        self.state.with(|s| s.token.clone())
    }

    pub fn user_data(&self) -> Option<UserData> {
        self.state.with(|s| s.user_data.clone())
    }

    pub fn user_details_data(&self) -> Option<UserDetailsData> {
        self.state.with(|s| s.user_details_data.clone())
    }

    pub fn basic_employee_info(&self) -> Option<BasicEmployeeInfo> {
        self.state.with(|s| s.basic_employee_info.clone())
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.with(AuthState::is_authenticated)
    }

    /// See [`AuthStore::set_auth`].
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn set_auth(&self, token: impl Into<String>, user_data: UserData) -> Result<(), StorageError> {
        let token = token.into();
        self.apply(move |store| store.set_auth(token, user_data))
    }

    /// See [`AuthStore::set_user_details`].
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn set_user_details(&self, details: UserDetailsData) -> Result<(), StorageError> {
        self.apply(move |store| store.set_user_details(details))
    }

    /// See [`AuthStore::set_basic_employee_info`].
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn set_basic_employee_info(&self, info: BasicEmployeeInfo) -> Result<(), StorageError> {
        self.apply(move |store| store.set_basic_employee_info(info))
    }

    /// See [`AuthStore::update_user_data`].
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn update_user_data(&self, patch: UserDataPatch) -> Result<bool, StorageError> {
        self.apply(move |store| store.update_user_data(patch))
    }

    /// See [`AuthStore::clear_auth`].
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn clear_auth(&self) -> Result<(), StorageError> {
        self.apply(AuthStore::clear_auth)
    }

    fn apply<O>(&self, op: impl FnOnce(&mut AuthStore) -> Result<O, StorageError>) -> Result<O, StorageError> {
        let Some(result) = self.store.try_update_value(op) else {
            log::error!("auth: store used after its owner was disposed");
            return Err(StorageError::Unavailable);
        };
        if let Err(e) = &result {
            log::error!("auth: failed to persist state: {e}");
        }
        result
    }
}

/// Wrap `store` in an [`AuthContext`] and provide it to child components.
pub fn provide_auth_context(store: AuthStore) -> AuthContext {
    let ctx = AuthContext::new(store);
    provide_context(ctx);
    ctx
}

/// Fetch the [`AuthContext`] provided by an ancestor.
pub fn use_auth() -> AuthContext {
    expect_context::<AuthContext>()
}

/// Rehydrate from `localStorage` and the auth cookie, then provide the context.
///
/// # Errors
///
/// Returns an error if configuration is invalid or `localStorage` cannot be
/// used.
#[cfg(feature = "hydrate")]
pub fn init_browser_auth() -> Result<AuthContext, InitError> {
    use crate::config::AuthConfig;
    use crate::net::cookie::DocumentCookies;
    use crate::util::storage::BrowserStorage;

    let config = AuthConfig::from_env()?;
    let storage = BrowserStorage::local()?;
    let store = AuthStore::rehydrate(Box::new(storage), config, &DocumentCookies)?;
    Ok(provide_auth_context(store))
}
