//! Auth-session state for the current browser user.
//!
//! SYSTEM CONTEXT
//! ==============
//! Login flows populate the store, profile fetches fill in details later, and
//! route guards read it to decide on redirects. Only the token and user summary
//! survive a reload; details and employee info are re-fetched every session.
//!
//! PERSISTENCE
//! ===========
//! After every transition the `{token, userData}` projection is written under
//! the configured key as `{"state": {...}, "version": N}`. At startup the
//! stored envelope is restored and then overridden by the auth cookie when one
//! decodes cleanly.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use serde::{Deserialize, Serialize};

use crate::config::AuthConfig;
use crate::net::cookie::{CookieSession, CookieSource, parse_auth_cookie};
use crate::net::types::{BasicEmployeeInfo, UserData, UserDataPatch, UserDetailsData};
use crate::util::storage::{KeyValueStorage, StorageError, load_json, save_json};

/// Snapshot of everything the client knows about the signed-in user.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct AuthState {
    /// Session token issued by the backend.
    pub token: Option<String>,
    /// User summary set together with the token.
    pub user_data: Option<UserData>,
    /// Full profile with the permission tree. Never persisted.
    pub user_details_data: Option<UserDetailsData>,
    /// Basic employee record. Never persisted.
    pub basic_employee_info: Option<BasicEmployeeInfo>,
}

impl AuthState {
    pub fn is_authenticated(&self) -> bool {
        self.token.is_some()
    }
}

/// The persisted subset of [`AuthState`].
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PersistedAuth {
    #[serde(default)]
    pub token: Option<String>,
    #[serde(default)]
    pub user_data: Option<UserData>,
}

impl From<&AuthState> for PersistedAuth {
    fn from(state: &AuthState) -> Self {
        Self { token: state.token.clone(), user_data: state.user_data.clone() }
    }
}

/// Storage record wrapping [`PersistedAuth`].
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct PersistEnvelope {
    pub state: PersistedAuth,
    pub version: u32,
}

/// Where the state came from during startup rehydration.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum HydrationSource {
    /// Nothing stored and no usable cookie.
    Empty,
    /// Restored from the persisted envelope.
    Storage,
    /// Taken from the auth cookie.
    Cookie,
}

/// Handle returned by [`AuthStore::subscribe`].
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener = Box<dyn Fn(&AuthState)>;

/// Observable auth state container with write-through persistence.
pub struct AuthStore {
    state: AuthState,
    storage: Box<dyn KeyValueStorage>,
    config: AuthConfig,
    listeners: Vec<(SubscriptionId, Listener)>,
    next_subscription: u64,
    hydrated: Option<HydrationSource>,
}

impl std::fmt::Debug for AuthStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthStore")
            .field("authenticated", &self.state.is_authenticated())
            .field("config", &self.config)
            .field("listeners", &self.listeners.len())
            .field("hydrated", &self.hydrated)
            .finish_non_exhaustive()
    }
}

impl AuthStore {
    /// Create an empty, not yet hydrated store.
    pub fn new(storage: Box<dyn KeyValueStorage>, config: AuthConfig) -> Self {
        Self {
            state: AuthState::default(),
            storage,
            config,
            listeners: Vec::new(),
            next_subscription: 0,
            hydrated: None,
        }
    }

    /// Build a store from persisted state, then reconcile with the auth cookie.
    ///
    /// A missing, malformed, or partially populated cookie leaves the restored
    /// state untouched. A stored envelope that does not decode, or whose version
    /// differs from `config.persist_version`, is discarded.
    ///
    /// # Errors
    ///
    /// Returns an error if storage cannot be read. Failing to write the
    /// cookie-derived state back is logged; the store still carries it.
    pub fn rehydrate(
        storage: Box<dyn KeyValueStorage>,
        config: AuthConfig,
        cookies: &dyn CookieSource,
    ) -> Result<Self, StorageError> {
        let mut store = Self::new(storage, config);
        let mut source = HydrationSource::Empty;

        if let Some(restored) = store.load_persisted()? {
            if restored.token.is_some() || restored.user_data.is_some() {
                source = HydrationSource::Storage;
            }
            store.state.token = restored.token;
            store.state.user_data = restored.user_data;
        }

        if let Some(session) = store.read_cookie(cookies) {
            let user_data = session.to_user_data();
            if let Err(e) = store.set_auth(session.token, user_data) {
                log::error!("auth: cookie session applied but not persisted: {e}");
            }
            source = HydrationSource::Cookie;
        }

        log::debug!("auth: rehydrated from {source:?}");
        store.hydrated = Some(source);
        Ok(store)
    }

    fn load_persisted(&self) -> Result<Option<PersistedAuth>, StorageError> {
        let key = &self.config.storage_key;
        match load_json::<PersistEnvelope>(self.storage.as_ref(), key)? {
            None => Ok(None),
            Some(Err(e)) => {
                log::warn!("auth: discarding undecodable {key} entry: {e}");
                Ok(None)
            }
            Some(Ok(envelope)) if envelope.version != self.config.persist_version => {
                log::warn!(
                    "auth: discarding {key} entry with version {} (expected {})",
                    envelope.version,
                    self.config.persist_version
                );
                Ok(None)
            }
            Some(Ok(envelope)) => Ok(Some(envelope.state)),
        }
    }

    fn read_cookie(&self, cookies: &dyn CookieSource) -> Option<CookieSession> {
        let name = &self.config.cookie_name;
        let raw = cookies.read(name)?;
        match parse_auth_cookie(&raw) {
            Ok(session) => Some(session),
            Err(e) => {
                log::warn!("auth: ignoring cookie {name}: {e}");
                None
            }
        }
    }

    // =========================================================================
    // READS
    // =========================================================================

    pub fn state(&self) -> &AuthState {
        &self.state
    }

    pub fn token(&self) -> Option<&str> {
        self.state.token.as_deref()
    }

    pub fn user_data(&self) -> Option<&UserData> {
        self.state.user_data.as_ref()
    }

    pub fn user_details_data(&self) -> Option<&UserDetailsData> {
        self.state.user_details_data.as_ref()
    }

    pub fn basic_employee_info(&self) -> Option<&BasicEmployeeInfo> {
        self.state.basic_employee_info.as_ref()
    }

    pub fn is_authenticated(&self) -> bool {
        self.state.is_authenticated()
    }

    /// True once [`AuthStore::rehydrate`] has run.
    pub fn has_hydrated(&self) -> bool {
        self.hydrated.is_some()
    }

    pub fn hydration_source(&self) -> Option<HydrationSource> {
        self.hydrated
    }

    pub fn config(&self) -> &AuthConfig {
        &self.config
    }

    // =========================================================================
    // TRANSITIONS
    // =========================================================================

    /// Replace token and user summary in one transition.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn set_auth(&mut self, token: impl Into<String>, user_data: UserData) -> Result<(), StorageError> {
        self.state.token = Some(token.into());
        self.state.user_data = Some(user_data);
        self.commit()
    }

    /// Replace the full user profile.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn set_user_details(&mut self, details: UserDetailsData) -> Result<(), StorageError> {
        self.state.user_details_data = Some(details);
        self.commit()
    }

    /// Replace the basic employee record.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn set_basic_employee_info(&mut self, info: BasicEmployeeInfo) -> Result<(), StorageError> {
        self.state.basic_employee_info = Some(info);
        self.commit()
    }

    /// Merge `patch` over the current user summary.
    ///
    /// Does nothing when no user summary is set; call [`AuthStore::set_auth`]
    /// first. Returns whether a transition happened.
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn update_user_data(&mut self, patch: UserDataPatch) -> Result<bool, StorageError> {
        let Some(user_data) = self.state.user_data.as_mut() else {
            log::debug!("auth: update_user_data ignored, no user data set");
            return Ok(false);
        };
        patch.apply_to(user_data);
        self.commit()?;
        Ok(true)
    }

    /// Reset all four fields to absent (logout).
    ///
    /// # Errors
    ///
    /// Returns an error if the persisted projection cannot be written.
    pub fn clear_auth(&mut self) -> Result<(), StorageError> {
        self.state = AuthState::default();
        self.commit()
    }

    /// Clear the state and delete the persisted entry.
    ///
    /// # Errors
    ///
    /// Returns an error if the storage entry cannot be removed.
    pub fn reset(&mut self) -> Result<(), StorageError> {
        self.state = AuthState::default();
        self.notify();
        self.storage.remove_item(&self.config.storage_key)
    }

    // =========================================================================
    // SUBSCRIPTIONS
    // =========================================================================

    /// Register `listener` to run after every transition, in subscription order.
    pub fn subscribe(&mut self, listener: impl Fn(&AuthState) + 'static) -> SubscriptionId {
        let id = SubscriptionId(self.next_subscription);
        self.next_subscription += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns whether it was registered.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(listener_id, _)| *listener_id != id);
        self.listeners.len() != before
    }

    fn commit(&mut self) -> Result<(), StorageError> {
        self.notify();
        self.persist()
    }

    fn notify(&self) {
        for (_, listener) in &self.listeners {
            listener(&self.state);
        }
    }

    fn persist(&self) -> Result<(), StorageError> {
        let envelope = PersistEnvelope { state: PersistedAuth::from(&self.state), version: self.config.persist_version };
        save_json(self.storage.as_ref(), &self.config.storage_key, &envelope)
    }
}
