//! # auth-store
//!
//! Client-side authentication state for the Leptos + WASM front end.
//!
//! The crate holds the session token, the user summary, the detailed
//! permission profile, and basic employee info. Token and summary are
//! written through to `localStorage` after every change and restored on
//! reload, with the login cookie taking precedence when it decodes cleanly.
//!
//! - [`state::auth::AuthStore`]: the store and its transitions.
//! - [`context::AuthContext`]: signal-backed handle provided via Leptos context.
//! - [`net::cookie`]: auth cookie parsing.
//! - [`util::storage`]: storage backends.

pub mod config;
pub mod context;
pub mod net;
pub mod state;
pub mod util;

pub use config::AuthConfig;
pub use context::{AuthContext, provide_auth_context, use_auth};
pub use state::auth::{AuthState, AuthStore};

/// Route `log` output to the browser console and install the panic hook.
///
/// # Errors
///
/// Returns an error if a logger was already installed.
#[cfg(feature = "hydrate")]
pub fn init_logging() -> Result<(), log::SetLoggerError> {
    console_error_panic_hook::set_once();
    console_log::init_with_level(log::Level::Debug)
}
