//! Shared auth route helpers.
//!
//! SYSTEM CONTEXT
//! ==============
//! Route components should apply identical unauthenticated redirect behavior.

#[cfg(test)]
#[path = "auth_test.rs"]
mod auth_test;

use crate::state::auth::AuthState;

pub const LOGIN_PATH: &str = "/login";

/// True when the session has no token and protected routes should bounce to
/// [`LOGIN_PATH`].
pub fn should_redirect_unauth(state: &AuthState) -> bool {
    !state.is_authenticated()
}
