//! Auth cookie reading and payload validation.
//!
//! SYSTEM CONTEXT
//! ==============
//! After a login redirect the backend drops a cookie carrying the session
//! token and a slice of the user profile. The store reconciles against it
//! once at startup; anything that does not decode cleanly is treated as "no
//! cookie".

#[cfg(test)]
#[path = "cookie_test.rs"]
mod cookie_test;

use std::collections::HashMap;

use serde::Deserialize;

use super::types::{UserData, deserialize_i64_lenient};

/// Error returned by [`parse_auth_cookie`].
#[derive(Debug, thiserror::Error)]
pub enum CookieError {
    /// The cookie value is not JSON of the expected shape.
    #[error("invalid auth cookie payload: {0}")]
    Json(#[from] serde_json::Error),
    /// The payload decoded but carried an empty token.
    #[error("auth cookie carries an empty token")]
    EmptyToken,
}

/// Session fields carried by the auth cookie.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CookieSession {
    pub token: String,
    #[serde(deserialize_with = "deserialize_i64_lenient")]
    pub company_id: i64,
    pub company_name: String,
    #[serde(deserialize_with = "deserialize_i64_lenient")]
    pub employee_id: i64,
    pub employee_name: String,
    #[serde(deserialize_with = "deserialize_i64_lenient")]
    pub role_id: i64,
    pub role_name: String,
}

impl CookieSession {
    /// Build the user summary implied by the cookie.
    ///
    /// The cookie carries no user id, email, or phone number; those stay at
    /// their empty values until a profile fetch fills them in.
    pub fn to_user_data(&self) -> UserData {
        UserData {
            id: 0,
            email: String::new(),
            name: self.employee_name.clone(),
            phone_number: String::new(),
            role_id: self.role_id,
            role_name: self.role_name.clone(),
            company_id: self.company_id,
            company_name: self.company_name.clone(),
            employee_id: self.employee_id,
        }
    }
}

#[derive(Deserialize)]
#[serde(rename_all = "camelCase")]
struct CookiePayload {
    user_data: CookieSession,
}

/// Decode and validate an auth cookie value.
///
/// `raw` is the URI-decoded cookie value, expected to be JSON of the form
/// `{"userData": {"token", "companyId", "companyName", "employeeId",
/// "employeeName", "roleId", "roleName"}}`. Every field is required.
///
/// # Errors
///
/// Returns [`CookieError`] when the value is not JSON, a field is missing or
/// mistyped, or the token is empty.
pub fn parse_auth_cookie(raw: &str) -> Result<CookieSession, CookieError> {
    let payload: CookiePayload = serde_json::from_str(raw.trim())?;
    if payload.user_data.token.trim().is_empty() {
        return Err(CookieError::EmptyToken);
    }
    Ok(payload.user_data)
}

/// Find the raw value of cookie `name` in a `document.cookie` style header
/// (`a=1; b=2`). The value is returned as stored, without URI decoding.
pub fn find_cookie<'a>(header: &'a str, name: &str) -> Option<&'a str> {
    header
        .split(';')
        .filter_map(|pair| pair.trim().split_once('='))
        .find(|(key, _)| *key == name)
        .map(|(_, value)| value)
}

/// Source of decoded cookie values.
pub trait CookieSource {
    /// Return the URI-decoded value of cookie `name`, or `None` when the
    /// cookie is absent or cannot be read.
    fn read(&self, name: &str) -> Option<String>;
}

/// Fixed set of cookies, for tests and server-side rendering.
#[derive(Clone, Debug, Default)]
pub struct StaticCookies {
    values: HashMap<String, String>,
}

impl StaticCookies {
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a cookie with an already-decoded value.
    #[must_use]
    pub fn with(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.values.insert(name.into(), value.into());
        self
    }
}

impl CookieSource for StaticCookies {
    fn read(&self, name: &str) -> Option<String> {
        self.values.get(name).cloned()
    }
}

/// Cookies visible to scripts on the current document.
#[cfg(feature = "hydrate")]
#[derive(Clone, Copy, Debug, Default)]
pub struct DocumentCookies;

#[cfg(feature = "hydrate")]
impl CookieSource for DocumentCookies {
    fn read(&self, name: &str) -> Option<String> {
        use wasm_bindgen::JsCast;

        let document = web_sys::window()?.document()?;
        let Ok(html) = document.dyn_into::<web_sys::HtmlDocument>() else {
            return None;
        };
        let header = match html.cookie() {
            Ok(header) => header,
            Err(e) => {
                log::warn!("auth: document.cookie unreadable: {e:?}");
                return None;
            }
        };
        let raw = find_cookie(&header, name)?;
        match js_sys::decode_uri_component(raw) {
            Ok(decoded) => Some(String::from(decoded)),
            Err(e) => {
                log::warn!("auth: cookie {name} is not URI-decodable: {e:?}");
                None
            }
        }
    }
}
