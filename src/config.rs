//! Auth store configuration parsed from environment variables.

pub const DEFAULT_STORAGE_KEY: &str = "auth-storage";
pub const DEFAULT_USER_COOKIE: &str = "user";
pub const DEFAULT_PERSIST_VERSION: u32 = 0;

/// Error returned by [`AuthConfig::from_env`].
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("{var} must not be empty")]
    EmptyValue { var: &'static str },
    #[error("invalid AUTH_PERSIST_VERSION: {value}")]
    InvalidVersion { value: String },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
    /// Storage key for the persisted `{token, userData}` envelope.
    pub storage_key: String,
    /// Name of the cookie checked at startup.
    pub cookie_name: String,
    /// Envelope version; stored values with another version are discarded.
    pub persist_version: u32,
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            storage_key: DEFAULT_STORAGE_KEY.to_owned(),
            cookie_name: DEFAULT_USER_COOKIE.to_owned(),
            persist_version: DEFAULT_PERSIST_VERSION,
        }
    }
}

impl AuthConfig {
    /// Build config from environment variables.
    ///
    /// Each variable is read from the runtime environment first, then from
    /// the value baked in at compile time (the only source on
    /// `wasm32-unknown-unknown`), then the default.
    ///
    /// Optional:
    /// - `AUTH_STORAGE_KEY`: default `auth-storage`
    /// - `AUTH_USER_COOKIE`: default `user`
    /// - `AUTH_PERSIST_VERSION`: default 0
    ///
    /// # Errors
    ///
    /// Returns an error if a runtime variable is set but empty, or the version
    /// is not a `u32`.
    pub fn from_env() -> Result<Self, ConfigError> {
        let storage_key = env_value("AUTH_STORAGE_KEY", option_env!("AUTH_STORAGE_KEY"))?
            .unwrap_or_else(|| DEFAULT_STORAGE_KEY.to_owned());
        let cookie_name = env_value("AUTH_USER_COOKIE", option_env!("AUTH_USER_COOKIE"))?
            .unwrap_or_else(|| DEFAULT_USER_COOKIE.to_owned());
        let persist_version = match env_value("AUTH_PERSIST_VERSION", option_env!("AUTH_PERSIST_VERSION"))? {
            Some(raw) => parse_version(&raw)?,
            None => DEFAULT_PERSIST_VERSION,
        };

        Ok(Self { storage_key, cookie_name, persist_version })
    }
}

/// Runtime value of `var`, else the non-blank compile-time `baked` value.
fn env_value(var: &'static str, baked: Option<&'static str>) -> Result<Option<String>, ConfigError> {
    if let Some(value) = env_non_empty(var)? {
        return Ok(Some(value));
    }
    Ok(baked
        .map(str::trim)
        .filter(|value| !value.is_empty())
        .map(str::to_owned))
}

fn env_non_empty(var: &'static str) -> Result<Option<String>, ConfigError> {
    match std::env::var(var) {
        Ok(value) if value.trim().is_empty() => Err(ConfigError::EmptyValue { var }),
        Ok(value) => Ok(Some(value.trim().to_owned())),
        Err(_) => Ok(None),
    }
}

fn parse_version(raw: &str) -> Result<u32, ConfigError> {
    raw.trim()
        .parse::<u32>()
        .map_err(|_| ConfigError::InvalidVersion { value: raw.to_owned() })
}

#[cfg(test)]
#[path = "config_test.rs"]
mod tests;
