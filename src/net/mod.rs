//! Data exchanged with the auth backend: record DTOs and the login cookie.

pub mod cookie;
pub mod types;
