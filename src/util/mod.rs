//! Utility helpers shared across auth modules.
//!
//! SYSTEM CONTEXT
//! ==============
//! Utility modules isolate browser/environment concerns from store logic to
//! improve reuse and testability.

pub mod auth;
pub mod storage;
