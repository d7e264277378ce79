use super::*;
use crate::net::types::UserData;

#[test]
fn should_redirect_unauth_when_token_missing() {
    let state = AuthState::default();
    assert!(should_redirect_unauth(&state));
}

#[test]
fn should_redirect_unauth_when_only_user_data_present() {
    let state = AuthState { user_data: Some(UserData::default()), ..AuthState::default() };
    assert!(should_redirect_unauth(&state));
}

#[test]
fn should_not_redirect_when_token_exists() {
    let state = AuthState {
        token: Some("abc".to_owned()),
        user_data: Some(UserData { name: "Jo".to_owned(), ..UserData::default() }),
        ..AuthState::default()
    };
    assert!(!should_redirect_unauth(&state));
}
