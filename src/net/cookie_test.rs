use super::*;

fn well_formed() -> String {
    serde_json::json!({
        "userData": {
            "token": "abc",
            "companyId": 1,
            "companyName": "Acme",
            "employeeId": 7,
            "employeeName": "Jo",
            "roleId": 2,
            "roleName": "Admin"
        }
    })
    .to_string()
}

// =============================================================
// parse_auth_cookie
// =============================================================

#[test]
fn parses_well_formed_cookie() {
    let session = parse_auth_cookie(&well_formed()).unwrap();
    assert_eq!(session.token, "abc");
    assert_eq!(session.company_id, 1);
    assert_eq!(session.company_name, "Acme");
    assert_eq!(session.employee_id, 7);
    assert_eq!(session.employee_name, "Jo");
    assert_eq!(session.role_id, 2);
    assert_eq!(session.role_name, "Admin");
}

#[test]
fn accepts_numeric_strings_for_ids() {
    let raw = r#"{"userData":{"token":"abc","companyId":"1","companyName":"Acme","employeeId":"7","employeeName":"Jo","roleId":"2","roleName":"Admin"}}"#;
    let session = parse_auth_cookie(raw).unwrap();
    assert_eq!((session.company_id, session.employee_id, session.role_id), (1, 7, 2));
}

#[test]
fn ignores_unknown_fields() {
    let raw = r#"{"userData":{"token":"abc","companyId":1,"companyName":"Acme","employeeId":7,"employeeName":"Jo","roleId":2,"roleName":"Admin","theme":"dark"},"exp":0}"#;
    assert!(parse_auth_cookie(raw).is_ok());
}

#[test]
fn rejects_non_json() {
    assert!(matches!(parse_auth_cookie("not-json"), Err(CookieError::Json(_))));
    assert!(matches!(parse_auth_cookie(""), Err(CookieError::Json(_))));
}

#[test]
fn rejects_missing_user_data() {
    assert!(matches!(parse_auth_cookie(r#"{"token":"abc"}"#), Err(CookieError::Json(_))));
    assert!(matches!(parse_auth_cookie(r#"{"userData":null}"#), Err(CookieError::Json(_))));
}

#[test]
fn rejects_partially_populated_user_data() {
    let raw = r#"{"userData":{"token":"abc","companyId":1}}"#;
    assert!(matches!(parse_auth_cookie(raw), Err(CookieError::Json(_))));
}

#[test]
fn rejects_mistyped_ids() {
    let raw = r#"{"userData":{"token":"abc","companyId":"acme","companyName":"Acme","employeeId":7,"employeeName":"Jo","roleId":2,"roleName":"Admin"}}"#;
    assert!(parse_auth_cookie(raw).is_err());
}

#[test]
fn rejects_blank_token() {
    let raw = r#"{"userData":{"token":"  ","companyId":1,"companyName":"Acme","employeeId":7,"employeeName":"Jo","roleId":2,"roleName":"Admin"}}"#;
    assert!(matches!(parse_auth_cookie(raw), Err(CookieError::EmptyToken)));
}

// =============================================================
// CookieSession -> UserData
// =============================================================

#[test]
fn user_data_backfills_missing_fields() {
    let user = parse_auth_cookie(&well_formed()).unwrap().to_user_data();
    assert_eq!(user.id, 0);
    assert_eq!(user.email, "");
    assert_eq!(user.phone_number, "");
    assert_eq!(user.name, "Jo");
    assert_eq!(user.company_name, "Acme");
    assert_eq!(user.employee_id, 7);
    assert_eq!(user.role_name, "Admin");
}

// =============================================================
// find_cookie / StaticCookies
// =============================================================

#[test]
fn find_cookie_splits_header() {
    let header = "theme=dark; user=%7B%7D; other=a=b";
    assert_eq!(find_cookie(header, "user"), Some("%7B%7D"));
    assert_eq!(find_cookie(header, "theme"), Some("dark"));
    assert_eq!(find_cookie(header, "other"), Some("a=b"));
    assert_eq!(find_cookie(header, "missing"), None);
    assert_eq!(find_cookie("", "user"), None);
}

#[test]
fn find_cookie_requires_exact_name() {
    assert_eq!(find_cookie("username=jo", "user"), None);
}

#[test]
fn static_cookies_read_by_name() {
    let cookies = StaticCookies::new().with("user", "value");
    assert_eq!(cookies.read("user").as_deref(), Some("value"));
    assert_eq!(cookies.read("session"), None);
}
