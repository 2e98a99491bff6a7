use domain::{AuthToken, Credentials, Session, SessionId};

#[test]
fn debug_output_hides_secrets() {
    let credentials = Credentials::new("user", "hunter2");
    let token = AuthToken {
        access_token: "secret-access".to_string(),
        token_type: "Bearer".to_string(),
        expires_in: 3600,
        refresh_token: "secret-refresh".to_string(),
    };
    let session = Session {
        token: token.clone(),
        id: SessionId(100),
    };

    let rendered = format!("{:?} {:?} {:?}", credentials, token, session);
    assert!(rendered.contains("user"));
    assert!(!rendered.contains("hunter2"));
    assert!(!rendered.contains("secret-access"));
    assert!(!rendered.contains("secret-refresh"));
}

#[test]
fn session_id_displays_as_integer() {
    assert_eq!(SessionId(100).to_string(), "100");
}
