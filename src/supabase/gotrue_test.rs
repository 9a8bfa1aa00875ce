use super::*;

const SESSION_NO_EXPIRY: &str = r#"{
    "access_token": "a",
    "token_type": "bearer",
    "expires_in": 3600,
    "refresh_token": "r",
    "user": {"id": "6f1c9a52-2b7e-4d0c-9a11-0c1d2e3f4a5b", "email": "user@example.com", "created_at": "2024-01-01T00:00:00Z"}
}"#;

// =============================================================================
// parse_session
// =============================================================================

#[test]
fn parse_session_fills_expiry_from_now() {
    let session = parse_session(SESSION_NO_EXPIRY, 1_000).unwrap();
    assert_eq!(session.expires_at, Some(4_600));
    assert_eq!(session.refresh_token, "r");
}

#[test]
fn parse_session_rejects_garbage() {
    let err = parse_session("<html>bad gateway</html>", 0).unwrap_err();
    assert!(matches!(err, AuthError::Parse(_)));
}

// =============================================================================
// parse_error
// =============================================================================

#[test]
fn parse_error_reads_msg_field() {
    let body = r#"{"code":400,"error_code":"invalid_credentials","msg":"Invalid login credentials"}"#;
    match parse_error(400, body) {
        AuthError::Api { status, message } => {
            assert_eq!(status, 400);
            assert_eq!(message, "Invalid login credentials");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[test]
fn parse_error_prefers_description_over_code() {
    let body = r#"{"error":"invalid_grant","error_description":"Email not confirmed"}"#;
    assert_eq!(parse_error(400, body).to_string(), "Email not confirmed");
}

#[test]
fn parse_error_reads_message_field() {
    let body = r#"{"message":"Invalid Refresh Token: Already Used"}"#;
    assert_eq!(parse_error(400, body).to_string(), "Invalid Refresh Token: Already Used");
}

#[test]
fn parse_error_falls_back_to_status() {
    let err = parse_error(502, "upstream unavailable");
    assert_eq!(err.to_string(), "auth provider returned status 502");
    assert!(matches!(err, AuthError::Api { status: 502, .. }));
}

#[test]
fn parse_error_blank_message_falls_back() {
    let err = parse_error(400, r#"{"msg":"  "}"#);
    assert_eq!(err.to_string(), "auth provider returned status 400");
}

#[test]
fn parse_error_bad_api_key_is_configuration() {
    let err = parse_error(401, r#"{"message":"Invalid API key"}"#);
    assert!(err.is_configuration());
}

#[test]
fn parse_error_other_401_is_api() {
    let err = parse_error(401, r#"{"msg":"invalid JWT"}"#);
    assert!(!err.is_configuration());
}

// =============================================================================
// urls and status handling
// =============================================================================

#[test]
fn token_url_includes_grant_type() {
    assert_eq!(
        token_url("https://abcdefgh.supabase.co/auth/v1", "password"),
        "https://abcdefgh.supabase.co/auth/v1/token?grant_type=password"
    );
}

#[test]
fn sign_out_settled_statuses() {
    assert!(sign_out_settled(204));
    assert!(sign_out_settled(401));
    assert!(sign_out_settled(404));
    assert!(!sign_out_settled(500));
    assert!(!sign_out_settled(400));
}

#[test]
fn client_builds_from_config() {
    let config = SupabaseConfig::new("https://abcdefgh.supabase.co", "anon").unwrap();
    let client = GoTrueClient::new(&config).unwrap();
    assert_eq!(client.auth_url, "https://abcdefgh.supabase.co/auth/v1");
    assert_eq!(client.api_key, "anon");
}
