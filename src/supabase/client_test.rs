use axum::http::header::COOKIE;
use axum::http::{HeaderMap, HeaderValue};

use super::*;
use crate::state::test_helpers::*;
use crate::supabase::cookies::RequestCookies;

fn cookies_with(header: &str) -> Arc<RequestCookies> {
    let mut headers = HeaderMap::new();
    headers.insert(COOKIE, HeaderValue::from_str(header).unwrap());
    Arc::new(RequestCookies::from_headers(&headers))
}

fn stored_session(cookies: &RequestCookies) -> Option<Session> {
    cookies::read_chunked(cookies, &test_config().storage_key)
        .as_deref()
        .and_then(cookies::decode_session)
}

// =============================================================================
// get_session
// =============================================================================

#[tokio::test]
async fn get_session_without_cookie_is_none() {
    let mock = Arc::new(MockAuth::new());
    let client = test_client(mock.clone(), Arc::new(RequestCookies::default()));
    assert!(client.get_session().await.unwrap().is_none());
    assert_eq!(mock.refresh_calls(), 0);
}

#[tokio::test]
async fn get_session_returns_stored_user() {
    let mock = Arc::new(MockAuth::new());
    let session = valid_session();
    let client = test_client(mock.clone(), cookies_with(&session_cookie(&session)));

    let resolved = client.get_session().await.unwrap().unwrap();
    assert_eq!(resolved, session);
    assert_eq!(resolved.user, test_user());
    assert_eq!(mock.refresh_calls(), 0);
}

#[tokio::test]
async fn get_session_reassembles_chunked_cookie() {
    let session = valid_session();
    let value = cookies::encode_session(&session).unwrap();
    let (head, tail) = value.split_at(value.len() / 2);
    let key = test_config().storage_key;
    let client = test_client(Arc::new(MockAuth::new()), cookies_with(&format!("{key}.0={head}; {key}.1={tail}")));

    assert_eq!(client.get_session().await.unwrap(), Some(session));
}

#[tokio::test]
async fn get_session_clears_unreadable_cookie() {
    let cookies = cookies_with(&format!("{}=base64-garbage", test_config().storage_key));
    let client = test_client(Arc::new(MockAuth::new()), cookies.clone());

    assert!(client.get_session().await.unwrap().is_none());
    assert!(cookies.get(client.storage_key()).is_none());
}

#[tokio::test]
async fn get_session_refreshes_expiring_session() {
    let mock = Arc::new(MockAuth::new());
    let cookies = cookies_with(&session_cookie(&expired_session()));
    let client = test_client(mock.clone(), cookies.clone());

    let resolved = client.get_session().await.unwrap().unwrap();
    assert_eq!(resolved.access_token, "refreshed-access");
    assert_eq!(mock.refresh_calls(), 1);
    assert_eq!(
        stored_session(&cookies).map(|s| s.access_token),
        Some("refreshed-access".to_owned())
    );
}

#[tokio::test]
async fn get_session_rejected_refresh_clears_cookie() {
    let mock = Arc::new(MockAuth::new().with_refresh(RefreshBehavior::Reject));
    let cookies = cookies_with(&session_cookie(&expired_session()));
    let client = test_client(mock.clone(), cookies.clone());

    assert!(client.get_session().await.unwrap().is_none());
    assert!(stored_session(&cookies).is_none());
}

#[tokio::test]
async fn get_session_unreachable_provider_propagates() {
    let mock = Arc::new(MockAuth::new().with_refresh(RefreshBehavior::Unreachable));
    let cookies = cookies_with(&session_cookie(&expired_session()));
    let client = test_client(mock, cookies.clone());

    let err = client.get_session().await.unwrap_err();
    assert!(matches!(err, AuthError::Request(_)));
    assert!(stored_session(&cookies).is_some(), "transport errors keep the cookie");
}

#[tokio::test]
async fn get_session_misconfigured_provider_propagates() {
    let mock = Arc::new(MockAuth::new().with_refresh(RefreshBehavior::Misconfigured));
    let client = test_client(mock, cookies_with(&session_cookie(&expired_session())));
    assert!(client.get_session().await.unwrap_err().is_configuration());
}

// =============================================================================
// sign_in_with_password
// =============================================================================

#[tokio::test]
async fn sign_in_success_writes_session_cookie() {
    let mock = Arc::new(MockAuth::new());
    let cookies = Arc::new(RequestCookies::default());
    let client = test_client(mock.clone(), cookies.clone());

    let session = client
        .sign_in_with_password(TEST_EMAIL, TEST_PASSWORD)
        .await
        .unwrap();
    assert_eq!(mock.sign_in_calls(), 1);
    assert_eq!(stored_session(&cookies), Some(session));
}

#[tokio::test]
async fn sign_in_rejected_writes_nothing() {
    let mock = Arc::new(MockAuth::new());
    let cookies = Arc::new(RequestCookies::default());
    let client = test_client(mock.clone(), cookies.clone());

    let err = client
        .sign_in_with_password(TEST_EMAIL, "wrong")
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), REJECTED_MESSAGE);
    assert_eq!(mock.sign_in_calls(), 1);
    assert!(stored_session(&cookies).is_none());
}

// =============================================================================
// sign_out
// =============================================================================

#[tokio::test]
async fn sign_out_revokes_and_clears() {
    let mock = Arc::new(MockAuth::new());
    let cookies = cookies_with(&session_cookie(&valid_session()));
    let client = test_client(mock.clone(), cookies.clone());

    client.sign_out().await.unwrap();
    assert_eq!(mock.sign_out_calls(), 1);
    assert!(stored_session(&cookies).is_none());
}

#[tokio::test]
async fn sign_out_without_session_skips_provider() {
    let mock = Arc::new(MockAuth::new());
    let client = test_client(mock.clone(), Arc::new(RequestCookies::default()));

    client.sign_out().await.unwrap();
    assert_eq!(mock.sign_out_calls(), 0);
}

#[tokio::test]
async fn sign_out_failure_keeps_cookie() {
    let mock = Arc::new(MockAuth::new().failing_sign_out());
    let cookies = cookies_with(&session_cookie(&valid_session()));
    let client = test_client(mock, cookies.clone());

    assert!(client.sign_out().await.is_err());
    assert!(stored_session(&cookies).is_some());
}

#[test]
fn debug_hides_provider_handle() {
    let client = test_client(Arc::new(MockAuth::new()), Arc::new(RequestCookies::default()));
    let debug = format!("{client:?}");
    assert!(debug.contains("sb-abcdefgh-auth-token"));
}
