use axum::Router;
use axum::body::{Body, to_bytes};
use axum::http::header::{COOKIE, SET_COOKIE};
use axum::routing::get;
use tower::ServiceExt;

use super::*;
use crate::state::test_helpers::*;

async fn whoami(ctx: RequestContext) -> String {
    ctx.session
        .user()
        .and_then(|u| u.email.clone())
        .unwrap_or_else(|| "anonymous".into())
}

fn probe_app(state: AppState) -> Router {
    Router::new()
        .route("/whoami", get(whoami))
        .layer(axum::middleware::from_fn_with_state(state.clone(), hydrate_session))
        .with_state(state)
}

async fn call(app: Router, cookie: Option<String>) -> Response {
    let mut builder = axum::http::Request::builder().uri("/whoami");
    if let Some(cookie) = cookie {
        builder = builder.header(COOKIE, cookie);
    }
    app.oneshot(builder.body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn body_text(response: Response) -> String {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    String::from_utf8(bytes.to_vec()).unwrap()
}

#[tokio::test]
async fn valid_cookie_exposes_user() {
    let app = probe_app(test_app_state(Arc::new(MockAuth::new())));
    let response = call(app, Some(session_cookie(&valid_session()))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().get(SET_COOKIE).is_none());
    assert_eq!(body_text(response).await, TEST_EMAIL);
}

#[tokio::test]
async fn missing_cookie_is_anonymous() {
    let app = probe_app(test_app_state(Arc::new(MockAuth::new())));
    let response = call(app, None).await;
    assert_eq!(body_text(response).await, "anonymous");
}

#[tokio::test]
async fn refreshed_session_is_flushed_to_response() {
    let mock = Arc::new(MockAuth::new());
    let app = probe_app(test_app_state(mock.clone()));
    let response = call(app, Some(session_cookie(&expired_session()))).await;

    let set_cookie = response
        .headers()
        .get(SET_COOKIE)
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_owned();
    assert!(set_cookie.starts_with(&format!("{}=base64-", test_config().storage_key)));
    assert_eq!(mock.refresh_calls(), 1);
    assert_eq!(body_text(response).await, TEST_EMAIL);
}

#[tokio::test]
async fn provider_outage_degrades_to_anonymous() {
    let mock = Arc::new(MockAuth::new().with_refresh(RefreshBehavior::Unreachable));
    let app = probe_app(test_app_state(mock));
    let response = call(app, Some(session_cookie(&expired_session()))).await;
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(body_text(response).await, "anonymous");
}

#[tokio::test]
async fn provider_configuration_error_aborts() {
    let mock = Arc::new(MockAuth::new().with_refresh(RefreshBehavior::Misconfigured));
    let app = probe_app(test_app_state(mock));
    let response = call(app, Some(session_cookie(&expired_session()))).await;
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body_text(response).await, MISCONFIGURED_BODY);
}
