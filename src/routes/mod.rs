//! Router assembly.
//!
//! SYSTEM CONTEXT
//! ==============
//! Every route sits behind the session hook, so handlers read an already
//! resolved `RequestContext`. Request ids are assigned outermost and echoed
//! on the response; the trace span for each request carries that id.

pub mod guards;
pub mod layout;
pub mod login;

use axum::Router;
use axum::body::Body;
use axum::http::{Request, StatusCode};
use axum::middleware;
use axum::routing::{get, post};
use tower_http::request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer};
use tower_http::trace::TraceLayer;
use tracing::Span;

use crate::hook::hydrate_session;
use crate::state::AppState;

/// Full application router.
pub fn app(state: AppState) -> Router {
    Router::new()
        .route("/", get(guards::root))
        .route("/dashboard", get(guards::dashboard))
        .route("/login", get(login::login_page).post(login::login))
        .route("/logout", post(login::logout))
        .route("/healthz", get(healthz))
        .layer(middleware::from_fn_with_state(state.clone(), hydrate_session))
        .layer(TraceLayer::new_for_http().make_span_with(make_span))
        .layer(PropagateRequestIdLayer::x_request_id())
        .layer(SetRequestIdLayer::x_request_id(MakeRequestUuid))
        .with_state(state)
}

fn make_span(request: &Request<Body>) -> Span {
    let request_id = request
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .unwrap_or("none");

    tracing::info_span!("http-request", method = %request.method(), path = request.uri().path(), request_id)
}

async fn healthz() -> StatusCode {
    StatusCode::OK
}

#[cfg(test)]
#[path = "mod_test.rs"]
mod tests;
