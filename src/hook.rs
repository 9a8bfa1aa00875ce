//! Request hook: session hydration for every inbound request.
//!
//! SYSTEM CONTEXT
//! ==============
//! Installed on the router with `middleware::from_fn_with_state`, so it runs
//! once per request before any route handler. It binds an auth client to the
//! request's cookies, resolves the session, and exposes both through a
//! [`RequestContext`] extension. Cookie writes made anywhere during the request
//! (refresh here, sign-in or sign-out in a handler) are flushed onto the
//! response on the way out.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::StatusCode;
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};

use crate::context::{RequestContext, SessionResult};
use crate::state::AppState;
use crate::supabase::{RequestCookies, create_server_client};

pub const MISCONFIGURED_BODY: &str = "auth provider misconfigured";

pub async fn hydrate_session(State(state): State<AppState>, mut request: Request, next: Next) -> Response {
    let cookies = Arc::new(RequestCookies::from_headers(request.headers()));
    let client = Arc::new(create_server_client(&state.config, state.auth.clone(), cookies.clone()));

    let session = match client.get_session().await {
        Ok(session) => session,
        Err(e) if e.is_configuration() => {
            tracing::error!(error = %e, "session lookup failed on provider configuration");
            return (StatusCode::INTERNAL_SERVER_ERROR, MISCONFIGURED_BODY).into_response();
        }
        Err(e) => {
            tracing::warn!(error = %e, "session lookup failed, continuing unauthenticated");
            None
        }
    };

    let session = SessionResult::from_session(session);
    tracing::debug!(session_present = session.is_present(), "session hydrated");
    request
        .extensions_mut()
        .insert(RequestContext { client, session });

    let response = next.run(request).await;
    (cookies.take_jar(), response).into_response()
}

#[cfg(test)]
#[path = "hook_test.rs"]
mod tests;
