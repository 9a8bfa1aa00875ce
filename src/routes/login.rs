//! Login and logout actions.

use axum::Form;
use axum::extract::rejection::FormRejection;
use axum::http::header::ACCEPT;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Json, Redirect, Response};
use serde::Deserialize;

use super::guards::{DASHBOARD_PATH, LOGIN_PATH};
use super::layout::layout_data;
use crate::context::RequestContext;
use crate::render;
use crate::supabase::{AuthClient, AuthError};

pub const MISSING_FIELDS_MESSAGE: &str = "Please fill in all fields";

#[derive(Debug, Default, Deserialize)]
pub struct LoginForm {
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub password: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoginResult {
    /// Sent as `303 See Other`.
    Redirect(&'static str),
    Failure { status: StatusCode, error: String },
}

fn non_empty(field: Option<&str>) -> Option<&str> {
    field.filter(|v| !v.is_empty())
}

/// Validate the form and make a single sign-in attempt.
pub async fn login_action(client: &AuthClient, form: &LoginForm) -> LoginResult {
    let (Some(email), Some(password)) = (non_empty(form.email.as_deref()), non_empty(form.password.as_deref())) else {
        tracing::info!(outcome = "invalid", "login rejected: missing fields");
        return LoginResult::Failure { status: StatusCode::BAD_REQUEST, error: MISSING_FIELDS_MESSAGE.into() };
    };

    tracing::debug!(email, "login attempt");
    match client.sign_in_with_password(email, password).await {
        Ok(session) => {
            tracing::info!(outcome = "success", user_id = %session.user.id, "login succeeded");
            LoginResult::Redirect(DASHBOARD_PATH)
        }
        Err(AuthError::Api { message, .. }) => {
            tracing::info!(outcome = "rejected", %message, "login rejected by provider");
            LoginResult::Failure { status: StatusCode::BAD_REQUEST, error: message }
        }
        Err(e) => {
            tracing::warn!(outcome = "error", error = %e, "login failed");
            LoginResult::Failure { status: StatusCode::BAD_REQUEST, error: e.message().to_owned() }
        }
    }
}

fn wants_json(headers: &HeaderMap) -> bool {
    headers
        .get(ACCEPT)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|accept| accept.contains("application/json"))
}

/// `GET /login`
pub async fn login_page(ctx: RequestContext) -> Html<String> {
    Html(render::login_page(&layout_data(&ctx), None, None))
}

/// `POST /login` with form fields `email` and `password`.
///
/// Failures answer with JSON `{"error": ...}` when the client asks for JSON
/// and re-render the login page otherwise.
pub async fn login(ctx: RequestContext, headers: HeaderMap, form: Result<Form<LoginForm>, FormRejection>) -> Response {
    let form = form.map(|Form(form)| form).unwrap_or_default();

    match login_action(&ctx.client, &form).await {
        LoginResult::Redirect(target) => Redirect::to(target).into_response(),
        LoginResult::Failure { status, error } => {
            if wants_json(&headers) {
                (status, Json(serde_json::json!({ "error": error }))).into_response()
            } else {
                let page = render::login_page(&layout_data(&ctx), Some(&error), form.email.as_deref());
                (status, Html(page)).into_response()
            }
        }
    }
}

/// `POST /logout`: revoke the session and clear its cookies.
pub async fn logout(ctx: RequestContext) -> Response {
    match ctx.client.sign_out().await {
        Ok(()) => Redirect::to(LOGIN_PATH).into_response(),
        Err(e) => {
            tracing::warn!(error = %e, "sign out failed");
            (StatusCode::BAD_GATEWAY, "Sign out failed").into_response()
        }
    }
}

#[cfg(test)]
#[path = "login_test.rs"]
mod tests;
