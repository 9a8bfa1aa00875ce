//! Root and dashboard route guards.
//!
//! Every evaluation ends in either rendering the page or a 303 redirect,
//! decided fresh from the request's session.

use axum::response::{Html, IntoResponse, Redirect, Response};

use super::layout::layout_data;
use crate::context::{RequestContext, SessionResult};
use crate::render;
use crate::supabase::User;

pub const LOGIN_PATH: &str = "/login";
pub const DASHBOARD_PATH: &str = "/dashboard";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardOutcome<T> {
    Render(T),
    /// Always sent as `303 See Other`.
    Redirect(&'static str),
}

impl<T> GuardOutcome<T> {
    pub fn map<U>(self, f: impl FnOnce(T) -> U) -> GuardOutcome<U> {
        match self {
            Self::Render(data) => GuardOutcome::Render(f(data)),
            Self::Redirect(target) => GuardOutcome::Redirect(target),
        }
    }

    fn log(&self, route: &'static str) {
        match self {
            Self::Render(_) => tracing::info!(route, outcome = "render", "guard evaluated"),
            Self::Redirect(target) => tracing::info!(route, outcome = "redirect", redirect_to = *target, "guard evaluated"),
        }
    }
}

impl<T: IntoResponse> IntoResponse for GuardOutcome<T> {
    fn into_response(self) -> Response {
        match self {
            Self::Render(page) => page.into_response(),
            Self::Redirect(target) => Redirect::to(target).into_response(),
        }
    }
}

/// Data the dashboard renders with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardData {
    pub user: User,
}

/// `/` never renders: signed-in visitors go to the dashboard, everyone else
/// to the login page.
#[must_use]
pub fn root_guard(session: &SessionResult) -> GuardOutcome<()> {
    if session.is_present() {
        GuardOutcome::Redirect(DASHBOARD_PATH)
    } else {
        GuardOutcome::Redirect(LOGIN_PATH)
    }
}

#[must_use]
pub fn dashboard_guard(session: &SessionResult) -> GuardOutcome<DashboardData> {
    match session.user() {
        Some(user) => GuardOutcome::Render(DashboardData { user: user.clone() }),
        None => GuardOutcome::Redirect(LOGIN_PATH),
    }
}

/// `GET /`
pub async fn root(ctx: RequestContext) -> Response {
    let outcome = root_guard(&ctx.session);
    outcome.log("/");
    outcome.into_response()
}

/// `GET /dashboard`
pub async fn dashboard(ctx: RequestContext) -> Response {
    let outcome = dashboard_guard(&ctx.session);
    outcome.log(DASHBOARD_PATH);
    let layout = layout_data(&ctx);
    outcome
        .map(|data| Html(render::dashboard_page(&layout, &data.user)))
        .into_response()
}

#[cfg(test)]
#[path = "guards_test.rs"]
mod tests;
