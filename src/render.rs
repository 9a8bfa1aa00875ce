//! Server-rendered HTML pages.
//!
//! Pages carry only the data their loaders produce; styling and client-side
//! behavior are not part of this crate.

use std::fmt::Write;

use crate::routes::layout::LayoutData;
use crate::supabase::User;

/// Escape text for use in HTML element content and quoted attributes.
#[must_use]
pub fn escape(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}

fn shell(layout: &LayoutData, title: &str, body: &str) -> String {
    let mut header = String::new();
    match layout.user.as_ref() {
        Some(user) => {
            let email = escape(user.email.as_deref().unwrap_or_default());
            let _ = write!(
                header,
                r#"<span class="user">{email}</span><form method="post" action="/logout"><button type="submit">Sign out</button></form>"#
            );
        }
        None => header.push_str(r#"<a href="/login">Sign in</a>"#),
    }

    format!(
        "<!DOCTYPE html>\n<html lang=\"en\">\n<head><meta charset=\"utf-8\"><title>{title}</title></head>\n<body>\n<header>{header}</header>\n<main>\n{body}\n</main>\n</body>\n</html>\n",
        title = escape(title),
    )
}

/// Login page, optionally showing a form error and the email previously
/// submitted.
#[must_use]
pub fn login_page(layout: &LayoutData, error: Option<&str>, email: Option<&str>) -> String {
    let mut body = String::from("<h1>Sign in</h1>\n");
    if let Some(error) = error {
        let _ = writeln!(body, r#"<p class="error" role="alert">{}</p>"#, escape(error));
    }
    let _ = write!(
        body,
        r#"<form method="post" action="/login">
<label>Email <input type="email" name="email" value="{}" required></label>
<label>Password <input type="password" name="password" required></label>
<button type="submit">Sign in</button>
</form>"#,
        escape(email.unwrap_or_default()),
    );
    shell(layout, "Sign in", &body)
}

#[must_use]
pub fn dashboard_page(layout: &LayoutData, user: &User) -> String {
    let email = escape(user.email.as_deref().unwrap_or_default());
    let body = format!("<h1>Dashboard</h1>\n<p>Signed in as {email}</p>");
    shell(layout, "Dashboard", &body)
}

#[cfg(test)]
#[path = "render_test.rs"]
mod tests;
