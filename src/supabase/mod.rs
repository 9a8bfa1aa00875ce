//! Supabase auth integration.
//!
//! DESIGN
//! ======
//! `types::AuthApi` is the seam to the external provider; `gotrue` implements
//! it over HTTP. `client::AuthClient` binds that API to one request's
//! cookies, and `cookies` owns the cookie contract and the session format.

pub mod client;
pub mod cookies;
pub mod gotrue;
pub mod types;

pub use client::{AuthClient, create_server_client};
pub use cookies::{CookieStore, RequestCookies};
pub use types::{AuthApi, AuthError, Session, User};
