//! Server-rendered task tracker backed by a Supabase auth provider.
//!
//! Each request passes through [`hook::hydrate_session`], which resolves the
//! visitor's session from cookies before any route runs. Routes only ever
//! read the resulting [`context::RequestContext`].

pub mod config;
pub mod context;
pub mod hook;
pub mod models;
pub mod render;
pub mod routes;
pub mod state;
pub mod supabase;
