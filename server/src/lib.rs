//! Pinggate Server
//!
//! Issues opaque login sessions and serves a slow, authenticated ping that is
//! bounded globally and per user through counters in a shared Redis store.

pub mod api;
pub mod auth;
pub mod config;
pub mod kv;
pub mod ping;
pub mod ratelimit;
