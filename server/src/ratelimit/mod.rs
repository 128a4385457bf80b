//! Admission control for the ping endpoint.
//!
//! Two checks share one Redis-compatible store so every instance sees the
//! same state: a global gate bounding requests in flight, and a per-user
//! fixed window bounding admissions over time.

pub mod config;
pub mod constants;
pub mod error;
pub mod gate;
pub mod limiter;
pub mod types;

pub use config::*;
pub use constants::*;
pub use error::*;
pub use gate::{ConcurrencyGate, GatePermit};
pub use limiter::*;
pub use types::*;
