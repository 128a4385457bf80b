//! Rate limiting types.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;

/// How the gate claims a slot in the shared counter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum GateMode {
    /// Increment first, then back out if the new value is over capacity.
    /// Never admits more than the capacity.
    Atomic,
    /// Read, compare, then increment. Concurrent acquirers can overshoot
    /// the capacity by up to contenders - 1.
    CheckThenIncr,
}

impl GateMode {
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Atomic => "atomic",
            Self::CheckThenIncr => "check_then_incr",
        }
    }
}

impl fmt::Display for GateMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Unknown gate mode name.
#[derive(Debug, thiserror::Error)]
#[error("unknown gate mode {0:?} (expected \"atomic\" or \"check_then_incr\")")]
pub struct ParseGateModeError(String);

impl FromStr for GateMode {
    type Err = ParseGateModeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "atomic" => Ok(Self::Atomic),
            "check_then_incr" | "check-then-incr" => Ok(Self::CheckThenIncr),
            other => Err(ParseGateModeError(other.to_string())),
        }
    }
}

/// Result of a per-user window check.
#[derive(Debug, Clone)]
pub struct RateLimitResult {
    /// Whether the request is allowed
    pub allowed: bool,
    /// Maximum requests allowed in the window
    pub limit: u32,
    /// Admissions counted in the current window, including this one if allowed
    pub count: i64,
    /// Remaining admissions in the current window
    pub remaining: u32,
}
