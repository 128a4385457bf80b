//! Rate limiting constants.

/// Shared counter of /ping requests currently in flight.
pub const GATE_KEY: &str = "gate:ping";

/// Prefix of the per-user window counters (`rl:ping:<username>`).
pub const USER_WINDOW_KEY_PREFIX: &str = "rl:ping";

/// Response message for both gate and window refusals.
pub const TOO_MANY_REQUESTS_MESSAGE: &str = "too many requests";
