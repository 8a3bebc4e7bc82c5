//! Platform abstraction layer
//!
//! The only thing the core needs from the host is a wall-clock timestamp
//! for the session summary.

/// Milliseconds since the Unix epoch (browser clock on web)
#[cfg(target_arch = "wasm32")]
pub fn now_unix_ms() -> f64 {
    js_sys::Date::now()
}

/// Milliseconds since the Unix epoch, or 0 if the clock is before it
#[cfg(not(target_arch = "wasm32"))]
pub fn now_unix_ms() -> f64 {
    use std::time::{SystemTime, UNIX_EPOCH};

    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs_f64() * 1000.0)
        .unwrap_or(0.0)
}

#[cfg(all(test, not(target_arch = "wasm32")))]
mod tests {
    use super::*;

    #[test]
    fn test_now_is_after_2020() {
        assert!(now_unix_ms() > 1_577_836_800_000.0);
    }
}
