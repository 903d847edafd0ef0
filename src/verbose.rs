use std::sync::atomic::{AtomicBool, Ordering};
use std::time::Instant;

static VERBOSE: AtomicBool = AtomicBool::new(false);

pub fn set(enabled: bool) {
    VERBOSE.store(enabled, Ordering::Relaxed);
}

pub fn enabled() -> bool {
    VERBOSE.load(Ordering::Relaxed)
}

/// Seconds elapsed since `t`, for the timing lines behind -v.
pub fn secs(t: Instant) -> f64 {
    t.elapsed().as_secs_f64()
}

// No #[macro_export]; this macro is made visible crate-wide by
// `#[macro_use] mod verbose;` in main.rs.
macro_rules! vprintln {
    ($($arg:tt)*) => {{
        if crate::verbose::enabled() {
            eprintln!($($arg)*);
        }
    }}
}
