//! Logging utilities and structured logging support

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
///
/// Honours `RUST_LOG`; falls back to `info` when it is unset.
pub fn init() {
    init_with_level("info");
}

/// Initialize the logging system with a default filter such as `"debug"`
/// or `"room_physics=trace"`. `RUST_LOG` still takes precedence.
pub fn init_with_level(default_filter: &str) {
    let env = env_logger::Env::default().default_filter_or(default_filter);
    // A second initialisation (e.g. from several tests) is not an error worth surfacing
    let _ = env_logger::Builder::from_env(env).try_init();
}
