//! Logging utilities
//!
//! The library only talks to the `log` facade. Binaries call [`init`] once
//! to route records through `env_logger` (filtered by `RUST_LOG`).

pub use log::{debug, info, warn, error, trace};

/// Initialize the logging system
pub fn init() {
    env_logger::init();
}

/// Initialize the logging system with a default filter when `RUST_LOG` is unset
pub fn init_with_default(filter: &str) {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(filter)).init();
}
