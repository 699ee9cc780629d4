//! Logger initialisation
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

/// Install the global `env_logger`, honouring `RUST_LOG` when set and falling
/// back to `default_level` otherwise. Safe to call more than once.
pub fn init_logging(default_level: &str) {
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default_level))
        .format_timestamp_millis()
        .try_init();
}
