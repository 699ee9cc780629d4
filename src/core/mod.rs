//! # Core Module
//!
//! Configuration, error taxonomy, logging and the identity boundary shared by
//! every feature.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

pub mod config;
pub mod error;
pub mod identity;
pub mod logging;

// Re-export commonly used items
pub use config::Config;
pub use error::{AdherenceError, Result};
pub use identity::{resolve_uid, IdentityProvider, SessionIdentity};
pub use logging::init_logging;
