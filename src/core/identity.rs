//! # Identity Boundary
//!
//! The authentication provider is an external collaborator. The engine only
//! asks it "who is signed in right now" at the start of each operation and
//! never holds on to the answer.
//!
//! - **Version**: 1.0.0
//! - **Since**: 0.1.0

use crate::core::error::{AdherenceError, Result};
use std::sync::{PoisonError, RwLock};

/// Supplies the currently active user identifier, if any
pub trait IdentityProvider: Send + Sync {
    fn current_uid(&self) -> Option<String>;
}

/// Resolve the active uid or fail with `Unauthenticated`.
///
/// Blank identifiers are treated as "no user".
pub fn resolve_uid(identity: &dyn IdentityProvider) -> Result<String> {
    match identity.current_uid() {
        Some(uid) if !uid.trim().is_empty() => Ok(uid),
        _ => Err(AdherenceError::Unauthenticated),
    }
}

/// Mutable sign-in state for a single app session
#[derive(Debug, Default)]
pub struct SessionIdentity {
    uid: RwLock<Option<String>>,
}

impl SessionIdentity {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn signed_in(uid: &str) -> Self {
        Self {
            uid: RwLock::new(Some(uid.to_string())),
        }
    }

    // Poisoning is ignored: the slot is replaced whole on every write.
    pub fn sign_in(&self, uid: &str) {
        *self.uid.write().unwrap_or_else(PoisonError::into_inner) = Some(uid.to_string());
    }

    pub fn sign_out(&self) {
        *self.uid.write().unwrap_or_else(PoisonError::into_inner) = None;
    }
}

impl IdentityProvider for SessionIdentity {
    fn current_uid(&self) -> Option<String> {
        self.uid
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}
