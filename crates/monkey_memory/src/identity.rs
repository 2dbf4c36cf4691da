//! Current-user lookup used when a finished game is submitted.

use std::sync::{Arc, RwLock};

use tracing::{info, instrument};

/// Identifier of a signed-in user.
pub type UserId = i32;

/// Supplies the identity of the player, if anyone is signed in.
pub trait IdentityProvider: Send + Sync + std::fmt::Debug {
    /// Returns the signed-in user, or `None` for a guest.
    fn current_user_id(&self) -> Option<UserId>;
}

/// Identity provider for guest play: nobody is ever signed in.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl IdentityProvider for Anonymous {
    fn current_user_id(&self) -> Option<UserId> {
        None
    }
}

/// Identity shared between the front-end (which signs users in and out) and
/// the engine (which reads it when a game finishes).
#[derive(Debug, Clone, Default)]
pub struct SharedIdentity {
    current: Arc<RwLock<Option<UserId>>>,
}

impl SharedIdentity {
    /// Creates an identity with nobody signed in.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signs `user_id` in, replacing any previous user.
    #[instrument(skip(self))]
    pub fn sign_in(&self, user_id: UserId) {
        info!(user_id, "User signed in");
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(user_id);
    }

    /// Signs the current user out.
    #[instrument(skip(self))]
    pub fn sign_out(&self) {
        info!("User signed out");
        *self
            .current
            .write()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = None;
    }
}

impl IdentityProvider for SharedIdentity {
    fn current_user_id(&self) -> Option<UserId> {
        *self
            .current
            .read()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn clones_share_state() {
        let identity = SharedIdentity::new();
        let reader = identity.clone();
        assert_eq!(reader.current_user_id(), None);

        identity.sign_in(12);
        assert_eq!(reader.current_user_id(), Some(12));

        identity.sign_out();
        assert_eq!(reader.current_user_id(), None);
    }
}
