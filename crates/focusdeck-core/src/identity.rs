//! Session/identity seam.
//!
//! Authentication itself lives outside this crate; the engine only asks
//! "who owns this session right now". Absence of an owner is a hard
//! precondition failure for task creation and mutation.

pub trait IdentityProvider: Send + Sync {
    /// The current owner id, if a session is resolvable.
    fn current_owner(&self) -> Option<String>;
}

/// Fixed identity, resolved once (e.g. from configuration).
#[derive(Debug, Clone)]
pub struct StaticIdentity(Option<String>);

impl StaticIdentity {
    pub fn new(owner_id: impl Into<String>) -> Self {
        Self(Some(owner_id.into()))
    }

    /// No resolvable owner; every mutation will fail authorization.
    pub fn anonymous() -> Self {
        Self(None)
    }
}

impl IdentityProvider for StaticIdentity {
    fn current_owner(&self) -> Option<String> {
        self.0.clone()
    }
}
