//! Identity capability: "who is the current authenticated actor, if any".
//!
//! Passed explicitly into the mapper and the commit coordinator instead of
//! an ambient global lookup.

pub trait Identity {
    fn current_user(&self) -> Option<String>;
}

/// A fixed identity. Useful in tests and non-interactive flows.
#[derive(Debug, Clone)]
pub struct StaticIdentity(pub String);

impl Identity for StaticIdentity {
    fn current_user(&self) -> Option<String> {
        Some(self.0.clone())
    }
}

/// No authenticated actor.
#[derive(Debug, Clone, Copy, Default)]
pub struct Anonymous;

impl Identity for Anonymous {
    fn current_user(&self) -> Option<String> {
        None
    }
}
