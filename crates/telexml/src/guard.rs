//! Cycle guard for a single conversion.
//!
//! A guard remembers which complex values already had their children
//! expanded during one top-level conversion. It is created empty for every
//! conversion and dropped with it; nothing carries over between calls.

use std::collections::HashSet;

use crate::value::Identity;

/// Set of identities expanded during the current conversion.
#[derive(Debug, Default)]
pub struct CycleGuard {
    visited: HashSet<Identity>,
}

impl CycleGuard {
    pub fn new() -> Self {
        Self::default()
    }

    /// True if `identity` was already expanded in this conversion.
    pub fn visited(&self, identity: Identity) -> bool {
        self.visited.contains(&identity)
    }

    /// Marks `identity` as expanded. Returns false if it already was.
    pub fn mark(&mut self, identity: Identity) -> bool {
        self.visited.insert(identity)
    }

    pub fn len(&self) -> usize {
        self.visited.len()
    }

    pub fn is_empty(&self) -> bool {
        self.visited.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mark_and_visited() {
        let mut guard = CycleGuard::new();
        let identity = Identity::fresh();
        assert!(!guard.visited(identity));
        assert!(guard.mark(identity));
        assert!(guard.visited(identity));
        assert!(!guard.mark(identity));
        assert_eq!(guard.len(), 1);
    }

    #[test]
    fn test_fresh_guard_is_empty() {
        let guard = CycleGuard::new();
        assert!(guard.is_empty());
        assert!(!guard.visited(Identity::fresh()));
    }
}
