//! Identity registry.
//!
//! The registry hands out a token for every complex value it sees and keeps a
//! reference to that value, so the value can be exported again later by token
//! alone. Tokens are decimal strings issued in increasing order starting at
//! `"1"`. Registering the same value (same [`Identity`]) again returns the
//! token it already has.
//!
//! Entries are never evicted: the registry lives as long as the session that
//! owns it and grows with every distinct complex value exported.

use std::collections::HashMap;
use std::fmt;

use tracing::trace;

use crate::value::{Identity, Value};

/// Opaque, stable identifier of a registered value.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct IdentityToken(String);

impl IdentityToken {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for IdentityToken {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<IdentityToken> for String {
    fn from(token: IdentityToken) -> Self {
        token.0
    }
}

/// Maps value identities to tokens and tokens back to values.
#[derive(Debug)]
pub struct IdentityRegistry {
    entries: HashMap<Identity, (IdentityToken, Value)>,
    by_token: HashMap<String, Identity>,
    next_id: u64,
}

impl Default for IdentityRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl IdentityRegistry {
    /// Creates an empty registry. The first token issued is `"1"`.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
            by_token: HashMap::new(),
            next_id: 1,
        }
    }

    /// Registers a complex value and returns its token.
    ///
    /// Returns `None` for scalars, which have no identity.
    pub fn register(&mut self, value: &Value) -> Option<IdentityToken> {
        value
            .identity()
            .map(|identity| self.issue(identity, value))
    }

    /// Returns the token of `identity`, issuing one if needed.
    pub(crate) fn issue(&mut self, identity: Identity, value: &Value) -> IdentityToken {
        if let Some((token, _)) = self.entries.get(&identity) {
            return token.clone();
        }

        let token = IdentityToken(self.next_id.to_string());
        self.next_id += 1;
        trace!(token = %token, identity = identity.as_u64(), kind = value.type_name(), "Issued identity token");

        self.by_token.insert(token.0.clone(), identity);
        self.entries.insert(identity, (token.clone(), value.clone()));
        token
    }

    /// Returns the token already issued for `value`, without registering it.
    pub fn token_of(&self, value: &Value) -> Option<&IdentityToken> {
        value
            .identity()
            .and_then(|identity| self.entries.get(&identity))
            .map(|(token, _)| token)
    }

    /// Returns the value registered under `token`.
    pub fn resolve(&self, token: &str) -> Option<Value> {
        self.by_token
            .get(token)
            .and_then(|identity| self.entries.get(identity))
            .map(|(_, value)| value.clone())
    }

    /// Number of registered values.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::{Mapping, Record, Sequence};

    #[test]
    fn test_tokens_start_at_one_and_increase() {
        let mut registry = IdentityRegistry::new();
        let a = Value::from(Sequence::list(vec![]));
        let b = Value::from(Mapping::new());
        assert_eq!(registry.register(&a).unwrap().as_str(), "1");
        assert_eq!(registry.register(&b).unwrap().as_str(), "2");
        assert_eq!(registry.len(), 2);
    }

    #[test]
    fn test_register_is_idempotent() {
        let mut registry = IdentityRegistry::new();
        let value = Value::from(Record::new("Point").with_field("x", 1));
        let first = registry.register(&value);
        let second = registry.register(&value.clone());
        assert_eq!(first, second);
        assert_eq!(registry.len(), 1);
    }

    #[test]
    fn test_equal_content_gets_distinct_tokens() {
        let mut registry = IdentityRegistry::new();
        let a = Value::from(vec![Value::Integer(1), Value::Integer(2)]);
        let b = Value::from(vec![Value::Integer(1), Value::Integer(2)]);
        assert_ne!(registry.register(&a), registry.register(&b));
    }

    #[test]
    fn test_scalars_are_not_registered() {
        let mut registry = IdentityRegistry::new();
        assert!(registry.register(&Value::Integer(42)).is_none());
        assert!(registry.register(&Value::None).is_none());
        assert!(registry.is_empty());
    }

    #[test]
    fn test_resolve_returns_registered_value() {
        let mut registry = IdentityRegistry::new();
        let value = Value::from(Mapping::from_entries([("a", 1)]));
        let token = registry.register(&value).unwrap();
        assert_eq!(registry.resolve(token.as_str()), Some(value.clone()));
        assert_eq!(registry.token_of(&value), Some(&token));
    }

    #[test]
    fn test_resolve_unknown_token() {
        let mut registry = IdentityRegistry::new();
        registry.register(&Value::from(Sequence::tuple(vec![])));
        assert!(registry.resolve("2").is_none());
        assert!(registry.resolve("").is_none());
        assert!(registry.resolve("abc").is_none());
    }
}
