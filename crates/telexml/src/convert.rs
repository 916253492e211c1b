//! Recursive value-to-element conversion.
//!
//! A [`Converter`] performs one top-level conversion. It borrows the session's
//! [`IdentityRegistry`] to stamp every complex value with its token and owns a
//! fresh [`CycleGuard`], so a value shared several times (or reachable from
//! itself) has its children expanded once; later occurrences are rendered as
//! the bare tag with its `id`.
//!
//! Since every complex value is expanded at most once per conversion and the
//! graph has finitely many complex values, conversion always terminates. The
//! optional depth bound additionally keeps recursion off the end of the stack
//! for very deep (acyclic) graphs.

use tracing::debug;

use crate::guard::CycleGuard;
use crate::options::ExportOptions;
use crate::registry::{IdentityRegistry, IdentityToken};
use crate::value::{Identity, Value};
use crate::xml::Element;

/// Converts values into element trees for a single conversion pass.
pub struct Converter<'r> {
    registry: &'r mut IdentityRegistry,
    guard: CycleGuard,
    max_depth: Option<usize>,
    depth: usize,
}

impl<'r> Converter<'r> {
    /// Creates a converter with default options.
    pub fn new(registry: &'r mut IdentityRegistry) -> Self {
        Self::with_options(registry, &ExportOptions::default())
    }

    pub fn with_options(registry: &'r mut IdentityRegistry, options: &ExportOptions) -> Self {
        Self {
            registry,
            guard: CycleGuard::new(),
            max_depth: options.max_depth,
            depth: 0,
        }
    }

    /// Converts `value` into an element.
    pub fn convert(&mut self, value: &Value) -> Element {
        match value {
            Value::Integer(i) => Element::new("int").with_attribute("value", i.to_string()),
            Value::Float(f) => Element::new("float").with_attribute("value", format_float(*f)),
            Value::Text(text) => Element::new("str").with_attribute("value", text.as_str()),
            Value::Sequence(sequence) => {
                let mut element = self.stamped(sequence.kind().tag(), sequence.identity(), value);
                if self.enter(sequence.identity()) {
                    for item in sequence.items() {
                        element.push(self.convert(&item));
                    }
                    self.leave();
                }
                element
            }
            Value::Mapping(mapping) => {
                let mut element = self.stamped("dict", mapping.identity(), value);
                if self.enter(mapping.identity()) {
                    for (key, entry) in mapping.sorted_entries() {
                        element.push(Element::new("key").with_child(self.convert(&key)));
                        element.push(Element::new("value").with_child(self.convert(&entry)));
                    }
                    self.leave();
                }
                element
            }
            Value::Object(object) => {
                let mut element = self.stamped(object.type_name(), object.identity(), value);
                if self.enter(object.identity()) {
                    for (name, field) in object.exposed_fields() {
                        element.push(Element::new(name).with_child(self.convert(&field)));
                    }
                    self.leave();
                }
                element
            }
            Value::None => Element::new("None"),
            Value::Opaque(_) => Element::new("none"),
        }
    }

    /// Registers `value` and returns its token.
    pub(crate) fn token(&mut self, identity: Identity, value: &Value) -> IdentityToken {
        self.registry.issue(identity, value)
    }

    fn stamped(&mut self, tag: &str, identity: Identity, value: &Value) -> Element {
        let token = self.token(identity, value);
        Element::new(tag).with_attribute("id", token)
    }

    /// Decides whether the children of `identity` are expanded here.
    fn enter(&mut self, identity: Identity) -> bool {
        if self.guard.visited(identity) {
            return false;
        }
        if let Some(max_depth) = self.max_depth {
            if self.depth >= max_depth {
                debug!(
                    identity = identity.as_u64(),
                    max_depth, "Depth bound reached, children not expanded"
                );
                return false;
            }
        }
        self.guard.mark(identity);
        self.depth += 1;
        true
    }

    fn leave(&mut self) {
        self.depth -= 1;
    }
}

/// Textual form of a float: shortest round-trip representation that always
/// shows a fractional part or an exponent (`1.0`, `1e100`, `NaN`, `inf`).
pub fn format_float(value: f64) -> String {
    format!("{:?}", value)
}
