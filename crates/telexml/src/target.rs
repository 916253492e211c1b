//! Targets: what the exporter introspects.
//!
//! A [`Target`] resolves names to attribute values and to [`Callable`]s.
//! [`Module`] is a table-backed implementation for registering values and
//! native functions by name; hosts with their own object model implement the
//! trait directly.

use std::collections::BTreeMap;
use std::fmt;

use crate::error::InvokeError;
use crate::fault::Fault;
use crate::value::{Opaque, Value};

/// Decoded arguments of one invocation.
#[derive(Debug, Clone, Default)]
pub struct Args {
    positional: Vec<Value>,
    named: BTreeMap<String, Value>,
}

impl Args {
    pub fn new(positional: Vec<Value>, named: BTreeMap<String, Value>) -> Self {
        Self { positional, named }
    }

    /// Positional arguments only.
    pub fn positional_only(positional: Vec<Value>) -> Self {
        Self {
            positional,
            named: BTreeMap::new(),
        }
    }

    /// Positional argument at `index`.
    pub fn get(&self, index: usize) -> Option<&Value> {
        self.positional.get(index)
    }

    /// Named argument `key`.
    pub fn named(&self, key: &str) -> Option<&Value> {
        self.named.get(key)
    }

    pub fn positional(&self) -> &[Value] {
        &self.positional
    }

    pub fn named_args(&self) -> &BTreeMap<String, Value> {
        &self.named
    }

    /// Total number of arguments.
    pub fn len(&self) -> usize {
        self.positional.len() + self.named.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Positional argument at `index`, failing with an `ArgumentError` fault
    /// when it is missing.
    pub fn require(&self, index: usize) -> Result<&Value, Fault> {
        self.get(index).ok_or_else(|| {
            Fault::new(
                "ArgumentError",
                format!("missing positional argument {}", index),
            )
        })
    }

    /// Positional integer argument at `index`.
    pub fn integer(&self, index: usize) -> Result<i64, Fault> {
        let value = self.require(index)?;
        value.as_integer().ok_or_else(|| {
            Fault::new(
                "ArgumentError",
                format!(
                    "argument {} must be an integer, got {}",
                    index,
                    value.type_name()
                ),
            )
        })
    }
}

/// Something that can be invoked with decoded arguments.
pub trait Callable {
    fn call(&self, args: &Args) -> Result<Value, Fault>;
}

impl<F> Callable for F
where
    F: Fn(&Args) -> Result<Value, Fault>,
{
    fn call(&self, args: &Args) -> Result<Value, Fault> {
        self(args)
    }
}

/// The object under introspection.
pub trait Target {
    /// Name used in resolution errors.
    fn name(&self) -> &str;

    /// Returns the value of a top-level attribute.
    fn attribute(&self, name: &str) -> Result<Value, InvokeError>;

    /// Returns the callable registered under `name`.
    fn callable(&self, name: &str) -> Result<&dyn Callable, InvokeError>;
}

/// Resolves a dot-separated path: the first segment on `target`, every
/// further segment on the value found so far.
pub fn resolve_path<T>(target: &T, path: &str) -> Result<Value, InvokeError>
where
    T: Target + ?Sized,
{
    let mut segments = path.split('.');
    let first = segments.next().unwrap_or_default();
    let mut current = target.attribute(first)?;
    for segment in segments {
        current = current.attribute(segment)?;
    }
    Ok(current)
}

enum Entry {
    Attribute(Value),
    Function(Box<dyn Callable>),
}

/// A named table of attributes and native functions.
///
/// # Example
///
/// ```
/// use telexml::{Args, Module, Value};
///
/// let module = Module::new("math")
///     .with_attribute("answer", 42)
///     .with_function("add", |args: &Args| {
///         Ok(Value::Integer(args.integer(0)? + args.integer(1)?))
///     });
/// ```
pub struct Module {
    name: String,
    entries: BTreeMap<String, Entry>,
}

impl Module {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            entries: BTreeMap::new(),
        }
    }

    /// Adds (or replaces) an attribute.
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Adds (or replaces) a function.
    pub fn with_function<F>(mut self, name: impl Into<String>, function: F) -> Self
    where
        F: Fn(&Args) -> Result<Value, Fault> + 'static,
    {
        self.entries
            .insert(name.into(), Entry::Function(Box::new(function)));
        self
    }

    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<Value>) {
        self.entries
            .insert(name.into(), Entry::Attribute(value.into()));
    }

    /// Registered names in sorted order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    fn not_found(&self, name: &str) -> InvokeError {
        InvokeError::AttributeNotFound {
            owner: self.name.clone(),
            name: name.to_string(),
        }
    }
}

impl fmt::Debug for Module {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Module")
            .field("name", &self.name)
            .field("entries", &self.entries.keys().collect::<Vec<_>>())
            .finish()
    }
}

impl Target for Module {
    fn name(&self) -> &str {
        &self.name
    }

    fn attribute(&self, name: &str) -> Result<Value, InvokeError> {
        match self.entries.get(name) {
            Some(Entry::Attribute(value)) => Ok(value.clone()),
            Some(Entry::Function(_)) => Ok(Value::Opaque(Opaque::new("function"))),
            None => Err(self.not_found(name)),
        }
    }

    fn callable(&self, name: &str) -> Result<&dyn Callable, InvokeError> {
        match self.entries.get(name) {
            Some(Entry::Function(function)) => Ok(function.as_ref()),
            Some(Entry::Attribute(_)) => Err(InvokeError::NotCallable {
                name: name.to_string(),
            }),
            None => Err(self.not_found(name)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::Record;

    fn module() -> Module {
        Module::new("demo")
            .with_attribute("answer", 42)
            .with_attribute(
                "settings",
                Record::new("Settings")
                    .with_field("owner", Record::new("Owner").with_field("name", "ada")),
            )
            .with_function("add", |args: &Args| {
                Ok(Value::Integer(args.integer(0)? + args.integer(1)?))
            })
    }

    #[test]
    fn test_attribute_lookup() {
        let module = module();
        assert_eq!(module.attribute("answer").unwrap(), Value::Integer(42));
        assert_eq!(
            module.attribute("add").unwrap(),
            Value::Opaque(Opaque::new("function"))
        );
        assert!(matches!(
            module.attribute("missing"),
            Err(InvokeError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_callable_lookup() {
        let module = module();
        let add = module.callable("add").unwrap();
        let args = Args::positional_only(vec![Value::Integer(2), Value::Integer(3)]);
        assert_eq!(add.call(&args).unwrap(), Value::Integer(5));

        assert!(matches!(
            module.callable("answer"),
            Err(InvokeError::NotCallable { .. })
        ));
        assert!(matches!(
            module.callable("nope"),
            Err(InvokeError::AttributeNotFound { .. })
        ));
    }

    #[test]
    fn test_resolve_dotted_path() {
        let module = module();
        let name = resolve_path(&module, "settings.owner.name").unwrap();
        assert_eq!(name, Value::from("ada"));
    }

    #[test]
    fn test_resolve_path_failure_names_the_failing_step() {
        let module = module();
        let err = resolve_path(&module, "settings.missing.name").unwrap_err();
        assert_eq!(err.to_string(), "'Settings' has no attribute 'missing'");

        let err = resolve_path(&module, "answer.real").unwrap_err();
        assert_eq!(err.to_string(), "'int' has no attribute 'real'");
    }

    #[test]
    fn test_args_helpers() {
        let mut named = BTreeMap::new();
        named.insert("k".to_string(), Value::from("v"));
        let args = Args::new(vec![Value::from("x")], named);
        assert_eq!(args.len(), 2);
        assert_eq!(args.named("k"), Some(&Value::from("v")));

        let fault = args.integer(0).unwrap_err();
        assert_eq!(fault.type_name(), "ArgumentError");
        let fault = args.integer(5).unwrap_err();
        assert!(fault.to_string().contains("missing positional argument 5"));
    }
}
