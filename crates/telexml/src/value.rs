//! Runtime values understood by the converter.
//!
//! A [`Value`] is either a scalar (`Integer`, `Float`, `Text`, `None`), a
//! *complex* value (`Sequence`, `Mapping`, `Object`) or an [`Opaque`] marker
//! for anything the converter does not know how to expand.
//!
//! Complex values are cheap shared handles. Cloning one clones the handle, not
//! the contents, so the same list can appear several times in a graph or even
//! contain itself. Every complex value carries an [`Identity`] assigned when it
//! is constructed; two lists with equal contents still have distinct
//! identities, and every clone of one list shares the same identity.
//!
//! Structured values do not rely on runtime reflection. A type that wants to
//! be exported implements [`Introspect`] and describes its members explicitly;
//! [`Record`] is a ready-made implementation for building objects by hand.

use std::cell::RefCell;
use std::cmp::Ordering;
use std::fmt;
use std::rc::Rc;
use std::sync::atomic::{self, AtomicU64};

use crate::error::InvokeError;

static NEXT_IDENTITY: AtomicU64 = AtomicU64::new(1);

/// Runtime identity of a complex value.
///
/// Identities are process-unique and never reused.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Identity(u64);

impl Identity {
    /// Allocates a new identity.
    pub fn fresh() -> Self {
        Identity(NEXT_IDENTITY.fetch_add(1, atomic::Ordering::Relaxed))
    }

    /// Returns the raw identity number.
    pub fn as_u64(&self) -> u64 {
        self.0
    }
}

/// A value of the exported object graph.
#[derive(Debug, Clone)]
pub enum Value {
    /// Signed integer scalar.
    Integer(i64),
    /// Floating point scalar.
    Float(f64),
    /// Text scalar.
    Text(String),
    /// Explicit absence of a value.
    None,
    /// Ordered sequence (list-like or tuple-like).
    Sequence(Sequence),
    /// Key/value mapping with unique keys.
    Mapping(Mapping),
    /// Structured value exposing named members.
    Object(Object),
    /// Anything that is not expanded (callables, foreign handles).
    Opaque(Opaque),
}

impl Value {
    /// Returns the identity of a complex value, `None` for scalars.
    pub fn identity(&self) -> Option<Identity> {
        match self {
            Value::Sequence(sequence) => Some(sequence.identity()),
            Value::Mapping(mapping) => Some(mapping.identity()),
            Value::Object(object) => Some(object.identity()),
            _ => None,
        }
    }

    /// Name of the value's concrete type, as used for element tags.
    pub fn type_name(&self) -> &str {
        match self {
            Value::Integer(_) => "int",
            Value::Float(_) => "float",
            Value::Text(_) => "str",
            Value::None => "None",
            Value::Sequence(sequence) => sequence.kind().tag(),
            Value::Mapping(_) => "dict",
            Value::Object(object) => object.type_name(),
            Value::Opaque(opaque) => opaque.kind(),
        }
    }

    /// Returns the text if this is a `Text` value.
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    /// Returns the integer if this is an `Integer` value.
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            Value::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Steps into a named attribute of this value.
    ///
    /// Only objects have attributes. A method member resolves to an
    /// [`Opaque`] of kind `method`.
    pub fn attribute(&self, name: &str) -> Result<Value, InvokeError> {
        match self {
            Value::Object(object) => object.attribute(name),
            other => Err(InvokeError::AttributeNotFound {
                owner: other.type_name().to_string(),
                name: name.to_string(),
            }),
        }
    }

    /// Compares two values under their natural ordering.
    ///
    /// Numbers compare numerically (integers and floats interleave), text
    /// compares lexicographically and complex values compare by identity,
    /// i.e. by creation order. Values of unrelated kinds fall back to a fixed
    /// rank: `None < numbers < text < sequences < mappings < objects < opaque`.
    pub fn natural_cmp(&self, other: &Value) -> Ordering {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a.cmp(b),
            (Value::Integer(a), Value::Float(b)) => (*a as f64).total_cmp(b),
            (Value::Float(a), Value::Integer(b)) => a.total_cmp(&(*b as f64)),
            (Value::Float(a), Value::Float(b)) => a.total_cmp(b),
            (Value::Text(a), Value::Text(b)) => a.cmp(b),
            (Value::Opaque(a), Value::Opaque(b)) => a.kind().cmp(b.kind()),
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) if self.rank() == other.rank() => a.cmp(&b),
                _ => self.rank().cmp(&other.rank()),
            },
        }
    }

    fn rank(&self) -> u8 {
        match self {
            Value::None => 0,
            Value::Integer(_) | Value::Float(_) => 1,
            Value::Text(_) => 2,
            Value::Sequence(_) => 3,
            Value::Mapping(_) => 4,
            Value::Object(_) => 5,
            Value::Opaque(_) => 6,
        }
    }
}

/// Scalars compare by value, complex values by identity.
impl PartialEq for Value {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Value::Integer(a), Value::Integer(b)) => a == b,
            (Value::Float(a), Value::Float(b)) => a == b,
            (Value::Text(a), Value::Text(b)) => a == b,
            (Value::None, Value::None) => true,
            (Value::Opaque(a), Value::Opaque(b)) => a == b,
            _ => match (self.identity(), other.identity()) {
                (Some(a), Some(b)) => a == b,
                _ => false,
            },
        }
    }
}

impl From<i64> for Value {
    fn from(value: i64) -> Self {
        Value::Integer(value)
    }
}

impl From<i32> for Value {
    fn from(value: i32) -> Self {
        Value::Integer(i64::from(value))
    }
}

impl From<f64> for Value {
    fn from(value: f64) -> Self {
        Value::Float(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<()> for Value {
    fn from(_: ()) -> Self {
        Value::None
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map(Into::into).unwrap_or(Value::None)
    }
}

impl From<Vec<Value>> for Value {
    fn from(items: Vec<Value>) -> Self {
        Value::Sequence(Sequence::list(items))
    }
}

impl From<Sequence> for Value {
    fn from(sequence: Sequence) -> Self {
        Value::Sequence(sequence)
    }
}

impl From<Mapping> for Value {
    fn from(mapping: Mapping) -> Self {
        Value::Mapping(mapping)
    }
}

impl From<Object> for Value {
    fn from(object: Object) -> Self {
        Value::Object(object)
    }
}

impl From<Record> for Value {
    fn from(record: Record) -> Self {
        Value::Object(Object::new(record))
    }
}

impl From<Opaque> for Value {
    fn from(opaque: Opaque) -> Self {
        Value::Opaque(opaque)
    }
}

/// Distinguishes growable lists from fixed tuples.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SequenceKind {
    /// List-like sequence.
    List,
    /// Tuple-like sequence.
    Tuple,
}

impl SequenceKind {
    /// Element tag used for sequences of this kind.
    pub fn tag(&self) -> &'static str {
        match self {
            SequenceKind::List => "list",
            SequenceKind::Tuple => "tuple",
        }
    }
}

/// Shared handle to an ordered sequence of values.
#[derive(Clone)]
pub struct Sequence {
    identity: Identity,
    kind: SequenceKind,
    items: Rc<RefCell<Vec<Value>>>,
}

impl Sequence {
    /// Creates a sequence of the given kind.
    pub fn new<I>(kind: SequenceKind, items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self {
            identity: Identity::fresh(),
            kind,
            items: Rc::new(RefCell::new(items.into_iter().collect())),
        }
    }

    /// Creates a list.
    pub fn list<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::new(SequenceKind::List, items)
    }

    /// Creates a tuple.
    pub fn tuple<I>(items: I) -> Self
    where
        I: IntoIterator<Item = Value>,
    {
        Self::new(SequenceKind::Tuple, items)
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn kind(&self) -> SequenceKind {
        self.kind
    }

    /// Appends a value. Tuples accept this too so that self-referencing
    /// tuples can be built after construction.
    pub fn push(&self, value: impl Into<Value>) {
        self.items.borrow_mut().push(value.into());
    }

    /// Returns the element at `index`.
    pub fn get(&self, index: usize) -> Option<Value> {
        self.items.borrow().get(index).cloned()
    }

    pub fn len(&self) -> usize {
        self.items.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.borrow().is_empty()
    }

    /// Snapshot of the elements in order.
    pub fn items(&self) -> Vec<Value> {
        self.items.borrow().clone()
    }
}

// Contents are omitted: a sequence may contain itself.
impl fmt::Debug for Sequence {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Sequence")
            .field("identity", &self.identity)
            .field("kind", &self.kind)
            .field("len", &self.items.try_borrow().map(|items| items.len()).ok())
            .finish()
    }
}

/// Shared handle to a key/value mapping.
///
/// Keys are unique under [`Value::natural_cmp`] equality. Insertion order is
/// kept, but conversion always emits entries sorted by key.
#[derive(Clone)]
pub struct Mapping {
    identity: Identity,
    entries: Rc<RefCell<Vec<(Value, Value)>>>,
}

impl Default for Mapping {
    fn default() -> Self {
        Self::new()
    }
}

impl Mapping {
    /// Creates an empty mapping.
    pub fn new() -> Self {
        Self {
            identity: Identity::fresh(),
            entries: Rc::new(RefCell::new(Vec::new())),
        }
    }

    /// Creates a mapping from key/value pairs. Later duplicates win.
    pub fn from_entries<I, K, V>(entries: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<Value>,
        V: Into<Value>,
    {
        let mapping = Self::new();
        for (key, value) in entries {
            mapping.insert(key, value);
        }
        mapping
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    /// Inserts an entry, returning the value previously stored under an
    /// equal key.
    pub fn insert(&self, key: impl Into<Value>, value: impl Into<Value>) -> Option<Value> {
        let key = key.into();
        let value = value.into();
        let mut entries = self.entries.borrow_mut();
        match entries
            .iter_mut()
            .find(|(existing, _)| existing.natural_cmp(&key) == Ordering::Equal)
        {
            Some((_, slot)) => Some(std::mem::replace(slot, value)),
            None => {
                entries.push((key, value));
                None
            }
        }
    }

    /// Looks up the value stored under `key`.
    pub fn get(&self, key: &Value) -> Option<Value> {
        self.entries
            .borrow()
            .iter()
            .find(|(existing, _)| existing.natural_cmp(key) == Ordering::Equal)
            .map(|(_, value)| value.clone())
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Snapshot of the entries in insertion order.
    pub fn entries(&self) -> Vec<(Value, Value)> {
        self.entries.borrow().clone()
    }

    /// Snapshot of the entries sorted by key.
    pub fn sorted_entries(&self) -> Vec<(Value, Value)> {
        let mut entries = self.entries();
        entries.sort_by(|(a, _), (b, _)| a.natural_cmp(b));
        entries
    }
}

impl fmt::Debug for Mapping {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Mapping")
            .field("identity", &self.identity)
            .field("len", &self.entries.try_borrow().map(|e| e.len()).ok())
            .finish()
    }
}

/// Capability of describing a structured value's members.
///
/// Implementors list every member; the converter itself decides what to
/// emit (public fields only, sorted by name).
pub trait Introspect {
    /// Concrete type name, used as the element tag.
    fn type_name(&self) -> &str;

    /// All members of the value.
    fn members(&self) -> Vec<Member>;
}

/// Visibility of a member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Visibility {
    Public,
    Private,
}

/// What a member holds.
#[derive(Debug, Clone)]
pub enum MemberKind {
    /// A data field and its current value.
    Field(Value),
    /// An invocable member. Never expanded.
    Method,
}

/// A named member of a structured value.
#[derive(Debug, Clone)]
pub struct Member {
    name: String,
    visibility: Visibility,
    kind: MemberKind,
}

impl Member {
    /// Public data field.
    pub fn field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            kind: MemberKind::Field(value.into()),
        }
    }

    /// Private data field.
    pub fn private_field(name: impl Into<String>, value: impl Into<Value>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Private,
            kind: MemberKind::Field(value.into()),
        }
    }

    /// Public method.
    pub fn method(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            visibility: Visibility::Public,
            kind: MemberKind::Method,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn visibility(&self) -> Visibility {
        self.visibility
    }

    pub fn kind(&self) -> &MemberKind {
        &self.kind
    }

    /// True for public data fields, the only members the converter emits.
    pub fn is_exposed(&self) -> bool {
        self.visibility == Visibility::Public && matches!(self.kind, MemberKind::Field(_))
    }

    /// The value this member resolves to when accessed as an attribute.
    pub fn to_value(&self) -> Value {
        match &self.kind {
            MemberKind::Field(value) => value.clone(),
            MemberKind::Method => Value::Opaque(Opaque::new("method")),
        }
    }
}

/// Shared handle to a structured value.
#[derive(Clone)]
pub struct Object {
    identity: Identity,
    body: Rc<dyn Introspect>,
}

impl Object {
    /// Wraps a describable value.
    pub fn new<T: Introspect + 'static>(body: T) -> Self {
        Self::from_shared(Rc::new(body))
    }

    /// Wraps an already shared describable value, so the caller can keep a
    /// handle to it (e.g. to close a cycle after construction).
    pub fn from_shared(body: Rc<dyn Introspect>) -> Self {
        Self {
            identity: Identity::fresh(),
            body,
        }
    }

    pub fn identity(&self) -> Identity {
        self.identity
    }

    pub fn type_name(&self) -> &str {
        self.body.type_name()
    }

    pub fn members(&self) -> Vec<Member> {
        self.body.members()
    }

    /// Public data fields sorted by name.
    pub fn exposed_fields(&self) -> Vec<(String, Value)> {
        let mut fields: Vec<(String, Value)> = self
            .members()
            .into_iter()
            .filter(Member::is_exposed)
            .map(|member| {
                let value = member.to_value();
                (member.name, value)
            })
            .collect();
        fields.sort_by(|(a, _), (b, _)| a.cmp(b));
        fields
    }

    /// Resolves a member by name, regardless of its visibility.
    pub fn attribute(&self, name: &str) -> Result<Value, InvokeError> {
        self.members()
            .into_iter()
            .find(|member| member.name() == name)
            .map(|member| member.to_value())
            .ok_or_else(|| InvokeError::AttributeNotFound {
                owner: self.type_name().to_string(),
                name: name.to_string(),
            })
    }
}

impl fmt::Debug for Object {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Object")
            .field("identity", &self.identity)
            .field("type_name", &self.type_name())
            .finish()
    }
}

/// A hand-built structured value.
///
/// Members can be replaced after construction, which is how cyclic object
/// graphs are closed:
///
/// ```
/// use std::rc::Rc;
/// use telexml::{Object, Record, Value};
///
/// let node = Rc::new(Record::new("Node").with_field("label", "a"));
/// let object = Object::from_shared(node.clone());
/// node.set_field("next", Value::Object(object.clone()));
/// ```
#[derive(Debug)]
pub struct Record {
    type_name: String,
    members: RefCell<Vec<Member>>,
}

impl Record {
    pub fn new(type_name: impl Into<String>) -> Self {
        Self {
            type_name: type_name.into(),
            members: RefCell::new(Vec::new()),
        }
    }

    /// Adds a public field.
    pub fn with_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_member(Member::field(name, value));
        self
    }

    /// Adds a private field.
    pub fn with_private_field(self, name: impl Into<String>, value: impl Into<Value>) -> Self {
        self.set_member(Member::private_field(name, value));
        self
    }

    /// Adds a method.
    pub fn with_method(self, name: impl Into<String>) -> Self {
        self.set_member(Member::method(name));
        self
    }

    /// Sets a public field, replacing any member of the same name.
    pub fn set_field(&self, name: impl Into<String>, value: impl Into<Value>) {
        self.set_member(Member::field(name, value));
    }

    fn set_member(&self, member: Member) {
        let mut members = self.members.borrow_mut();
        match members.iter_mut().find(|m| m.name == member.name) {
            Some(existing) => *existing = member,
            None => members.push(member),
        }
    }

    /// Wraps the record into an object value.
    pub fn into_object(self) -> Object {
        Object::new(self)
    }
}

impl Introspect for Record {
    fn type_name(&self) -> &str {
        &self.type_name
    }

    fn members(&self) -> Vec<Member> {
        self.members.borrow().clone()
    }
}

/// Marker for values the converter does not expand.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Opaque {
    kind: String,
}

impl Opaque {
    pub fn new(kind: impl Into<String>) -> Self {
        Self { kind: kind.into() }
    }

    /// What the opaque value stands for (`function`, `method`, ...).
    pub fn kind(&self) -> &str {
        &self.kind
    }
}
