//! # telexml
//!
//! Exports values of a runtime object graph as self-describing XML documents.
//!
//! Given a value of unknown shape, the exporter renders scalars, sequences,
//! mappings and structured objects into a tagged element tree. Every complex
//! value receives a stable id, which can later be used to export the same
//! value again; shared and cyclic graphs always terminate.
//!
//! ## Architecture
//!
//! - **Values** ([`value`]): the value model, with explicit identities for
//!   complex values and the [`Introspect`] capability for structured ones.
//! - **Registry** ([`registry`]): session-wide mapping from identity to token.
//! - **Cycle guard** ([`guard`]): per-conversion set of expanded values.
//! - **Converter** ([`convert`]): recursive, type-dispatching conversion into
//!   an [`Element`] tree.
//! - **Faults** ([`fault`]): errors captured as values and their `raise`
//!   documents.
//! - **Exporter** ([`facade`]): `invoke`, `read_attribute` and
//!   `lookup_by_id` over a [`Target`], each yielding a full [`Document`].
//!
//! ## Example
//!
//! ```
//! use telexml::{Exporter, Module, Value};
//!
//! let module = Module::new("demo").with_attribute("pair", vec![Value::Integer(1), Value::Integer(2)]);
//! let mut exporter = Exporter::new(module);
//!
//! let xml = exporter.read_attribute("pair").to_xml_string().unwrap();
//! assert_eq!(
//!     xml,
//!     r#"<?xml version="1.0"?><list id="1"><int value="1"/><int value="2"/></list>"#
//! );
//!
//! // The id stays valid for the lifetime of the exporter.
//! let again = exporter.lookup_by_id("1").unwrap();
//! assert_eq!(again.root().tag(), "list");
//! assert!(exporter.lookup_by_id("2").is_none());
//! ```

pub mod convert;
pub mod decode;
pub mod error;
pub mod facade;
pub mod fault;
pub mod guard;
pub mod options;
pub mod registry;
pub mod target;
pub mod value;
pub mod xml;

pub use convert::Converter;
pub use decode::{ArgumentDecoder, JsonDecoder};
pub use error::{ExportError, InvokeError, Result};
pub use facade::Exporter;
pub use fault::Fault;
pub use guard::CycleGuard;
pub use options::{DEFAULT_MAX_DEPTH, ExportOptions};
pub use registry::{IdentityRegistry, IdentityToken};
pub use target::{Args, Callable, Module, Target, resolve_path};
pub use value::{
    Identity, Introspect, Mapping, Member, MemberKind, Object, Opaque, Record, Sequence,
    SequenceKind, Value, Visibility,
};
pub use xml::{Document, Element};
