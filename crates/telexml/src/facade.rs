//! The exporter session.
//!
//! An [`Exporter`] owns one [`IdentityRegistry`] for its whole lifetime and
//! offers three operations, each producing a complete [`Document`]:
//!
//! | Operation | On success | On failure |
//! |-----------|------------|------------|
//! | [`invoke`](Exporter::invoke) | converted return value | `raise` document |
//! | [`read_attribute`](Exporter::read_attribute) | converted attribute | the fault converted as a plain value |
//! | [`lookup_by_id`](Exporter::lookup_by_id) | converted registered value | `None` |
//!
//! `invoke` and `read_attribute` intentionally differ in how failures look:
//! only `invoke` produces a `raise` root. Callers tell success from failure
//! by inspecting the root tag.
//!
//! Every operation starts a fresh conversion (and with it a fresh cycle
//! guard); ids issued by earlier operations stay valid for the lifetime of
//! the exporter.
//!
//! The exporter is single-threaded. Sharing one between sessions requires
//! external synchronisation around every call.

use std::collections::BTreeMap;

use tracing::{debug, warn};

use crate::convert::Converter;
use crate::decode::{ArgumentDecoder, JsonDecoder};
use crate::error::InvokeError;
use crate::fault::{self, Fault};
use crate::options::ExportOptions;
use crate::registry::IdentityRegistry;
use crate::target::{Args, Target, resolve_path};
use crate::value::Value;
use crate::xml::Document;

/// Exports values of a [`Target`] as XML documents.
///
/// # Example
///
/// ```
/// use telexml::{Args, Exporter, Module, Value};
///
/// let module = Module::new("demo")
///     .with_function("double", |args: &Args| Ok(Value::Integer(args.integer(0)? * 2)));
/// let mut exporter = Exporter::new(module);
///
/// let xml = exporter.invoke("double", &["21"], &[]).to_xml_string().unwrap();
/// assert_eq!(xml, r#"<?xml version="1.0"?><int value="42"/>"#);
/// ```
#[derive(Debug)]
pub struct Exporter<T, D = JsonDecoder> {
    target: T,
    decoder: D,
    registry: IdentityRegistry,
    options: ExportOptions,
}

impl<T: Target> Exporter<T> {
    /// Creates an exporter decoding arguments as JSON.
    pub fn new(target: T) -> Self {
        Self::with_decoder(target, JsonDecoder)
    }
}

impl<T: Target, D: ArgumentDecoder> Exporter<T, D> {
    /// Creates an exporter with a custom argument decoder.
    pub fn with_decoder(target: T, decoder: D) -> Self {
        Self {
            target,
            decoder,
            registry: IdentityRegistry::new(),
            options: ExportOptions::default(),
        }
    }

    /// Replaces the export options.
    pub fn with_options(mut self, options: ExportOptions) -> Self {
        self.options = options;
        self
    }

    pub fn options(&self) -> &ExportOptions {
        &self.options
    }

    pub fn target(&self) -> &T {
        &self.target
    }

    pub fn registry(&self) -> &IdentityRegistry {
        &self.registry
    }

    /// Invokes `name` on the target with JSON (or decoder-specific) argument
    /// payloads and exports the result.
    ///
    /// Resolution, decoding and invocation failures all produce a `raise`
    /// document; this never fails.
    pub fn invoke(&mut self, name: &str, args: &[&str], kwargs: &[(&str, &str)]) -> Document {
        debug!(
            target_name = self.target.name(),
            member = name,
            positional = args.len(),
            named = kwargs.len(),
            "Invoking member"
        );

        match self.call(name, args, kwargs) {
            Ok(result) => self.convert(&result),
            Err(err) => {
                let fault = Fault::from(err);
                warn!(
                    member = name,
                    exception = fault.type_name(),
                    "Invocation failed, exporting raise document"
                );
                self.raise(&fault)
            }
        }
    }

    /// Resolves a dotted attribute path on the target and exports it.
    ///
    /// A failing path is exported as the fault value itself, not as a
    /// `raise` document.
    pub fn read_attribute(&mut self, path: &str) -> Document {
        debug!(target_name = self.target.name(), path, "Reading attribute");

        let value = resolve_path(&self.target, path).unwrap_or_else(|err| {
            debug!(path, error = %err, "Attribute resolution failed");
            Fault::from(err).to_value()
        });
        self.convert(&value)
    }

    /// Exports the value registered under `token`, or `None` if this
    /// exporter never issued that token.
    pub fn lookup_by_id(&mut self, token: &str) -> Option<Document> {
        debug!(token, "Looking up registered value");

        match self.registry.resolve(token) {
            Some(value) => Some(self.convert(&value)),
            None => {
                debug!(token, "No value registered under token");
                None
            }
        }
    }

    /// Exports an arbitrary value within this session.
    pub fn convert(&mut self, value: &Value) -> Document {
        let root = Converter::with_options(&mut self.registry, &self.options).convert(value);
        Document::new(root).with_indent(self.options.indent)
    }

    /// Exports `fault` as a `raise` document within this session.
    pub fn raise(&mut self, fault: &Fault) -> Document {
        let mut converter = Converter::with_options(&mut self.registry, &self.options);
        let root = fault::adapt(&mut converter, fault);
        Document::new(root).with_indent(self.options.indent)
    }

    /// Resolves, decodes and invokes. Resolution is checked before any
    /// argument is decoded; positional arguments decode before named ones.
    fn call(&self, name: &str, args: &[&str], kwargs: &[(&str, &str)]) -> Result<Value, InvokeError> {
        let callable = self.target.callable(name)?;

        let positional = args
            .iter()
            .map(|payload| self.decoder.decode(payload))
            .collect::<Result<Vec<_>, _>>()?;

        let sorted: BTreeMap<&str, &str> = kwargs.iter().copied().collect();
        let mut named = BTreeMap::new();
        for (key, payload) in sorted {
            named.insert(key.to_string(), self.decoder.decode(payload)?);
        }

        Ok(callable.call(&Args::new(positional, named))?)
    }
}
