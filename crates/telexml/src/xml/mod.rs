//! XML document model and rendering.
//!
//! Conversion produces an in-memory [`Element`] tree; a [`Document`] wraps the
//! root element and renders it, declaration first, through quick-xml.
//!
//! ## Element Shapes
//!
//! | Value | Element |
//! |-------|---------|
//! | `42` | `<int value="42"/>` |
//! | `1.5` | `<float value="1.5"/>` |
//! | `"hi"` | `<str value="hi"/>` |
//! | absent | `<None/>` |
//! | `[1, 2]` | `<list id="1"><int value="1"/><int value="2"/></list>` |
//! | `{"a": 1}` | `<dict id="1"><key><str value="a"/></key><value><int value="1"/></value></dict>` |
//! | `Point { x: 1 }` | `<Point id="1"><x><int value="1"/></x></Point>` |
//! | unrecognized | `<none/>` |
//!
//! Attribute values are escaped by the writer, with newlines, carriage
//! returns and tabs written as character references so they survive parsing.
//! Tag names are written as given; type and field names must therefore be
//! valid XML names. Characters that XML 1.0 forbids outright (most C0
//! controls, such as `\u{1}`) are not representable and are written
//! unchanged, which yields a document parsers reject.

pub mod element;
pub mod ser;

pub use element::{Document, Element};
pub use ser::{to_xml_string, to_xml_vec, to_xml_writer};

/// XML version written in every document declaration.
pub const XML_VERSION: &str = "1.0";
