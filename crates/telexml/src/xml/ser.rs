//! Rendering of documents through quick-xml.
//!
//! Elements without children are written as empty elements (`<int value="1"/>`),
//! everything else as start tag, children and end tag.
//!
//! Attribute values are escaped for `<>&'"` and additionally carry newlines,
//! carriage returns and tabs as character references, since a parser would
//! otherwise normalize them to spaces.

use std::borrow::Cow;
use std::io::Write;

use quick_xml::Writer;
use quick_xml::escape::escape;
use quick_xml::events::attributes::Attribute;
use quick_xml::events::{BytesDecl, BytesEnd, BytesStart, Event};
use quick_xml::name::QName;

use super::XML_VERSION;
use super::element::{Document, Element};
use crate::error::Result;

/// Render a document to an XML string.
///
/// # Examples
///
/// ```
/// use telexml::xml::{Document, Element, to_xml_string};
///
/// let document = Document::new(Element::new("int").with_attribute("value", "42"));
/// let xml = to_xml_string(&document).unwrap();
/// assert_eq!(xml, r#"<?xml version="1.0"?><int value="42"/>"#);
/// ```
pub fn to_xml_string(document: &Document) -> Result<String> {
    let buffer = to_xml_vec(document)?;
    Ok(String::from_utf8(buffer)?)
}

/// Render a document to an XML byte vector.
pub fn to_xml_vec(document: &Document) -> Result<Vec<u8>> {
    let mut buffer = Vec::new();
    to_xml_writer(document, &mut buffer)?;
    Ok(buffer)
}

/// Render a document to a writer.
pub fn to_xml_writer<W: Write>(document: &Document, writer: W) -> Result<()> {
    let mut writer = match document.indent() {
        Some(indent) if indent > 0 => Writer::new_with_indent(writer, b' ', indent),
        _ => Writer::new(writer),
    };

    writer.write_event(Event::Decl(BytesDecl::new(XML_VERSION, None, None)))?;
    write_element(&mut writer, document.root())?;
    Ok(())
}

fn write_element<W: Write>(writer: &mut Writer<W>, element: &Element) -> Result<()> {
    let mut start = BytesStart::new(element.tag());
    for (name, value) in element.attributes() {
        start.push_attribute(Attribute {
            key: QName(name.as_bytes()),
            value: Cow::Owned(escape_attribute(value).into_bytes()),
        });
    }

    if element.children().is_empty() {
        writer.write_event(Event::Empty(start))?;
        return Ok(());
    }

    writer.write_event(Event::Start(start))?;
    for child in element.children() {
        write_element(writer, child)?;
    }
    writer.write_event(Event::End(BytesEnd::new(element.tag())))?;

    Ok(())
}

fn escape_attribute(value: &str) -> String {
    let escaped = escape(value);
    let mut out = String::with_capacity(escaped.len());
    for c in escaped.chars() {
        match c {
            '\n' => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' => out.push_str("&#9;"),
            c => out.push(c),
        }
    }
    out
}
