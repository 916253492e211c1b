//! In-memory element tree.

use std::io::Write;

use crate::error::Result;

/// A tagged node with attributes and ordered children.
///
/// Attributes behave as a set keyed by name; they keep insertion order only
/// so that rendering is stable.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Element {
    tag: String,
    attributes: Vec<(String, String)>,
    children: Vec<Element>,
}

impl Element {
    pub fn new(tag: impl Into<String>) -> Self {
        Self {
            tag: tag.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Builder form of [`Element::set_attribute`].
    pub fn with_attribute(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.set_attribute(name, value);
        self
    }

    /// Builder form of [`Element::push`].
    pub fn with_child(mut self, child: Element) -> Self {
        self.push(child);
        self
    }

    /// Sets an attribute, replacing any previous value of the same name.
    pub fn set_attribute(&mut self, name: impl Into<String>, value: impl Into<String>) {
        let name = name.into();
        let value = value.into();
        match self.attributes.iter_mut().find(|(n, _)| *n == name) {
            Some((_, existing)) => *existing = value,
            None => self.attributes.push((name, value)),
        }
    }

    /// Appends a child element.
    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    pub fn tag(&self) -> &str {
        &self.tag
    }

    /// Returns the value of the named attribute.
    pub fn attribute(&self, name: &str) -> Option<&str> {
        self.attributes
            .iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v.as_str())
    }

    /// Iterates over `(name, value)` attribute pairs.
    pub fn attributes(&self) -> impl Iterator<Item = (&str, &str)> {
        self.attributes
            .iter()
            .map(|(n, v)| (n.as_str(), v.as_str()))
    }

    pub fn children(&self) -> &[Element] {
        &self.children
    }
}

/// A complete document: declaration plus one root element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    root: Element,
    indent: Option<usize>,
}

impl Document {
    /// Creates a compact document.
    pub fn new(root: Element) -> Self {
        Self { root, indent: None }
    }

    /// Renders with `indent` spaces per nesting level; `None` or `0` keeps
    /// the output compact.
    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }

    pub fn root(&self) -> &Element {
        &self.root
    }

    pub fn into_root(self) -> Element {
        self.root
    }

    pub fn indent(&self) -> Option<usize> {
        self.indent
    }

    /// Renders the document to a string.
    pub fn to_xml_string(&self) -> Result<String> {
        super::ser::to_xml_string(self)
    }

    /// Renders the document to a writer.
    pub fn write_to<W: Write>(&self, writer: W) -> Result<()> {
        super::ser::to_xml_writer(self, writer)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_attribute_replaces() {
        let mut element = Element::new("int").with_attribute("value", "1");
        element.set_attribute("value", "2");
        assert_eq!(element.attribute("value"), Some("2"));
        assert_eq!(element.attributes().count(), 1);
    }

    #[test]
    fn test_children_keep_order() {
        let element = Element::new("list")
            .with_child(Element::new("a"))
            .with_child(Element::new("b"));
        let tags: Vec<&str> = element.children().iter().map(Element::tag).collect();
        assert_eq!(tags, vec!["a", "b"]);
    }

    #[test]
    fn test_missing_attribute() {
        assert!(Element::new("None").attribute("value").is_none());
    }
}
