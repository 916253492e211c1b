//! Export options.

/// Default bound on how deeply complex values are expanded.
pub const DEFAULT_MAX_DEPTH: usize = 256;

/// Options shared by every conversion of an exporter.
///
/// # Example
///
/// ```
/// use telexml::ExportOptions;
///
/// let options = ExportOptions::default()
///     .with_max_depth(Some(16))
///     .with_indent(Some(2));
/// assert_eq!(options.max_depth, Some(16));
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportOptions {
    /// Maximum number of nested complex values expanded in one conversion.
    ///
    /// A complex value reached at the bound is still registered and tagged
    /// with its `id`, but rendered without children. `None` removes the
    /// bound; deep graphs may then exhaust the stack.
    pub max_depth: Option<usize>,

    /// Spaces per nesting level when rendering; `None` renders compactly.
    pub indent: Option<usize>,
}

impl Default for ExportOptions {
    fn default() -> Self {
        Self {
            max_depth: Some(DEFAULT_MAX_DEPTH),
            indent: None,
        }
    }
}

impl ExportOptions {
    /// Options without a depth bound.
    pub fn unbounded() -> Self {
        Self {
            max_depth: None,
            ..Default::default()
        }
    }

    pub fn with_max_depth(mut self, max_depth: Option<usize>) -> Self {
        self.max_depth = max_depth;
        self
    }

    pub fn with_indent(mut self, indent: Option<usize>) -> Self {
        self.indent = indent;
        self
    }
}
