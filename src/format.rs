//! Human-readable re-rendering of existing sequence documents.
//!
//! Input must be a complete, well-formed document; it is parsed with
//! `roxmltree`, converted into a [`markup::Element`] tree, and written back
//! with indentation. Tag names, attribute values, and element order are kept.
//! Comments, processing instructions, and whitespace between elements are not.

use crate::error::AppResult;
use crate::markup::{self, Element, Node};
use tracing::{debug, trace};

/// Indent width used by [`format`].
pub const DEFAULT_INDENT: usize = 2;

/// Indenting formatter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Formatter {
    indent: usize,
}

impl Default for Formatter {
    fn default() -> Self {
        Self::new(DEFAULT_INDENT)
    }
}

impl Formatter {
    /// Formatter indenting by `indent` spaces per level.
    pub fn new(indent: usize) -> Self {
        Self { indent }
    }

    /// Spaces per nesting level.
    pub fn indent(&self) -> usize {
        self.indent
    }

    /// Parse `text` and render it indented.
    ///
    /// # Errors
    /// Returns [`crate::SequenceError::Parse`] when `text` is not well-formed.
    pub fn format(&self, text: &str) -> AppResult<String> {
        let root = parse(text)?;
        let pretty = markup::render_pretty(&root, self.indent);
        debug!(
            input_bytes = text.len(),
            output_bytes = pretty.len(),
            "formatted document"
        );
        Ok(pretty)
    }
}

/// Format with the default two-space indent.
pub fn format(text: &str) -> AppResult<String> {
    Formatter::default().format(text)
}

/// Parse a document into a markup tree.
pub fn parse(text: &str) -> AppResult<Element> {
    let document = roxmltree::Document::parse(text)?;
    Ok(convert(document.root_element()))
}

fn qualified(node: roxmltree::Node<'_, '_>, namespace: Option<&str>, local: &str) -> String {
    match namespace.and_then(|uri| node.lookup_prefix(uri)) {
        Some(prefix) if !prefix.is_empty() => format!("{}:{}", prefix, local),
        _ => local.to_string(),
    }
}

/// Namespace declarations written on `node` itself, as attributes.
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<(String, String)> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| match ns.name() {
            Some(prefix) => (format!("xmlns:{}", prefix), ns.uri().to_string()),
            None => ("xmlns".to_string(), ns.uri().to_string()),
        })
        .collect()
}

fn convert(node: roxmltree::Node<'_, '_>) -> Element {
    let tag = node.tag_name();
    let mut element = Element::new(qualified(node, tag.namespace(), tag.name()));
    element.attributes = declared_namespaces(node);
    element.attributes.extend(node.attributes().map(|attr| {
        (
            qualified(node, attr.namespace(), attr.name()),
            attr.value().to_string(),
        )
    }));

    let has_element_children = node.children().any(|child| child.is_element());
    for child in node.children() {
        if child.is_element() {
            element.children.push(Node::Element(convert(child)));
        } else if child.is_text() {
            let text = child.text().unwrap_or_default();
            // Indentation between elements; text-only content is kept verbatim
            if has_element_children && text.trim().is_empty() {
                continue;
            }
            if !text.is_empty() {
                element.children.push(Node::Text(text.to_string()));
            }
        } else {
            trace!(element = %element.name, "dropping non-element node");
        }
    }
    element
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::SequenceError;

    #[test]
    fn test_format_indents() {
        let input = "<?xml version=\"1.0\"?><A x=\"1\"><B>text</B><C /></A>";
        assert_eq!(
            format(input).unwrap(),
            "<?xml version=\"1.0\"?>\n<A x=\"1\">\n  <B>text</B>\n  <C />\n</A>\n"
        );
    }

    #[test]
    fn test_format_keeps_namespace_prefixes() {
        let input = "<Sequence xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" Version=\"3\">\
<Value xsi:type=\"xsd:int\">500</Value></Sequence>";
        let output = format(input).unwrap();
        assert!(output.contains(
            "<Sequence xmlns:xsd=\"http://www.w3.org/2001/XMLSchema\" \
xmlns:xsi=\"http://www.w3.org/2001/XMLSchema-instance\" Version=\"3\">"
        ));
        assert!(output.contains("\n  <Value xsi:type=\"xsd:int\">500</Value>\n"));
    }

    #[test]
    fn test_format_preserves_escaped_content() {
        let input = "<A name=\"a&amp;b &quot;q&quot;\">x &lt; y</A>";
        assert_eq!(
            format(input).unwrap(),
            "<?xml version=\"1.0\"?>\n<A name=\"a&amp;b &quot;q&quot;\">x &lt; y</A>\n"
        );
    }

    #[test]
    fn test_format_is_idempotent() {
        let input = "<A>\n\n<B>  spaced  </B><C><D/></C>tail</A>";
        let once = format(input).unwrap();
        assert_eq!(format(&once).unwrap(), once);
    }

    #[test]
    fn test_format_custom_indent() {
        let formatter = Formatter::new(4);
        assert_eq!(
            formatter.format("<A><B/></A>").unwrap(),
            "<?xml version=\"1.0\"?>\n<A>\n    <B />\n</A>\n"
        );
    }

    #[test]
    fn test_format_rejects_malformed() {
        assert!(matches!(format("<A><B></A>"), Err(SequenceError::Parse(_))));
        assert!(matches!(format(""), Err(SequenceError::Parse(_))));
        assert!(matches!(
            format("<Sequence><Devices>"),
            Err(SequenceError::Parse(_))
        ));
    }
}
