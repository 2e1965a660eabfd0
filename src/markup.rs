//! Minimal markup tree with a single escaping layer and two writers.
//!
//! Every node the builders produce ends up here before it becomes text, so
//! caller-supplied strings are escaped exactly once, in one place. The same
//! tree is produced by the formatter when it parses existing text, which lets
//! both paths share the indented writer.
//!
//! # Rendering styles
//!
//! - **Compact**: no whitespace between tags; the form the sequencer itself writes.
//! - **Pretty**: one element per line, indented. Elements holding only text stay
//!   on one line, childless elements self-close, text inside mixed content is
//!   trimmed onto its own line.

use std::borrow::Cow;

/// Declaration emitted at the top of every document.
pub const XML_DECLARATION: &str = r#"<?xml version="1.0"?>"#;

/// A child of an [`Element`].
#[derive(Debug, Clone, PartialEq)]
pub enum Node {
    /// Nested element.
    Element(Element),
    /// Unescaped character data.
    Text(String),
}

/// Element with ordered attributes and children.
///
/// Attribute values and text are stored unescaped.
#[derive(Debug, Clone, PartialEq)]
pub struct Element {
    /// Tag name, including any namespace prefix.
    pub name: String,
    /// `(name, value)` pairs in output order.
    pub attributes: Vec<(String, String)>,
    /// Child nodes in document order.
    pub children: Vec<Node>,
}

impl Element {
    /// Empty element called `name`.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attributes: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Append an attribute.
    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attributes.push((name.into(), value.into()));
        self
    }

    /// Append an element child.
    pub fn child(mut self, child: Element) -> Self {
        self.children.push(Node::Element(child));
        self
    }

    /// Append element children in iteration order.
    pub fn children(mut self, children: impl IntoIterator<Item = Element>) -> Self {
        self.children
            .extend(children.into_iter().map(Node::Element));
        self
    }

    /// Append a text child. Empty strings add nothing.
    pub fn text(mut self, text: impl Into<String>) -> Self {
        let text = text.into();
        if !text.is_empty() {
            self.children.push(Node::Text(text));
        }
        self
    }

    /// Shorthand for `<name>text</name>`.
    pub fn with_text(name: impl Into<String>, text: impl Into<String>) -> Self {
        Self::new(name).text(text)
    }

    /// Iterate over element children, skipping text.
    pub fn elements(&self) -> impl Iterator<Item = &Element> {
        self.children.iter().filter_map(|node| match node {
            Node::Element(element) => Some(element),
            Node::Text(_) => None,
        })
    }

    /// Concatenated text of the direct text children.
    pub fn text_content(&self) -> String {
        self.children
            .iter()
            .filter_map(|node| match node {
                Node::Text(text) => Some(text.as_str()),
                Node::Element(_) => None,
            })
            .collect()
    }

    pub(crate) fn write_open_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        self.write_attributes(out);
        out.push('>');
    }

    pub(crate) fn write_close_tag(&self, out: &mut String) {
        out.push_str("</");
        out.push_str(&self.name);
        out.push('>');
    }

    fn write_attributes(&self, out: &mut String) {
        for (name, value) in &self.attributes {
            out.push(' ');
            out.push_str(name);
            out.push_str("=\"");
            out.push_str(&escape_attr(value));
            out.push('"');
        }
    }

    fn write_empty_tag(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        self.write_attributes(out);
        out.push_str(" />");
    }

    /// Append the compact rendering of this element.
    pub fn write_compact(&self, out: &mut String) {
        if self.children.is_empty() {
            self.write_empty_tag(out);
            return;
        }
        self.write_open_tag(out);
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_compact(out),
                Node::Text(text) => out.push_str(&escape_text(text)),
            }
        }
        self.write_close_tag(out);
    }

    /// Compact rendering as a new string.
    pub fn to_compact(&self) -> String {
        let mut out = String::new();
        self.write_compact(&mut out);
        out
    }

    /// Append the indented rendering of this element at `depth`.
    pub fn write_pretty(&self, out: &mut String, indent: usize, depth: usize) {
        let pad = " ".repeat(indent * depth);
        out.push_str(&pad);

        if self.children.is_empty() {
            self.write_empty_tag(out);
            out.push('\n');
            return;
        }

        if self.children.iter().all(|c| matches!(c, Node::Text(_))) {
            self.write_open_tag(out);
            out.push_str(&escape_text(&self.text_content()));
            self.write_close_tag(out);
            out.push('\n');
            return;
        }

        self.write_open_tag(out);
        out.push('\n');
        for child in &self.children {
            match child {
                Node::Element(element) => element.write_pretty(out, indent, depth + 1),
                Node::Text(text) => {
                    let trimmed = text.trim();
                    if !trimmed.is_empty() {
                        out.push_str(&" ".repeat(indent * (depth + 1)));
                        out.push_str(&escape_text(trimmed));
                        out.push('\n');
                    }
                }
            }
        }
        out.push_str(&pad);
        self.write_close_tag(out);
        out.push('\n');
    }
}

/// Render a whole document: declaration plus the indented root element.
pub fn render_pretty(root: &Element, indent: usize) -> String {
    let mut out = String::with_capacity(1024);
    out.push_str(XML_DECLARATION);
    out.push('\n');
    root.write_pretty(&mut out, indent, 0);
    out
}

/// Escape a string for use as element text.
pub fn escape_text(raw: &str) -> Cow<'_, str> {
    escape(raw, false)
}

/// Escape a string for use inside a double-quoted attribute value.
pub fn escape_attr(raw: &str) -> Cow<'_, str> {
    escape(raw, true)
}

fn needs_escape(c: char, attribute: bool) -> bool {
    match c {
        '&' | '<' | '>' | '\r' => true,
        '"' | '\'' | '\n' | '\t' => attribute,
        _ => !is_xml_char(c),
    }
}

fn escape(raw: &str, attribute: bool) -> Cow<'_, str> {
    if !raw.chars().any(|c| needs_escape(c, attribute)) {
        return Cow::Borrowed(raw);
    }

    let mut out = String::with_capacity(raw.len() + 16);
    for c in raw.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' if attribute => out.push_str("&quot;"),
            '\'' if attribute => out.push_str("&apos;"),
            '\n' if attribute => out.push_str("&#10;"),
            '\r' => out.push_str("&#13;"),
            '\t' if attribute => out.push_str("&#9;"),
            c if !is_xml_char(c) => {
                tracing::warn!(
                    code_point = c as u32,
                    "replacing character not permitted in XML 1.0"
                );
                out.push(char::REPLACEMENT_CHARACTER);
            }
            c => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// `Char` production of XML 1.0, minus the surrogate range Rust cannot hold.
fn is_xml_char(c: char) -> bool {
    matches!(c,
        '\u{9}' | '\u{A}' | '\u{D}'
        | '\u{20}'..='\u{D7FF}'
        | '\u{E000}'..='\u{FFFD}'
        | '\u{10000}'..='\u{10FFFF}')
}
