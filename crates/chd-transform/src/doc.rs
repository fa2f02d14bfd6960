//! Typed XML node tree with a single-pass text renderer.
//!
//! The generated stylesheet carries XPath expressions in attribute
//! values, full of apostrophed string literals. A generic XML writer
//! escapes those to `&apos;` noise, so rendering is done here with
//! double-quoted attributes and apostrophes left alone. Carriage
//! returns and line feeds inside attribute values become character
//! references, which is how the stylesheet smuggles CRLF into its
//! error messages.

use std::fmt::Write;

const INDENT: &str = "    ";

#[derive(Debug, Clone)]
pub enum Node {
    Element(Element),
    Comment(String),
    Text(String),
}

#[derive(Debug, Clone)]
pub struct Element {
    name: String,
    attrs: Vec<(String, String)>,
    children: Vec<Node>,
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            attrs: Vec::new(),
            children: Vec::new(),
        }
    }

    pub fn attr(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((name.into(), value.into()));
        self
    }

    pub fn child(mut self, node: impl Into<Node>) -> Self {
        self.children.push(node.into());
        self
    }

    pub fn children(mut self, nodes: impl IntoIterator<Item = Node>) -> Self {
        self.children.extend(nodes);
        self
    }

    pub fn text(mut self, value: impl Into<String>) -> Self {
        self.children.push(Node::Text(value.into()));
        self
    }
}

impl From<Element> for Node {
    fn from(element: Element) -> Self {
        Node::Element(element)
    }
}

/// A complete document: XML declaration plus one root element.
pub fn render_document(root: &Element) -> String {
    let mut out = String::from("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n\n");
    render_element(root, 0, &mut out);
    out
}

fn render_node(node: &Node, depth: usize, out: &mut String) {
    match node {
        Node::Element(element) => render_element(element, depth, out),
        Node::Comment(text) => {
            push_indent(depth, out);
            let _ = write!(out, "<!--{text}-->");
            out.push('\n');
        }
        Node::Text(text) => {
            push_indent(depth, out);
            out.push_str(&escape_text(text));
            out.push('\n');
        }
    }
}

fn render_element(element: &Element, depth: usize, out: &mut String) {
    push_indent(depth, out);
    out.push('<');
    out.push_str(&element.name);
    for (name, value) in &element.attrs {
        let _ = write!(out, " {name}=\"{}\"", escape_attr(value));
    }
    if element.children.is_empty() {
        out.push_str(" />\n");
        return;
    }
    // An element holding a single text node stays on one line.
    if let [Node::Text(text)] = element.children.as_slice() {
        let _ = write!(out, ">{}</{}>", escape_text(text), element.name);
        out.push('\n');
        return;
    }
    out.push_str(">\n");
    for child in &element.children {
        render_node(child, depth + 1, out);
    }
    push_indent(depth, out);
    let _ = write!(out, "</{}>", element.name);
    out.push('\n');
}

fn push_indent(depth: usize, out: &mut String) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
}

fn escape_text(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            other => escaped.push(other),
        }
    }
    escaped
}

fn escape_attr(value: &str) -> String {
    let mut escaped = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\r' => escaped.push_str("&#13;"),
            '\n' => escaped.push_str("&#10;"),
            other => escaped.push(other),
        }
    }
    escaped
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn apostrophes_survive_attribute_rendering() {
        let root = Element::new("xsl:value-of").attr("select", "cell[@id = '3']");
        let text = render_document(&root);
        assert!(text.contains("select=\"cell[@id = '3']\""));
        assert!(!text.contains("&apos;"));
    }

    #[test]
    fn crlf_in_attributes_becomes_character_references() {
        let root = Element::new("xsl:value-of").attr("select", "'\r\n'");
        let text = render_document(&root);
        assert!(text.contains("select=\"'&#13;&#10;'\""));
    }

    #[test]
    fn nested_elements_indent_and_close() {
        let root = Element::new("a")
            .child(Element::new("b").attr("x", "1"))
            .child(Node::Comment("note".to_string()))
            .child(Element::new("c").text("v < w"));
        let text = render_document(&root);
        assert!(text.contains("<a>\n"));
        assert!(text.contains("    <b x=\"1\" />\n"));
        assert!(text.contains("    <!--note-->\n"));
        assert!(text.contains("    <c>v &lt; w</c>\n"));
        assert!(text.ends_with("</a>\n"));
    }
}
