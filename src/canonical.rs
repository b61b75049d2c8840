//! Canonicalization of parsed documents.
//!
//! Canonicalization runs in two fixed stages:
//!
//! 1. **Structural reorder.** Bottom-up, the element children of every element
//!    are stably sorted by `(local name, value of the "name" attribute or "")`.
//!    Non-element children keep their positions; the sorted elements are put
//!    back into the element slots. Siblings that share a local name and have no
//!    `name` attribute keep their input order.
//! 2. **Content canonicalization.** Adjacent text is merged, whitespace-only
//!    text is dropped unless `xml:space="preserve"` is in effect, attributes
//!    are sorted by `(namespace URI, local name)`, namespace declarations are
//!    sorted by prefix and declarations already in scope with the same binding
//!    are removed.
//!
//! The XML declaration and the DTD never make it into the tree, so they are
//! dropped as well. Comments and processing instructions are kept; deciding
//! whether they matter is up to the diff engine.
//!
//! The result does not depend on any [`DiffOptions`](crate::options::DiffOptions)
//! flag, and canonicalizing a canonical document again is a no-op.
//!
//! # Examples
//!
//! ```
//! use xmldiff_rs::canonical::canonicalize;
//! use xmldiff_rs::parser::parse_str;
//!
//! let a = canonicalize(parse_str(r#"<s><e name="b"/><e name="a"/></s>"#, false).unwrap());
//! let b = canonicalize(parse_str(r#"<s>
//!     <e name="a"/>
//!     <e name="b"/>
//! </s>"#, false).unwrap());
//!
//! assert_eq!(a, b);
//! assert_eq!(a.to_xml(), r#"<s><e name="a"></e><e name="b"></e></s>"#);
//! ```

use crate::parser::XML_NAMESPACE;
use crate::tree::{Attribute, Document, Element, NamespaceDecl, Node};
use std::cmp::Ordering;

/// A document in canonical form. Only [`canonicalize`] creates one.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CanonicalDocument(Document);

impl CanonicalDocument {
    pub fn document(&self) -> &Document {
        &self.0
    }

    pub fn into_document(self) -> Document {
        self.0
    }

    /// Serializes in canonical XML form: no declaration, no DTD, empty
    /// elements written as start/end tag pairs, canonical escaping.
    pub fn to_xml(&self) -> String {
        let mut out = String::new();
        let separator = if self.0.fragment { "" } else { "\n" };
        for (i, node) in self.0.children.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            write_node(node, &mut out);
        }
        out
    }
}

/// Canonicalizes a parsed document.
pub fn canonicalize(document: Document) -> CanonicalDocument {
    let mut document = document;

    // Stage 1: structural reorder.
    reorder_children(&mut document.children);

    // Stage 2: content canonicalization.
    let mut scope: Vec<NamespaceDecl> = Vec::new();
    normalize_children(&mut document.children, false, &mut scope);

    CanonicalDocument(document)
}

fn reorder_children(children: &mut [Node]) {
    for child in children.iter_mut() {
        if let Node::Element(element) = child {
            reorder_children(&mut element.children);
        }
    }

    let slots: Vec<usize> = children
        .iter()
        .enumerate()
        .filter(|(_, node)| matches!(node, Node::Element(_)))
        .map(|(i, _)| i)
        .collect();
    if slots.len() < 2 {
        return;
    }

    let mut elements: Vec<Node> = slots
        .iter()
        .map(|&i| std::mem::replace(&mut children[i], Node::Text(String::new())))
        .collect();
    elements.sort_by(compare_sort_keys);

    for (slot, element) in slots.into_iter().zip(elements) {
        children[slot] = element;
    }
}

fn compare_sort_keys(a: &Node, b: &Node) -> Ordering {
    sort_key(a).cmp(&sort_key(b))
}

fn sort_key(node: &Node) -> (&str, &str) {
    match node {
        Node::Element(e) => (e.name.local.as_str(), e.attribute("name").unwrap_or("")),
        _ => ("", ""),
    }
}

fn normalize_children(children: &mut Vec<Node>, preserve_space: bool, scope: &mut Vec<NamespaceDecl>) {
    merge_adjacent_text(children);
    if !preserve_space {
        children.retain(|node| !matches!(node, Node::Text(t) if is_xml_whitespace(t)));
    }

    for child in children.iter_mut() {
        if let Node::Element(element) = child {
            normalize_element(element, preserve_space, scope);
        }
    }
}

fn normalize_element(element: &mut Element, inherited_preserve: bool, scope: &mut Vec<NamespaceDecl>) {
    let preserve_space = match xml_space(element) {
        Some("preserve") => true,
        Some("default") => false,
        _ => inherited_preserve,
    };

    element
        .namespaces
        .retain(|decl| in_scope_uri(scope, decl.prefix.as_deref()) != Some(decl.uri.as_str()));
    element.namespaces.sort_by(|a, b| a.prefix.cmp(&b.prefix));

    element.attributes.sort_by(compare_attributes);

    let depth = scope.len();
    scope.extend(element.namespaces.iter().cloned());
    normalize_children(&mut element.children, preserve_space, scope);
    scope.truncate(depth);
}

fn compare_attributes(a: &Attribute, b: &Attribute) -> Ordering {
    let ns_a = a.name.namespace.as_deref().unwrap_or("");
    let ns_b = b.name.namespace.as_deref().unwrap_or("");
    ns_a.cmp(ns_b).then_with(|| a.name.local.cmp(&b.name.local))
}

fn xml_space(element: &Element) -> Option<&str> {
    element
        .attributes
        .iter()
        .find(|a| a.name.namespace.as_deref() == Some(XML_NAMESPACE) && a.name.local == "space")
        .map(|a| a.value.as_str())
}

fn in_scope_uri<'a>(scope: &'a [NamespaceDecl], prefix: Option<&str>) -> Option<&'a str> {
    scope
        .iter()
        .rev()
        .find(|decl| decl.prefix.as_deref() == prefix)
        .map(|decl| decl.uri.as_str())
}

fn merge_adjacent_text(children: &mut Vec<Node>) {
    let mut merged: Vec<Node> = Vec::with_capacity(children.len());
    for node in children.drain(..) {
        match (merged.last_mut(), node) {
            (Some(Node::Text(prev)), Node::Text(next)) => prev.push_str(&next),
            (_, node) => merged.push(node),
        }
    }
    *children = merged;
}

/// XML whitespace is exactly space, tab, CR and LF.
fn is_xml_whitespace(text: &str) -> bool {
    text.chars().all(|c| matches!(c, ' ' | '\t' | '\r' | '\n'))
}

fn write_node(node: &Node, out: &mut String) {
    match node {
        Node::Element(element) => write_element(element, out),
        Node::Text(text) => escape_text(text, out),
        Node::Comment(text) => {
            out.push_str("<!--");
            out.push_str(text);
            out.push_str("-->");
        }
        Node::ProcessingInstruction { target, data } => {
            out.push_str("<?");
            out.push_str(target);
            if let Some(data) = data {
                out.push(' ');
                out.push_str(data);
            }
            out.push_str("?>");
        }
    }
}

fn write_element(element: &Element, out: &mut String) {
    let name = element.name.qualified();
    out.push('<');
    out.push_str(&name);

    for decl in &element.namespaces {
        match &decl.prefix {
            Some(prefix) => {
                out.push_str(" xmlns:");
                out.push_str(prefix);
            }
            None => out.push_str(" xmlns"),
        }
        out.push_str("=\"");
        escape_attribute(&decl.uri, out);
        out.push('"');
    }

    for attr in &element.attributes {
        out.push(' ');
        out.push_str(&attr.name.qualified());
        out.push_str("=\"");
        escape_attribute(&attr.value, out);
        out.push('"');
    }
    out.push('>');

    for child in &element.children {
        write_node(child, out);
    }

    out.push_str("</");
    out.push_str(&name);
    out.push('>');
}

fn escape_text(text: &str, out: &mut String) {
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}

fn escape_attribute(value: &str, out: &mut String) {
    for c in value.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '"' => out.push_str("&quot;"),
            '\t' => out.push_str("&#x9;"),
            '\n' => out.push_str("&#xA;"),
            '\r' => out.push_str("&#xD;"),
            c => out.push(c),
        }
    }
}
