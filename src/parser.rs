//! XML parsing into the owned tree model.
//!
//! Parsing is done with `roxmltree`, which checks well-formedness, resolves
//! namespaces and entities and normalizes line endings. The borrowed DOM is then
//! copied into [`tree::Document`](crate::tree::Document) so the canonicalizer
//! can reorder it.
//!
//! Two input shapes are supported:
//!
//! - a whole document with a single document element (the default), and
//! - a fragment: any sequence of elements, text, comments and processing
//!   instructions without a common root.
//!
//! # Examples
//!
//! ```
//! use xmldiff_rs::parser::parse_str;
//!
//! let doc = parse_str(r#"<schema><element name="a"/></schema>"#, false).unwrap();
//! assert_eq!(doc.root().unwrap().name.local, "schema");
//!
//! let fragment = parse_str("<a/><b/>", true).unwrap();
//! assert_eq!(fragment.elements().count(), 2);
//! ```

use crate::error::ParseError;
use crate::tree::{Attribute, Document, Element, NamespaceDecl, Node, QName};
use std::fs;
use std::path::Path;

/// Namespace bound to the reserved `xml` prefix.
pub const XML_NAMESPACE: &str = "http://www.w3.org/XML/1998/namespace";

/// Synthetic element wrapped around fragment input so it parses as a document.
const FRAGMENT_WRAPPER: &str = "xmldiff-fragment";

/// Parses a file into a [`Document`].
///
/// Input must be UTF-8; a leading byte order mark is skipped. Files in other
/// encodings (UTF-16, ISO-8859-1, ...) are not transcoded and fail with
/// `ReadError`, whatever their XML declaration says.
///
/// # Errors
///
/// - `ParseError::FileNotFound` if the file does not exist
/// - `ParseError::ReadError` if it cannot be read as UTF-8
/// - `ParseError::XmlError` if it is not well-formed XML
pub fn parse_file(path: &Path, fragment: bool) -> Result<Document, ParseError> {
    if !path.exists() {
        return Err(ParseError::file_not_found(path));
    }

    let content = fs::read_to_string(path).map_err(|e| ParseError::read_error(path, e))?;

    parse_str(&content, fragment).map_err(|e| ParseError::xml_error(path, e))
}

/// Parses XML text into a [`Document`].
pub fn parse_str(content: &str, fragment: bool) -> Result<Document, roxmltree::Error> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);

    let mut options = roxmltree::ParsingOptions::default();
    options.allow_dtd = true;

    if fragment {
        let wrapped = format!(
            "<{0}>{1}</{0}>",
            FRAGMENT_WRAPPER,
            strip_xml_declaration(content)
        );
        let doc = roxmltree::Document::parse_with_options(&wrapped, options)?;
        let children = doc
            .root_element()
            .children()
            .filter_map(|n| convert_node(n, &wrapped))
            .collect();
        return Ok(Document {
            children,
            fragment: true,
        });
    }

    let doc = roxmltree::Document::parse_with_options(content, options)?;
    let children = doc
        .root()
        .children()
        .filter_map(|n| convert_node(n, content))
        .collect();

    Ok(Document {
        children,
        fragment: false,
    })
}

/// Removes a leading `<?xml ...?>` declaration, which is only legal at the very
/// start of a document and would break the fragment wrapper.
fn strip_xml_declaration(content: &str) -> &str {
    let trimmed = content.trim_start();
    if let Some(rest) = trimmed.strip_prefix("<?xml") {
        if rest.starts_with(|c: char| c.is_whitespace()) {
            if let Some(end) = rest.find("?>") {
                return &rest[end + 2..];
            }
        }
    }
    content
}

fn convert_node(node: roxmltree::Node<'_, '_>, source: &str) -> Option<Node> {
    match node.node_type() {
        roxmltree::NodeType::Element => Some(Node::Element(convert_element(node, source))),
        roxmltree::NodeType::Text => node.text().map(|t| Node::Text(t.to_string())),
        roxmltree::NodeType::Comment => node.text().map(|t| Node::Comment(t.to_string())),
        roxmltree::NodeType::PI => node.pi().map(|pi| Node::ProcessingInstruction {
            target: pi.target.to_string(),
            data: pi.value.map(str::to_string),
        }),
        roxmltree::NodeType::Root => None,
    }
}

fn convert_element(node: roxmltree::Node<'_, '_>, source: &str) -> Element {
    let tag = node.tag_name();
    let name = QName {
        namespace: tag.namespace().map(str::to_string),
        prefix: element_prefix(node, source),
        local: tag.name().to_string(),
    };

    let attributes = node
        .attributes()
        .map(|attr| {
            let prefix = match attr.namespace() {
                Some(XML_NAMESPACE) => Some("xml".to_string()),
                Some(uri) => node
                    .lookup_prefix(uri)
                    .filter(|p| !p.is_empty())
                    .map(str::to_string),
                None => None,
            };
            Attribute {
                name: QName {
                    namespace: attr.namespace().map(str::to_string),
                    prefix,
                    local: attr.name().to_string(),
                },
                value: attr.value().to_string(),
            }
        })
        .collect();

    let children = node
        .children()
        .filter_map(|n| convert_node(n, source))
        .collect();

    Element {
        name,
        namespaces: declared_namespaces(node),
        attributes,
        children,
    }
}

/// Reads the prefix from the element's start tag in the source text.
fn element_prefix(node: roxmltree::Node<'_, '_>, source: &str) -> Option<String> {
    let tag = source.get(node.range())?.strip_prefix('<')?;
    let end = tag
        .find(|c: char| c.is_whitespace() || c == '>' || c == '/')
        .unwrap_or(tag.len());
    let qname = &tag[..end];
    qname.split_once(':').map(|(prefix, _)| prefix.to_string())
}

/// Namespaces in scope on `node` that its parent element does not already
/// provide with the same binding.
fn declared_namespaces(node: roxmltree::Node<'_, '_>) -> Vec<NamespaceDecl> {
    let inherited: Vec<(Option<&str>, &str)> = node
        .parent_element()
        .map(|parent| parent.namespaces().map(|ns| (ns.name(), ns.uri())).collect())
        .unwrap_or_default();

    node.namespaces()
        .filter(|ns| ns.name() != Some("xml"))
        .filter(|ns| !inherited.contains(&(ns.name(), ns.uri())))
        .map(|ns| NamespaceDecl {
            prefix: ns.name().map(str::to_string),
            uri: ns.uri().to_string(),
        })
        .collect()
}
