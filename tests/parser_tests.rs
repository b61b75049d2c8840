use std::fs;
use std::io::Write;
use std::path::Path;
use tempfile::NamedTempFile;
use xmldiff_rs::tree::Node;
use xmldiff_rs::{parse_file, parse_str, ParseError};

const SCHEMA: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<xs:schema xmlns:xs="http://www.w3.org/2001/XMLSchema" elementFormDefault="qualified">
  <xs:element name="Order" type="xs:string"/>
</xs:schema>
"#;

#[test]
fn test_parse_schema_namespaces() {
    let doc = parse_str(SCHEMA, false).unwrap();
    let root = doc.root().unwrap();
    assert_eq!(root.name.local, "schema");
    assert_eq!(root.name.prefix.as_deref(), Some("xs"));
    assert_eq!(
        root.name.namespace.as_deref(),
        Some("http://www.w3.org/2001/XMLSchema")
    );
    assert_eq!(root.name.qualified(), "xs:schema");
    assert_eq!(root.namespaces.len(), 1);
    assert_eq!(root.attribute("elementFormDefault"), Some("qualified"));
}

#[test]
fn test_parse_keeps_comments_and_pis() {
    let doc = parse_str("<a><!-- note --><?app run?></a>", false).unwrap();
    let root = doc.root().unwrap();
    assert!(matches!(&root.children[0], Node::Comment(c) if c == " note "));
    assert!(matches!(
        &root.children[1],
        Node::ProcessingInstruction { target, data } if target == "app" && data.as_deref() == Some("run")
    ));
}

#[test]
fn test_parse_fragment_without_root() {
    let doc = parse_str("<?xml version=\"1.0\"?><a/>text<b/>", true).unwrap();
    assert!(doc.fragment);
    assert_eq!(doc.elements().count(), 2);
}

#[test]
fn test_parse_file() {
    let mut file = NamedTempFile::new().unwrap();
    file.write_all(SCHEMA.as_bytes()).unwrap();
    let doc = parse_file(file.path(), false).unwrap();
    assert_eq!(doc.root().unwrap().child_elements().count(), 1);
}

#[test]
fn test_parse_file_not_found() {
    let err = parse_file(Path::new("/nonexistent/schema.xsd"), false).unwrap_err();
    assert!(matches!(err, ParseError::FileNotFound { .. }));
    assert_eq!(err.path(), "/nonexistent/schema.xsd");
}

#[test]
fn test_parse_file_malformed_reports_path() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("broken.xsd");
    fs::write(&path, "<xs:schema>").unwrap();
    let err = parse_file(&path, false).unwrap_err();
    assert!(matches!(err, ParseError::XmlError { .. }));
    assert!(err.to_string().contains("broken.xsd"));
}

#[test]
fn test_parse_file_utf16_is_read_error() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("utf16.xsd");
    let mut bytes = vec![0xFF, 0xFE];
    for unit in "<?xml version=\"1.0\" encoding=\"UTF-16\"?><a>\u{e9}</a>".encode_utf16() {
        bytes.extend_from_slice(&unit.to_le_bytes());
    }
    fs::write(&path, bytes).unwrap();

    let err = parse_file(&path, false).unwrap_err();
    assert!(matches!(err, ParseError::ReadError { .. }));
    assert!(err.to_string().contains("utf16.xsd"));
}
