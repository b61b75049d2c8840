use xmldiff_rs::diff::{EditKind, LineKind};
use xmldiff_rs::{
    canonicalize, parse_str, AlgorithmChoice, CanonicalDocument, ComparisonResult, DiffEngine,
    DiffOptions, TreeDiffEngine,
};

const XS: &str = "http://www.w3.org/2001/XMLSchema";

fn schema(body: &str) -> CanonicalDocument {
    let xml = format!(r#"<xs:schema xmlns:xs="{}">{}</xs:schema>"#, XS, body);
    canonicalize(parse_str(&xml, false).unwrap())
}

fn diff(old: &CanonicalDocument, new: &CanonicalDocument, options: &DiffOptions) -> ComparisonResult {
    TreeDiffEngine.diff(old, new, options, AlgorithmChoice::Auto)
}

#[test]
fn test_reordered_schema_is_equal() {
    let old = schema(r#"<xs:element name="A" type="xs:string"/><xs:element name="B" type="xs:int"/>"#);
    let new = schema(r#"<xs:element name="B" type="xs:int"/><xs:element name="A" type="xs:string"/>"#);
    assert!(diff(&old, &new, &DiffOptions::default()).is_equal());
}

#[test]
fn test_type_change_is_single_changed_attribute() {
    let old = schema(r#"<xs:element name="Order" type="xs:string"/>"#);
    let new = schema(r#"<xs:element name="Order" type="xs:int"/>"#);

    let ComparisonResult::Different(script) = diff(&old, &new, &DiffOptions::default()) else {
        panic!("expected a difference");
    };
    assert_eq!(script.ops.len(), 1);
    assert_eq!(script.ops[0].kind, EditKind::Change);
    assert_eq!(script.ops[0].path, "/xs:schema/xs:element[@name='Order']/@type");
    assert_eq!(script.ops[0].old_value.as_deref(), Some("xs:string"));
    assert_eq!(script.ops[0].new_value.as_deref(), Some("xs:int"));

    let view = TreeDiffEngine.view(&old, &new, &DiffOptions::default(), AlgorithmChoice::Auto);
    assert_eq!(view.count(LineKind::Changed), 1);
    assert_eq!(view.count(LineKind::Added), 0);
    assert_eq!(view.count(LineKind::Removed), 0);
}

#[test]
fn test_renamed_element_is_changed_name_attribute() {
    let old = schema(r#"<xs:element name="Order" type="xs:string"/>"#);
    let new = schema(r#"<xs:element name="Orders" type="xs:string"/>"#);

    let ComparisonResult::Different(script) = diff(&old, &new, &DiffOptions::default()) else {
        panic!("expected a difference");
    };
    assert_eq!(script.stats.changed, 1);
    assert_eq!(script.stats.added, 0);
    assert_eq!(script.stats.removed, 0);
    assert_eq!(script.ops[0].path, "/xs:schema/xs:element[@name='Order']/@name");

    let view = TreeDiffEngine.view(&old, &new, &DiffOptions::default(), AlgorithmChoice::Auto);
    assert!(view
        .lines
        .iter()
        .any(|l| l.kind == LineKind::Changed && l.path == "/xs:schema/xs:element[@name='Order']/@name"));
    assert_eq!(view.count(LineKind::Added), 0);
    assert_eq!(view.count(LineKind::Removed), 0);
}

#[test]
fn test_renamed_element_among_unordered_siblings() {
    let options = DiffOptions {
        ignore_child_order: true,
        ..Default::default()
    };
    let old = schema(r#"<xs:element name="A" type="xs:int"/><xs:element name="Order" type="xs:string"/>"#);
    let new = schema(r#"<xs:element name="A" type="xs:int"/><xs:element name="Purchase" type="xs:string"/>"#);

    let ComparisonResult::Different(script) = diff(&old, &new, &options) else {
        panic!("expected a difference");
    };
    assert_eq!(script.stats.changed, 1);
    assert_eq!(script.stats.added + script.stats.removed, 0);
    assert_eq!(script.ops[0].old_value.as_deref(), Some("Order"));
    assert_eq!(script.ops[0].new_value.as_deref(), Some("Purchase"));
}

#[test]
fn test_whitespace_in_name_attribute_with_flag() {
    let old = canonicalize(parse_str(r#"<r><e name="a b" t="1"/></r>"#, false).unwrap());
    let new = canonicalize(parse_str(r#"<r><e name="a  b" t="1"/></r>"#, false).unwrap());
    let options = DiffOptions {
        ignore_whitespace: true,
        ..Default::default()
    };
    assert!(diff(&old, &new, &options).is_equal());
    assert!(!diff(&old, &new, &DiffOptions::default()).is_equal());
}

#[test]
fn test_added_element_subtree() {
    let old = schema(r#"<xs:element name="A"/>"#);
    let new = schema(r#"<xs:element name="A"/><xs:element name="B" type="xs:int"/>"#);

    let ComparisonResult::Different(script) = diff(&old, &new, &DiffOptions::default()) else {
        panic!("expected a difference");
    };
    assert_eq!(script.stats.added, 1);
    assert_eq!(script.ops[0].path, "/xs:schema/xs:element[@name='B']");

    // start tag plus both attributes
    let view = TreeDiffEngine.view(&old, &new, &DiffOptions::default(), AlgorithmChoice::Auto);
    assert_eq!(view.count(LineKind::Added), 3);
    assert!(view
        .lines
        .iter()
        .filter(|l| l.kind == LineKind::Added)
        .all(|l| l.left.is_none() && l.right.is_some()));
}

#[test]
fn test_moved_element_between_types() {
    let old = schema(
        r#"<xs:complexType name="A"><xs:sequence><xs:element name="id" type="xs:int"/></xs:sequence></xs:complexType>
           <xs:complexType name="B"><xs:sequence/></xs:complexType>"#,
    );
    let new = schema(
        r#"<xs:complexType name="A"><xs:sequence/></xs:complexType>
           <xs:complexType name="B"><xs:sequence><xs:element name="id" type="xs:int"/></xs:sequence></xs:complexType>"#,
    );

    let ComparisonResult::Different(script) = diff(&old, &new, &DiffOptions::default()) else {
        panic!("expected a difference");
    };
    assert_eq!(script.stats.moved, 1);
    assert_eq!(script.stats.added + script.stats.removed, 0);

    let view = TreeDiffEngine.view(&old, &new, &DiffOptions::default(), AlgorithmChoice::Auto);
    assert!(view.count(LineKind::MovedFrom) > 0);
    assert_eq!(view.count(LineKind::MovedFrom), view.count(LineKind::MovedTo));
}

#[test]
fn test_comment_changes_respect_flag() {
    let old = schema(r#"<!-- v1 --><xs:element name="A"/>"#);
    let new = schema(r#"<!-- v2 --><xs:element name="A"/>"#);
    assert!(!diff(&old, &new, &DiffOptions::default()).is_equal());

    let options = DiffOptions {
        ignore_comments: true,
        ..Default::default()
    };
    assert!(diff(&old, &new, &options).is_equal());
}

#[test]
fn test_declaration_and_dtd_never_differ() {
    let plain = canonicalize(parse_str("<a/>", false).unwrap());
    let declared = canonicalize(
        parse_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?><!DOCTYPE a><a/>", false).unwrap(),
    );
    assert!(diff(&plain, &declared, &DiffOptions::default()).is_equal());
}

#[test]
fn test_ignore_child_order_for_unnamed_siblings() {
    let old = schema(
        r#"<xs:simpleType name="T"><xs:restriction base="xs:string"><xs:enumeration value="a"/><xs:enumeration value="b"/></xs:restriction></xs:simpleType>"#,
    );
    let new = schema(
        r#"<xs:simpleType name="T"><xs:restriction base="xs:string"><xs:enumeration value="b"/><xs:enumeration value="a"/></xs:restriction></xs:simpleType>"#,
    );
    assert!(!diff(&old, &new, &DiffOptions::default()).is_equal());

    let options = DiffOptions {
        ignore_child_order: true,
        ..Default::default()
    };
    assert!(diff(&old, &new, &options).is_equal());
}

#[test]
fn test_equal_trees_have_identical_view() {
    let doc = schema(r#"<xs:element name="A" type="xs:string"/>"#);
    let view = TreeDiffEngine.view(&doc, &doc, &DiffOptions::default(), AlgorithmChoice::Precise);
    assert!(!view.lines.is_empty());
    assert_eq!(view.count(LineKind::Identical), view.lines.len());
}
