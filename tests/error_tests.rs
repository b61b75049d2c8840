use std::path::Path;
use xmldiff_rs::{parse_file, ConfigError, PairError, ParseError, ReportError, XmlDiffError};

#[test]
fn test_parse_error_messages() {
    let err = ParseError::file_not_found(Path::new("a.xsd"));
    assert_eq!(err.to_string(), "File not found: a.xsd");

    let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "denied");
    let err = ParseError::read_error(Path::new("b.xsd"), io);
    assert!(err.to_string().starts_with("Failed to read file b.xsd"));
}

#[test]
fn test_xml_error_carries_position() {
    let dir = tempfile::TempDir::new().unwrap();
    let path = dir.path().join("bad.xsd");
    std::fs::write(&path, "<a>\n<b></a>").unwrap();

    let err = parse_file(&path, false).unwrap_err();
    let message = err.to_string();
    assert!(message.starts_with("Malformed XML in"));
    assert!(message.contains("2:"));
}

#[test]
fn test_config_error_messages() {
    let err = ConfigError::not_a_directory("Compare", Path::new("b.xsd"));
    assert_eq!(err.to_string(), "Compare path is not a directory: b.xsd");

    let err = ConfigError::config_invalid(Path::new("c.toml"), "bad key");
    assert_eq!(err.to_string(), "Invalid config file c.toml: bad key");
}

#[test]
fn test_report_error_into_umbrella() {
    let io = std::io::Error::new(std::io::ErrorKind::Other, "disk full");
    let pair: PairError = ReportError::write_error(Path::new("out/x.html"), io).into();
    assert!(pair.to_string().contains("out/x.html"));

    let err: XmlDiffError = pair.into();
    assert!(matches!(err, XmlDiffError::Report(_)));
}
