use std::path::PathBuf;
use xmldiff_rs::compare::FailedEntry;
use xmldiff_rs::{format_summary, BatchSummary, DiffStats, OutputFormat, ReportEntry};

fn sample() -> BatchSummary {
    BatchSummary {
        compared: 3,
        identical: vec!["customer.xsd".to_string()],
        different: vec![ReportEntry {
            file: "order.xsd".to_string(),
            report: PathBuf::from("reports/order.xsd_compare.html"),
            stats: DiffStats {
                added: 1,
                removed: 0,
                changed: 2,
                moved: 0,
            },
        }],
        failed: vec![FailedEntry {
            file: "broken.xsd".to_string(),
            error: "Malformed XML in broken.xsd".to_string(),
        }],
        only_in_a: vec![],
        only_in_b: vec!["new.xsd".to_string()],
        cancelled: false,
    }
}

#[test]
fn test_plain_summary() {
    let output = format_summary(&sample(), &OutputFormat::Plain).unwrap();
    assert!(output.contains("order.xsd (1 added, 2 changed) → reports/order.xsd_compare.html"));
    assert!(output.contains("! broken.xsd: Malformed XML in broken.xsd"));
    assert!(output.contains("new.xsd (only in compare)"));
    assert!(output.ends_with("Summary: 3 compared, 1 identical, 1 different, 1 failed, 1 unpaired"));
    assert!(!output.contains("\u{1b}["));
}

#[test]
fn test_terminal_summary_mentions_same_content() {
    colored::control::set_override(true);
    let output = format_summary(&sample(), &OutputFormat::Terminal).unwrap();
    assert!(output.contains("order.xsd"));
    assert!(output.contains("reports/order.xsd_compare.html"));
    assert!(output.contains("Summary: 3 compared"));
}

#[test]
fn test_json_summary_round_trips_through_serde_json() {
    let output = format_summary(&sample(), &OutputFormat::Json).unwrap();
    let value: serde_json::Value = serde_json::from_str(&output).unwrap();
    assert_eq!(value["compared"], 3);
    assert_eq!(value["identical"][0], "customer.xsd");
    assert_eq!(value["different"][0]["report"], "reports/order.xsd_compare.html");
    assert_eq!(value["different"][0]["stats"]["added"], 1);
    assert_eq!(value["failed"][0]["file"], "broken.xsd");
    assert_eq!(value["only_in_b"][0], "new.xsd");
}

#[test]
fn test_cancelled_run_is_reported() {
    let summary = BatchSummary {
        cancelled: true,
        ..Default::default()
    };
    let output = format_summary(&summary, &OutputFormat::Plain).unwrap();
    assert!(output.contains("Cancelled"));
}
