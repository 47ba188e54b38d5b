use std::fs;

use squad_pulse::dataset::parse_csv_records;
use squad_pulse::export::{export_csv, export_workbook};
use squad_pulse::mock_roster;

#[test]
fn workbook_report_counts_views() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("squad.xlsx");
    let records = mock_roster::generate(3, 12, 2);

    let report = export_workbook(&path, &records, 5).expect("export should succeed");
    assert_eq!(report.records, 24);
    assert_eq!(report.players, 12);
    assert_eq!(report.top_rows, 5);
    assert!(report.positions >= 1);

    let meta = fs::metadata(&path).expect("workbook should exist");
    assert!(meta.len() > 0);
}

#[test]
fn workbook_for_empty_squad() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("empty.xlsx");
    let report = export_workbook(&path, &[], 5).expect("export should succeed");
    assert_eq!(report.records, 0);
    assert_eq!(report.top_rows, 0);
    assert!(path.exists());
}

#[test]
fn csv_export_round_trips() {
    let dir = tempfile::tempdir().expect("tempdir");
    let path = dir.path().join("squad.csv");
    let records = mock_roster::generate(8, 6, 3);

    let written = export_csv(&path, &records).expect("csv export should succeed");
    assert_eq!(written, 18);

    let raw = fs::read_to_string(&path).expect("csv should be readable");
    assert_eq!(parse_csv_records(&raw).expect("csv should parse"), records);
}

#[test]
fn workbook_adds_side_sheets_when_present() {
    use std::path::PathBuf;

    use squad_pulse::dataset::{SideData, load_gps_file, load_priority_file};
    use squad_pulse::export::export_workbook_with_side;

    let fixture = |name: &str| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    };
    let dir = tempfile::tempdir().expect("tempdir");
    let records = mock_roster::generate(3, 12, 2);

    let bare = export_workbook(&dir.path().join("bare.xlsx"), &records, 5).expect("export");
    assert_eq!(bare.sheets, 6);

    let side = SideData {
        gps: load_gps_file(&fixture("gps.csv")).expect("gps fixture"),
        recovery: Vec::new(),
        priority: load_priority_file(&fixture("priority.csv")).expect("priority fixture"),
    };
    let path = dir.path().join("full.xlsx");
    let report = export_workbook_with_side(&path, &records, &side, 7, 5).expect("export");
    // Load + WeeklyLoad + Priorities; no recovery rows, no Recovery sheet
    assert_eq!(report.sheets, 9);
    assert_eq!(report.records, 24);
    assert!(path.exists());
}
