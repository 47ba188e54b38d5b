use std::path::PathBuf;

use squad_pulse::dataset::load_priority_file;
use squad_pulse::priority::{
    PriorityArea, TrackingStatus, areas_by_category, areas_in_category, by_priority,
    category_breakdown, priority_progress, status_by_category,
};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn areas() -> Vec<PriorityArea> {
    load_priority_file(&fixture_path("priority.csv")).expect("priority fixture should load")
}

#[test]
fn parses_sheet_headers() {
    let rows = areas();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[0].area, "Sprint Speed");
    assert_eq!(rows[0].performance_type, "Physical");
    assert_eq!(rows[0].target_set, "2024-07-01");
    assert_eq!(rows[0].review_date, "2024-10-01");
    assert_eq!(rows[0].status(), Some(TrackingStatus::OnTrack));
    assert_eq!(rows[3].rank(), None);
}

#[test]
fn json_sheet_with_numeric_priority() {
    let rows = load_priority_file(&fixture_path("priority.json")).expect("json should load");
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].priority, "1");
    assert_eq!(rows[0].rank(), Some(1));
    assert_eq!(rows[1].performance_type, "Technical");
}

#[test]
fn progress_counts_and_percentages() {
    let progress = priority_progress(&areas());
    assert_eq!(progress.total, 6);
    assert_eq!(progress.counts.achieved, 2);
    assert_eq!(progress.counts.on_track, 1);
    assert_eq!(progress.counts.behind, 1);
    assert_eq!(progress.counts.not_started, 1);
    assert_eq!(progress.counts.other, vec![("Paused".to_string(), 1)]);
    assert_eq!(progress.counts.total(), 6);
    assert!((progress.percent(TrackingStatus::Achieved) - 100.0 / 3.0).abs() < 1e-9);
}

#[test]
fn empty_progress_is_zero_percent() {
    let progress = priority_progress(&[]);
    assert_eq!(progress.total, 0);
    for status in TrackingStatus::ALL {
        assert_eq!(progress.percent(status), 0.0);
    }
}

#[test]
fn category_views() {
    let rows = areas();
    assert_eq!(
        category_breakdown(&rows),
        vec![
            ("Performance".to_string(), 3),
            ("Technical".to_string(), 2),
            ("Tactical".to_string(), 1),
        ]
    );
    assert_eq!(
        areas_by_category(&rows, "Performance"),
        vec![("Sprint Speed".to_string(), 2), ("Repeat Sprint".to_string(), 1)]
    );
    assert_eq!(areas_in_category(&rows, "Technical").len(), 2);
    assert!(areas_in_category(&rows, "Mental").is_empty());
}

#[test]
fn status_per_category() {
    let by_category = status_by_category(&areas());
    assert_eq!(by_category.len(), 3);

    let (name, performance) = &by_category[0];
    assert_eq!(name, "Performance");
    assert_eq!(performance.achieved, 1);
    assert_eq!(performance.on_track, 1);
    assert_eq!(performance.behind, 1);
    assert_eq!(performance.not_started, 0);

    let (_, technical) = &by_category[1];
    assert_eq!(technical.get(TrackingStatus::Achieved), 1);
    assert_eq!(technical.other, vec![("Paused".to_string(), 1)]);

    let (_, tactical) = &by_category[2];
    assert_eq!(tactical.not_started, 1);
    assert_eq!(tactical.total(), 1);
}

#[test]
fn ordered_by_priority_rank() {
    let rows = areas();
    let ordered: Vec<&str> = by_priority(&rows).iter().map(|a| a.area.as_str()).collect();
    assert_eq!(
        ordered,
        [
            "Sprint Speed",
            "Weak Foot Passing",
            "Repeat Sprint",
            "Sprint Speed",
            "Aerial Duels",
            "Pressing Triggers",
        ]
    );
}
