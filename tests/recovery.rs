use std::path::PathBuf;

use squad_pulse::dataset::{load_optional, load_recovery_file};
use squad_pulse::recovery::{
    RecoveryComponent, RecoveryDay, average_scores, recent_days, recovery_score,
};

fn fixture_path(name: &str) -> PathBuf {
    let mut path = PathBuf::from(env!("CARGO_MANIFEST_DIR"));
    path.push("tests");
    path.push("fixtures");
    path.push(name);
    path
}

fn days() -> Vec<RecoveryDay> {
    load_recovery_file(&fixture_path("recovery.csv")).expect("recovery fixture should load")
}

fn close(a: f64, b: f64) -> bool {
    (a - b).abs() < 1e-9
}

#[test]
fn blank_cells_stay_missing() {
    let rows = days();
    assert_eq!(rows.len(), 6);
    assert_eq!(rows[1].baseline, None);
    assert_eq!(rows[2].composite(RecoveryComponent::Soreness), None);
    assert_eq!(rows[2].composite(RecoveryComponent::Sleep), Some(0.0));
    assert_eq!(rows[2].reading(RecoveryComponent::Bio).completeness, Some(0.5));
    assert_eq!(rows[4].baseline, Some(0.0));
}

#[test]
fn score_prefers_baseline() {
    let rows = days();
    assert!(close(recovery_score(&rows[0]), 65.0));
    assert!(close(recovery_score(&rows[5]), 25.0));
    // zero is a real baseline, not a missing one
    assert!(close(recovery_score(&rows[4]), 50.0));
}

#[test]
fn score_falls_back_to_composite_mean() {
    let rows = days();
    assert!(close(recovery_score(&rows[1]), 75.0));
    assert_eq!(recovery_score(&rows[3]), 0.0);
}

#[test]
fn score_is_clamped() {
    let rows = days();
    assert_eq!(recovery_score(&rows[2]), 100.0);

    let low = RecoveryDay {
        baseline: Some(-3.0),
        ..Default::default()
    };
    assert_eq!(recovery_score(&low), 0.0);
}

#[test]
fn recent_window_is_anchored_on_latest_day() {
    let rows = days();
    let week: Vec<&str> = recent_days(&rows, 7).iter().map(|d| d.date.as_str()).collect();
    assert_eq!(week, ["05/08/2024", "2024-08-08", "2024-08-10"]);

    assert_eq!(recent_days(&rows, 10).len(), 4);
    // undated rows never make it into a window
    assert_eq!(recent_days(&rows, 30).len(), 5);
    assert_eq!(recent_days(&rows, 0).len(), 1);
    assert!(recent_days(&[], 7).is_empty());
}

#[test]
fn window_averages() {
    let rows = days();
    let avg = average_scores(recent_days(&rows, 7));
    assert!(close(avg.overall, 175.0 / 3.0));
    assert!(close(avg.sleep, 62.5));
    assert!(close(avg.bio, 50.0));
    assert!(close(avg.soreness, 75.0));
    assert!(close(avg.subjective, 75.0));
}

#[test]
fn empty_period_averages_to_zero() {
    let avg = average_scores(&[]);
    assert_eq!(avg.overall, 0.0);
    assert_eq!(avg.sleep, 0.0);
    assert_eq!(avg.bio, 0.0);
}

#[test]
fn optional_table_degrades_to_empty() {
    let missing = fixture_path("no_such_recovery.csv");
    assert!(load_optional(Some(missing.as_path()), "recovery", load_recovery_file).is_empty());
    assert!(load_optional(None, "recovery", load_recovery_file).is_empty());
    let loaded = load_optional(
        Some(fixture_path("recovery.csv").as_path()),
        "recovery",
        load_recovery_file,
    );
    assert_eq!(loaded.len(), 6);
}
