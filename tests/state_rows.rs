use squad_pulse::PlayerRecord;
use squad_pulse::state::{DashboardState, View};

fn row(season: &str, player: &str, nationality: &str, position: &str, minutes: &str) -> PlayerRecord {
    PlayerRecord {
        season: season.to_string(),
        player: player.to_string(),
        nationality: nationality.to_string(),
        position: position.to_string(),
        age: "24".to_string(),
        games: "10".to_string(),
        games_starts: "8".to_string(),
        minutes: minutes.to_string(),
        minutes_90s: "8.0".to_string(),
    }
}

fn squad() -> Vec<PlayerRecord> {
    vec![
        row("2022-2023", "Levi Colwill", "eng ENG", "DF", "700"),
        row("2023-2024", "Levi Colwill", "eng ENG", "DF,MF", "1910"),
        row("2023-2024", "Enzo Fernandez", "arg ARG", "MF", "2906"),
        row("2023-2024", "Axel Disasi", "fra FRA", "DF", "2350"),
    ]
}

#[test]
fn overview_is_computed_on_load() {
    let state = DashboardState::new(squad(), 2, "test");
    assert_eq!(state.view, View::Overview);
    assert_eq!(state.players().len(), 3);

    let overview = state.overview();
    assert_eq!(overview.totals.players, 3);
    assert_eq!(overview.totals.total_minutes, 7866);
    assert_eq!(
        overview.top_minutes,
        vec![
            ("Enzo Fernandez".to_string(), 2906),
            ("Levi Colwill".to_string(), 2610),
        ]
    );
    assert_eq!(overview.positions[0], ("DF".to_string(), 2));
    assert_eq!(overview.ages.counts, [0, 0, 4, 0, 0]);
}

#[test]
fn selection_clamps_to_player_list() {
    let mut state = DashboardState::new(squad(), 5, "test");
    assert_eq!(state.selected_player(), Some("Axel Disasi"));
    state.select_prev();
    assert_eq!(state.selected, 0);
    for _ in 0..10 {
        state.select_next();
    }
    assert_eq!(state.selected_player(), Some("Levi Colwill"));
}

#[test]
fn profile_uses_latest_season() {
    let mut state = DashboardState::new(squad(), 5, "test");
    state.select_next();
    state.select_next();
    let profile = state.selected_profile().expect("player should be selected");
    assert_eq!(profile.name, "Levi Colwill");
    assert_eq!(profile.position, "DF,MF");
    assert_eq!(profile.country_code, "gb-eng");
    assert_eq!(profile.total_games, 20);
    assert_eq!(profile.total_minutes, 2610);
    assert_eq!(profile.seasons, 2);
    assert_eq!(state.selected_seasons().len(), 2);
}

#[test]
fn reload_keeps_selected_player_by_name() {
    let mut state = DashboardState::new(squad(), 5, "test");
    state.select_next();
    assert_eq!(state.selected_player(), Some("Enzo Fernandez"));

    let mut records = squad();
    records.insert(0, row("2023-2024", "Aaron Anselmino", "arg ARG", "DF", "0"));
    state.set_records(records);
    assert_eq!(state.selected_player(), Some("Enzo Fernandez"));
    assert_eq!(state.selected, 2);
}

#[test]
fn empty_squad_has_no_selection() {
    let mut state = DashboardState::new(Vec::new(), 5, "test");
    state.select_next();
    assert_eq!(state.selected, 0);
    assert!(state.selected_player().is_none());
    assert!(state.selected_profile().is_none());
    assert!(state.selected_seasons().is_empty());
    assert_eq!(state.overview().totals.average_age, None);
}

#[test]
fn log_is_bounded() {
    let mut state = DashboardState::new(squad(), 5, "test");
    for idx in 0..120 {
        state.push_log(format!("[INFO] {idx}"));
    }
    assert_eq!(state.logs.len(), 50);
    assert_eq!(state.logs.back().map(String::as_str), Some("[INFO] 119"));
}

#[test]
fn overview_lists_season_span() {
    let state = DashboardState::new(squad(), 5, "test");
    let overview = state.overview();
    assert_eq!(overview.seasons, vec!["2022-2023", "2023-2024"]);
    assert_eq!(overview.season_span(), "2022-2023 to 2023-2024");

    let empty = DashboardState::new(Vec::new(), 5, "test");
    assert_eq!(empty.overview().season_span(), "-");
}

#[test]
fn profile_carries_flag_image() {
    let mut state = DashboardState::new(squad(), 5, "test");
    let disasi = state.selected_profile().expect("player should be selected");
    assert_eq!(
        disasi.flag_url.as_deref(),
        Some("https://flagcdn.com/w40/fr.png")
    );

    let mut records = squad();
    records.push(row("2023-2024", "Zak Sturge", "", "DF", "0"));
    state.set_records(records);
    for _ in 0..10 {
        state.select_next();
    }
    let sturge = state.selected_profile().expect("player should be selected");
    assert_eq!(sturge.name, "Zak Sturge");
    assert_eq!(sturge.country_code, "unknown");
    assert_eq!(sturge.flag_url, None);
}

#[test]
fn performance_panels_from_side_tables() {
    use squad_pulse::dataset::{SideData, load_gps_file, load_priority_file, load_recovery_file};
    use std::path::PathBuf;

    let fixture = |name: &str| {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
            .join("tests")
            .join("fixtures")
            .join(name)
    };
    let side = SideData {
        gps: load_gps_file(&fixture("gps.csv")).expect("gps fixture"),
        recovery: load_recovery_file(&fixture("recovery.csv")).expect("recovery fixture"),
        priority: load_priority_file(&fixture("priority.csv")).expect("priority fixture"),
    };

    let mut state = DashboardState::new(squad(), 5, "test");
    assert!(state.performance().is_empty());
    state.set_side_data(&side, 7);

    let perf = state.performance();
    assert!(!perf.is_empty());
    assert_eq!(perf.load.sessions, 7);
    assert_eq!(perf.weekly.len(), 4);
    assert_eq!(perf.recovery_days, 3);
    assert_eq!(perf.latest_recovery, Some(("2024-08-10".to_string(), 0.0)));
    assert_eq!(perf.progress.total, 6);
    assert_eq!(perf.categories.len(), 3);
    assert_eq!(perf.priorities[0].area, "Sprint Speed");
    assert!(state.logs.back().is_some_and(|l| l.contains("7 gps sessions")));
}
