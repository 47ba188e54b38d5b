use std::collections::VecDeque;

use crate::aggregate::{
    AgeDistribution, SquadTotals, age_distribution, player_seasons, player_total_games,
    player_total_minutes, position_distribution, squad_totals, top_n_by_minutes, unique_players,
    unique_seasons,
};
use crate::country::{UNKNOWN_COUNTRY, flag_url, resolve_country_code};
use crate::dataset::SideData;
use crate::load::{LoadSummary, WeeklyLoad, load_summary, weekly_load};
use crate::priority::{
    PriorityArea, PriorityProgress, StatusCounts, by_priority, priority_progress,
    status_by_category,
};
use crate::records::PlayerRecord;
use crate::recovery::{RecoveryAverages, average_scores, recent_days, recovery_score};

const MAX_LOGS: usize = 50;
const FLAG_WIDTH: u16 = 40;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum View {
    Overview,
    Player,
    Performance,
}

/// Everything the overview screen draws, computed once per data load.
#[derive(Debug, Clone, Default)]
pub struct OverviewData {
    pub totals: SquadTotals,
    pub top_minutes: Vec<(String, i64)>,
    pub positions: Vec<(String, usize)>,
    pub ages: AgeDistribution,
    pub seasons: Vec<String>,
}

impl OverviewData {
    /// "2022-2023 to 2023-2024", a single season, or "-" with none.
    pub fn season_span(&self) -> String {
        match (self.seasons.first(), self.seasons.last()) {
            (Some(first), Some(last)) if first != last => format!("{first} to {last}"),
            (Some(only), _) => only.clone(),
            _ => "-".to_string(),
        }
    }
}

/// Load, wellness and priority panels, computed once when side tables load.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PerformanceData {
    pub load: LoadSummary,
    pub weekly: Vec<WeeklyLoad>,
    pub recovery_window_days: i64,
    pub recovery_days: usize,
    pub recovery: RecoveryAverages,
    pub latest_recovery: Option<(String, f64)>,
    pub progress: PriorityProgress,
    pub categories: Vec<(String, StatusCounts)>,
    pub priorities: Vec<PriorityArea>,
}

impl PerformanceData {
    pub fn from_side(side: &SideData, window_days: i64) -> Self {
        let window = recent_days(&side.recovery, window_days);
        let latest_recovery = window
            .last()
            .map(|day| (day.date.clone(), recovery_score(day)));
        Self {
            load: load_summary(&side.gps),
            weekly: weekly_load(&side.gps),
            recovery_window_days: window_days,
            recovery_days: window.len(),
            recovery: average_scores(window),
            latest_recovery,
            progress: priority_progress(&side.priority),
            categories: status_by_category(&side.priority),
            priorities: by_priority(&side.priority).into_iter().cloned().collect(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.load.sessions == 0 && self.recovery_days == 0 && self.progress.total == 0
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlayerProfile {
    pub name: String,
    pub position: String,
    pub nationality: String,
    pub country_code: String,
    pub flag_url: Option<String>,
    pub total_games: i64,
    pub total_minutes: i64,
    pub seasons: usize,
}

#[derive(Debug, Clone)]
pub struct DashboardState {
    pub view: View,
    pub help_overlay: bool,
    pub selected: usize,
    pub top_n: usize,
    pub source_label: String,
    pub logs: VecDeque<String>,
    records: Vec<PlayerRecord>,
    players: Vec<String>,
    overview: OverviewData,
    performance: PerformanceData,
}

impl DashboardState {
    pub fn new(records: Vec<PlayerRecord>, top_n: usize, source_label: impl Into<String>) -> Self {
        let mut state = Self {
            view: View::Overview,
            help_overlay: false,
            selected: 0,
            top_n,
            source_label: source_label.into(),
            logs: VecDeque::new(),
            records: Vec::new(),
            players: Vec::new(),
            overview: OverviewData::default(),
            performance: PerformanceData::default(),
        };
        state.set_records(records);
        state
    }

    pub fn set_records(&mut self, records: Vec<PlayerRecord>) {
        let selected_name = self.selected_player().map(str::to_string);
        self.players = unique_players(&records);
        self.overview = OverviewData {
            totals: squad_totals(&records),
            top_minutes: top_n_by_minutes(&records, self.top_n),
            positions: position_distribution(&records),
            ages: age_distribution(&records),
            seasons: unique_seasons(&records),
        };
        self.records = records;
        self.selected = selected_name
            .and_then(|name| self.players.iter().position(|p| *p == name))
            .unwrap_or(0);
        self.clamp_selection();
        self.push_log(format!(
            "[INFO] {} rows, {} players",
            self.records.len(),
            self.players.len()
        ));
    }

    pub fn records(&self) -> &[PlayerRecord] {
        &self.records
    }

    pub fn players(&self) -> &[String] {
        &self.players
    }

    pub fn overview(&self) -> &OverviewData {
        &self.overview
    }

    pub fn set_side_data(&mut self, side: &SideData, window_days: i64) {
        self.performance = PerformanceData::from_side(side, window_days);
        self.push_log(format!(
            "[INFO] {} gps sessions, {} recovery days, {} priority areas",
            side.gps.len(),
            side.recovery.len(),
            side.priority.len()
        ));
    }

    pub fn performance(&self) -> &PerformanceData {
        &self.performance
    }

    pub fn selected_player(&self) -> Option<&str> {
        self.players.get(self.selected).map(String::as_str)
    }

    pub fn selected_profile(&self) -> Option<PlayerProfile> {
        let name = self.selected_player()?;
        let rows = player_seasons(&self.records, name);
        // Latest row carries the current position and nationality.
        let latest = rows.last()?;
        let country_code = resolve_country_code(&latest.nationality);
        let flag =
            (country_code != UNKNOWN_COUNTRY).then(|| flag_url(&country_code, FLAG_WIDTH));
        Some(PlayerProfile {
            name: name.to_string(),
            position: latest.position.clone(),
            nationality: latest.nationality.clone(),
            country_code,
            flag_url: flag,
            total_games: player_total_games(&self.records, name),
            total_minutes: player_total_minutes(&self.records, name),
            seasons: rows.len(),
        })
    }

    pub fn selected_seasons(&self) -> Vec<&PlayerRecord> {
        match self.selected_player() {
            Some(name) => player_seasons(&self.records, name),
            None => Vec::new(),
        }
    }

    pub fn toggle_help(&mut self) {
        self.help_overlay = !self.help_overlay;
    }

    pub fn select_next(&mut self) {
        if self.players.is_empty() {
            return;
        }
        self.selected = (self.selected + 1).min(self.players.len() - 1);
    }

    pub fn select_prev(&mut self) {
        self.selected = self.selected.saturating_sub(1);
    }

    pub fn clamp_selection(&mut self) {
        if self.players.is_empty() {
            self.selected = 0;
        } else if self.selected >= self.players.len() {
            self.selected = self.players.len() - 1;
        }
    }

    pub fn push_log(&mut self, msg: impl Into<String>) {
        self.logs.push_back(msg.into());
        while self.logs.len() > MAX_LOGS {
            self.logs.pop_front();
        }
    }
}
