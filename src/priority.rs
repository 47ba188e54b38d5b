use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::records::parse_int_or_zero;

/// A coaching priority area and its tracking status.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PriorityArea {
    pub priority: String,
    pub category: String,
    pub area: String,
    pub target: String,
    pub performance_type: String,
    pub target_set: String,
    pub review_date: String,
    pub tracking: String,
}

impl PriorityArea {
    /// Header names follow the tracking sheet ("Performance Type",
    /// "Target set", ...), looked up lower-cased.
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Self {
        let text = |name: &str| get(name).map(|v| v.trim().to_string()).unwrap_or_default();
        Self {
            priority: text("priority"),
            category: text("category"),
            area: text("area"),
            target: text("target"),
            performance_type: text("performance type"),
            target_set: text("target set"),
            review_date: text("review date"),
            tracking: text("tracking"),
        }
    }

    /// Numeric priority when the cell starts with one.
    pub fn rank(&self) -> Option<i64> {
        let starts_numeric = self
            .priority
            .trim_start_matches(['+', '-'])
            .starts_with(|c: char| c.is_ascii_digit());
        starts_numeric.then(|| parse_int_or_zero(&self.priority))
    }

    pub fn status(&self) -> Option<TrackingStatus> {
        TrackingStatus::from_label(&self.tracking)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TrackingStatus {
    Achieved,
    OnTrack,
    Behind,
    NotStarted,
}

impl TrackingStatus {
    pub const ALL: [TrackingStatus; 4] = [
        TrackingStatus::Achieved,
        TrackingStatus::OnTrack,
        TrackingStatus::Behind,
        TrackingStatus::NotStarted,
    ];

    pub fn label(self) -> &'static str {
        match self {
            TrackingStatus::Achieved => "Achieved",
            TrackingStatus::OnTrack => "On Track",
            TrackingStatus::Behind => "Behind",
            TrackingStatus::NotStarted => "Not Started",
        }
    }

    /// Case-insensitive match on the sheet's status labels.
    pub fn from_label(raw: &str) -> Option<Self> {
        let raw = raw.trim();
        Self::ALL
            .into_iter()
            .find(|status| status.label().eq_ignore_ascii_case(raw))
    }
}

/// Counts per known status, plus any other tracking text in first-seen order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct StatusCounts {
    pub achieved: usize,
    pub on_track: usize,
    pub behind: usize,
    pub not_started: usize,
    pub other: Vec<(String, usize)>,
}

impl StatusCounts {
    fn add(&mut self, tracking: &str) {
        match TrackingStatus::from_label(tracking) {
            Some(status) => *self.slot(status) += 1,
            None => match self.other.iter_mut().find(|(label, _)| label == tracking) {
                Some((_, count)) => *count += 1,
                None => self.other.push((tracking.to_string(), 1)),
            },
        }
    }

    fn slot(&mut self, status: TrackingStatus) -> &mut usize {
        match status {
            TrackingStatus::Achieved => &mut self.achieved,
            TrackingStatus::OnTrack => &mut self.on_track,
            TrackingStatus::Behind => &mut self.behind,
            TrackingStatus::NotStarted => &mut self.not_started,
        }
    }

    pub fn get(&self, status: TrackingStatus) -> usize {
        match status {
            TrackingStatus::Achieved => self.achieved,
            TrackingStatus::OnTrack => self.on_track,
            TrackingStatus::Behind => self.behind,
            TrackingStatus::NotStarted => self.not_started,
        }
    }

    pub fn total(&self) -> usize {
        TrackingStatus::ALL.iter().map(|s| self.get(*s)).sum::<usize>()
            + self.other.iter().map(|(_, n)| n).sum::<usize>()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PriorityProgress {
    pub total: usize,
    pub counts: StatusCounts,
}

impl PriorityProgress {
    /// Share of all areas in `status`, 0..100; 0 when there are no areas.
    pub fn percent(&self, status: TrackingStatus) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.counts.get(status) as f64 / self.total as f64 * 100.0
    }
}

pub fn priority_progress(areas: &[PriorityArea]) -> PriorityProgress {
    PriorityProgress {
        total: areas.len(),
        counts: tally(areas.iter()),
    }
}

pub fn areas_in_category<'a>(areas: &'a [PriorityArea], category: &str) -> Vec<&'a PriorityArea> {
    areas.iter().filter(|a| a.category == category).collect()
}

/// Area count per category, first-seen order.
pub fn category_breakdown(areas: &[PriorityArea]) -> Vec<(String, usize)> {
    count_first_seen(areas.iter().map(|a| a.category.as_str()))
}

/// Area count per area name within one category, first-seen order.
pub fn areas_by_category(areas: &[PriorityArea], category: &str) -> Vec<(String, usize)> {
    count_first_seen(
        areas
            .iter()
            .filter(|a| a.category == category)
            .map(|a| a.area.as_str()),
    )
}

/// Status counts per category, categories in first-seen order.
pub fn status_by_category(areas: &[PriorityArea]) -> Vec<(String, StatusCounts)> {
    category_breakdown(areas)
        .into_iter()
        .map(|(category, _)| {
            let counts = tally(areas.iter().filter(|a| a.category == category));
            (category, counts)
        })
        .collect()
}

/// Areas ordered by numeric priority; unranked rows go last in input order.
pub fn by_priority(areas: &[PriorityArea]) -> Vec<&PriorityArea> {
    let mut out: Vec<&PriorityArea> = areas.iter().collect();
    out.sort_by_key(|a| a.rank().map_or((1, 0), |rank| (0, rank)));
    out
}

fn tally<'a>(areas: impl Iterator<Item = &'a PriorityArea>) -> StatusCounts {
    let mut counts = StatusCounts::default();
    for area in areas {
        counts.add(&area.tracking);
    }
    counts
}

fn count_first_seen<'a>(keys: impl Iterator<Item = &'a str>) -> Vec<(String, usize)> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut out: Vec<(String, usize)> = Vec::new();
    for key in keys {
        let idx = *slots.entry(key).or_insert_with(|| {
            out.push((key.to_string(), 0));
            out.len() - 1
        });
        out[idx].1 += 1;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_labels() {
        assert_eq!(TrackingStatus::from_label("On Track"), Some(TrackingStatus::OnTrack));
        assert_eq!(TrackingStatus::from_label(" not started "), Some(TrackingStatus::NotStarted));
        assert_eq!(TrackingStatus::from_label("Paused"), None);
    }

    #[test]
    fn rank_reads_leading_number() {
        let area = |p: &str| PriorityArea {
            priority: p.to_string(),
            ..Default::default()
        };
        assert_eq!(area("2").rank(), Some(2));
        assert_eq!(area("3 (high)").rank(), Some(3));
        assert_eq!(area("High").rank(), None);
        assert_eq!(area("").rank(), None);
    }
}
