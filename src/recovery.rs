use chrono::{Duration, NaiveDate};
use serde::{Deserialize, Serialize};

use crate::records::{parse_day, parse_float};

/// Wellness components reported per day, each as a completeness figure and a
/// composite score on a -1..1 scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RecoveryComponent {
    Bio,
    MskJointRange,
    MskLoadTolerance,
    Subjective,
    Soreness,
    Sleep,
}

impl RecoveryComponent {
    pub const ALL: [RecoveryComponent; 6] = [
        RecoveryComponent::Bio,
        RecoveryComponent::MskJointRange,
        RecoveryComponent::MskLoadTolerance,
        RecoveryComponent::Subjective,
        RecoveryComponent::Soreness,
        RecoveryComponent::Sleep,
    ];

    pub fn prefix(self) -> &'static str {
        match self {
            RecoveryComponent::Bio => "bio",
            RecoveryComponent::MskJointRange => "msk_joint_range",
            RecoveryComponent::MskLoadTolerance => "msk_load_tolerance",
            RecoveryComponent::Subjective => "subjective",
            RecoveryComponent::Soreness => "soreness",
            RecoveryComponent::Sleep => "sleep",
        }
    }

    fn index(self) -> usize {
        self as usize
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    pub completeness: Option<f64>,
    pub composite: Option<f64>,
}

/// One day of wellness data. Blank cells stay `None` so a missing baseline is
/// distinguishable from a baseline of zero.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RecoveryDay {
    pub date: String,
    pub readings: [Reading; 6],
    pub baseline: Option<f64>,
}

impl RecoveryDay {
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Self {
        let number = |name: &str| get(name).and_then(|v| parse_float(&v));
        Self {
            date: get("date").map(|v| v.trim().to_string()).unwrap_or_default(),
            readings: RecoveryComponent::ALL.map(|c| Reading {
                completeness: number(&format!("{}_completeness", c.prefix())),
                composite: number(&format!("{}_composite", c.prefix())),
            }),
            baseline: number("emboss_baseline_score"),
        }
    }

    pub fn reading(&self, component: RecoveryComponent) -> Reading {
        self.readings[component.index()]
    }

    pub fn composite(&self, component: RecoveryComponent) -> Option<f64> {
        self.reading(component).composite
    }
}

/// Map a -1..1 score onto 0..100 (unclamped).
pub fn to_percent(score: f64) -> f64 {
    (score + 1.0) / 2.0 * 100.0
}

/// Overall recovery on 0..100. Uses the baseline score when present, else the
/// mean of whatever composites the day has; a day with neither scores 0.
pub fn recovery_score(day: &RecoveryDay) -> f64 {
    let score = match day.baseline {
        Some(baseline) => baseline,
        None => {
            let composites: Vec<f64> = day.readings.iter().filter_map(|r| r.composite).collect();
            if composites.is_empty() {
                return 0.0;
            }
            composites.iter().sum::<f64>() / composites.len() as f64
        }
    };
    to_percent(score).clamp(0.0, 100.0)
}

/// Days within `window_days` of the latest dated day (inclusive on both
/// ends), sorted by date. Rows whose date does not parse are dropped.
pub fn recent_days(days: &[RecoveryDay], window_days: i64) -> Vec<&RecoveryDay> {
    let mut dated: Vec<_> = days
        .iter()
        .filter_map(|d| parse_day(&d.date).map(|day| (day, d)))
        .collect();
    dated.sort_by_key(|(day, _)| *day);

    let Some((latest, _)) = dated.last().copied() else {
        return Vec::new();
    };
    let start = latest
        .checked_sub_signed(Duration::days(window_days.clamp(0, 36_500)))
        .unwrap_or(NaiveDate::MIN);
    dated
        .into_iter()
        .filter(|(day, _)| *day >= start)
        .map(|(_, d)| d)
        .collect()
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize)]
pub struct RecoveryAverages {
    pub overall: f64,
    pub sleep: f64,
    pub soreness: f64,
    pub subjective: f64,
    pub bio: f64,
}

/// Period averages on 0..100. Component averages only count days that carry
/// that composite; an empty period is all zeros.
pub fn average_scores<'a>(days: impl IntoIterator<Item = &'a RecoveryDay>) -> RecoveryAverages {
    let days: Vec<&RecoveryDay> = days.into_iter().collect();
    let component = |c: RecoveryComponent| {
        mean(days.iter().filter_map(|d| d.composite(c)).map(to_percent))
    };
    RecoveryAverages {
        overall: mean(days.iter().map(|d| recovery_score(d))),
        sleep: component(RecoveryComponent::Sleep),
        soreness: component(RecoveryComponent::Soreness),
        subjective: component(RecoveryComponent::Subjective),
        bio: component(RecoveryComponent::Bio),
    }
}

fn mean(values: impl Iterator<Item = f64>) -> f64 {
    let (sum, count) = values.fold((0.0, 0usize), |(sum, count), v| (sum + v, count + 1));
    if count == 0 { 0.0 } else { sum / count as f64 }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn percent_scale() {
        assert_eq!(to_percent(-1.0), 0.0);
        assert_eq!(to_percent(0.0), 50.0);
        assert_eq!(to_percent(1.0), 100.0);
    }

    #[test]
    fn mean_of_nothing_is_zero() {
        assert_eq!(mean(std::iter::empty()), 0.0);
        assert_eq!(mean([10.0, 20.0].into_iter()), 15.0);
    }
}
