use std::collections::HashMap;

use chrono::Datelike;
use serde::{Deserialize, Serialize};

use crate::records::{parse_day, parse_float_or_zero, parse_int_or_zero};

/// One GPS tracking session (training day or match) from the load export.
///
/// Distances are metres, `peak_speed` is km/h and the heart-rate zones keep
/// their raw `H:M:S` text; see [`hr_zone_to_minutes`].
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GpsSession {
    pub date: String,
    pub opposition_code: String,
    pub opposition_full: String,
    pub md_plus_code: String,
    pub md_minus_code: String,
    pub season: String,
    pub distance: f64,
    pub distance_over_21: f64,
    pub distance_over_24: f64,
    pub distance_over_27: f64,
    pub accel_decel_over_2_5: f64,
    pub accel_decel_over_3_5: f64,
    pub accel_decel_over_4_5: f64,
    pub day_duration: f64,
    pub peak_speed: f64,
    pub hr_zones: [String; 5],
}

impl GpsSession {
    /// Build a session from a column lookup. Text is trimmed, numbers that do
    /// not parse become 0.
    pub fn from_lookup(get: &dyn Fn(&str) -> Option<String>) -> Self {
        let text = |name: &str| get(name).map(|v| v.trim().to_string()).unwrap_or_default();
        let number = |name: &str| get(name).map_or(0.0, |v| parse_float_or_zero(&v));
        Self {
            date: text("date"),
            opposition_code: text("opposition_code"),
            opposition_full: text("opposition_full"),
            md_plus_code: text("md_plus_code"),
            md_minus_code: text("md_minus_code"),
            season: text("season"),
            distance: number("distance"),
            distance_over_21: number("distance_over_21"),
            distance_over_24: number("distance_over_24"),
            distance_over_27: number("distance_over_27"),
            accel_decel_over_2_5: number("accel_decel_over_2_5"),
            accel_decel_over_3_5: number("accel_decel_over_3_5"),
            accel_decel_over_4_5: number("accel_decel_over_4_5"),
            day_duration: number("day_duration"),
            peak_speed: number("peak_speed"),
            hr_zones: std::array::from_fn(|idx| text(&format!("hr_zone_{}_hms", idx + 1))),
        }
    }

    /// Minutes spent in heart-rate zone `zone` (1..=5); other zones are 0.
    pub fn zone_minutes(&self, zone: usize) -> f64 {
        zone.checked_sub(1)
            .and_then(|idx| self.hr_zones.get(idx))
            .map_or(0.0, |hms| hr_zone_to_minutes(hms))
    }

    /// Zones 4 and 5 combined.
    pub fn high_intensity_minutes(&self) -> f64 {
        self.zone_minutes(4) + self.zone_minutes(5)
    }

    /// Distance covered above 21, 24 and 27 km/h, summed band by band.
    pub fn sprint_distance(&self) -> f64 {
        self.distance_over_21 + self.distance_over_24 + self.distance_over_27
    }
}

/// `H:M:S` to fractional minutes. Anything without exactly three parts is 0;
/// a part that does not parse counts as 0.
pub fn hr_zone_to_minutes(hms: &str) -> f64 {
    let parts: Vec<&str> = hms.trim().split(':').collect();
    let [hours, minutes, seconds] = parts.as_slice() else {
        return 0.0;
    };
    let hours = parse_int_or_zero(hours) as f64;
    let minutes = parse_int_or_zero(minutes) as f64;
    let seconds = parse_int_or_zero(seconds) as f64;
    hours * 60.0 + minutes + seconds / 60.0
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum GpsGroup {
    Date,
    Season,
    Opposition,
}

impl GpsGroup {
    fn key(self, session: &GpsSession) -> &str {
        match self {
            GpsGroup::Date => &session.date,
            GpsGroup::Season => &session.season,
            GpsGroup::Opposition => &session.opposition_code,
        }
    }
}

/// Sessions grouped by date, season or opposition code, groups in first-seen
/// order. Every session lands in exactly one group (blank keys included).
pub fn group_sessions(
    sessions: &[GpsSession],
    by: GpsGroup,
) -> Vec<(String, Vec<&GpsSession>)> {
    let mut slots: HashMap<&str, usize> = HashMap::new();
    let mut out: Vec<(String, Vec<&GpsSession>)> = Vec::new();
    for session in sessions {
        let key = by.key(session);
        let idx = *slots.entry(key).or_insert_with(|| {
            out.push((key.to_string(), Vec::new()));
            out.len() - 1
        });
        out[idx].1.push(session);
    }
    out
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WeeklyLoad {
    /// `{iso_year}-W{week}`, e.g. `2024-W33`.
    pub week: String,
    pub iso_year: i32,
    pub iso_week: u32,
    pub distance: f64,
    pub sessions: usize,
}

/// Total distance per ISO week, oldest week first. Sessions with a date that
/// does not parse are skipped.
pub fn weekly_load(sessions: &[GpsSession]) -> Vec<WeeklyLoad> {
    let mut weeks: HashMap<(i32, u32), (f64, usize)> = HashMap::new();
    for session in sessions {
        let Some(day) = parse_day(&session.date) else {
            continue;
        };
        let iso = day.iso_week();
        let entry = weeks.entry((iso.year(), iso.week())).or_insert((0.0, 0));
        entry.0 += session.distance;
        entry.1 += 1;
    }

    let mut out: Vec<WeeklyLoad> = weeks
        .into_iter()
        .map(|((iso_year, iso_week), (distance, sessions))| WeeklyLoad {
            week: format!("{iso_year}-W{iso_week}"),
            iso_year,
            iso_week,
            distance,
            sessions,
        })
        .collect();
    out.sort_by_key(|w| (w.iso_year, w.iso_week));
    out
}

/// Headline figures for the load panel.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct LoadSummary {
    pub sessions: usize,
    pub total_distance: f64,
    pub sprint_distance: f64,
    pub high_intensity_minutes: f64,
    pub peak_speed: f64,
}

pub fn load_summary(sessions: &[GpsSession]) -> LoadSummary {
    sessions.iter().fold(
        LoadSummary {
            sessions: sessions.len(),
            ..LoadSummary::default()
        },
        |mut acc, s| {
            acc.total_distance += s.distance;
            acc.sprint_distance += s.sprint_distance();
            acc.high_intensity_minutes += s.high_intensity_minutes();
            acc.peak_speed = acc.peak_speed.max(s.peak_speed);
            acc
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn zone_text_to_minutes() {
        assert_eq!(hr_zone_to_minutes("00:12:30"), 12.5);
        assert_eq!(hr_zone_to_minutes("1:05:00"), 65.0);
        assert_eq!(hr_zone_to_minutes("xx:10:00"), 10.0);
        assert_eq!(hr_zone_to_minutes("12:30"), 0.0);
        assert_eq!(hr_zone_to_minutes(""), 0.0);
    }

    #[test]
    fn zone_index_out_of_range() {
        let session = GpsSession {
            hr_zones: std::array::from_fn(|_| "00:01:00".to_string()),
            ..Default::default()
        };
        assert_eq!(session.zone_minutes(0), 0.0);
        assert_eq!(session.zone_minutes(6), 0.0);
        assert_eq!(session.zone_minutes(5), 1.0);
    }
}
