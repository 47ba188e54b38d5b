use std::fmt;
use std::str::FromStr;

use anyhow::anyhow;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// One player-season row as scraped from the FBref squad stats table.
///
/// Numeric columns stay string-encoded. Defaults are applied once at the
/// dataset boundary (see [`PlayerRecord::normalized`]); aggregation only ever
/// reads them through [`PlayerRecord::stat`].
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerRecord {
    pub season: String,
    pub player: String,
    pub nationality: String,
    pub position: String,
    pub age: String,
    pub games: String,
    pub games_starts: String,
    pub minutes: String,
    pub minutes_90s: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatField {
    Age,
    Games,
    GamesStarts,
    Minutes,
    Minutes90s,
}

impl StatField {
    pub const ALL: [StatField; 5] = [
        StatField::Age,
        StatField::Games,
        StatField::GamesStarts,
        StatField::Minutes,
        StatField::Minutes90s,
    ];

    pub fn column(self) -> &'static str {
        match self {
            StatField::Age => "age",
            StatField::Games => "games",
            StatField::GamesStarts => "games_starts",
            StatField::Minutes => "minutes",
            StatField::Minutes90s => "minutes_90s",
        }
    }
}

impl fmt::Display for StatField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.column())
    }
}

impl FromStr for StatField {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key = s.trim().to_ascii_lowercase();
        StatField::ALL
            .into_iter()
            .find(|field| field.column() == key)
            .ok_or_else(|| anyhow!("unknown stat field: {s}"))
    }
}

impl PlayerRecord {
    pub fn raw(&self, field: StatField) -> &str {
        match field {
            StatField::Age => &self.age,
            StatField::Games => &self.games,
            StatField::GamesStarts => &self.games_starts,
            StatField::Minutes => &self.minutes,
            StatField::Minutes90s => &self.minutes_90s,
        }
    }

    /// Parsed value of a numeric column; anything unparseable counts as zero.
    pub fn stat(&self, field: StatField) -> i64 {
        parse_int_or_zero(self.raw(field))
    }

    /// Trim every column and fill blanks: "0" for counting stats, "" for age
    /// and the text columns.
    pub fn normalized(self) -> Self {
        Self {
            season: self.season.trim().to_string(),
            player: self.player.trim().to_string(),
            nationality: self.nationality.trim().to_string(),
            position: self.position.trim().to_string(),
            age: self.age.trim().to_string(),
            games: or_zero(&self.games),
            games_starts: or_zero(&self.games_starts),
            minutes: or_zero(&self.minutes),
            minutes_90s: or_zero(&self.minutes_90s),
        }
    }
}

fn or_zero(raw: &str) -> String {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        "0".to_string()
    } else {
        trimmed.to_string()
    }
}

/// Lenient integer parse: optional sign, then the leading run of digits.
/// Thousands separators between digit groups are skipped ("1,234" -> 1234)
/// and trailing text is ignored ("31.0" -> 31). No digits or overflow -> 0.
pub fn parse_int_or_zero(raw: &str) -> i64 {
    let s = raw.trim();
    let (negative, body) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let bytes = body.as_bytes();
    let mut digits = String::new();
    for (idx, &b) in bytes.iter().enumerate() {
        if b.is_ascii_digit() {
            digits.push(b as char);
            continue;
        }
        let grouped = b == b','
            && !digits.is_empty()
            && bytes.get(idx + 1).is_some_and(u8::is_ascii_digit);
        if !grouped {
            break;
        }
    }

    let Ok(value) = digits.parse::<i64>() else {
        return 0;
    };
    if negative { -value } else { value }
}

/// Lenient decimal parse over the leading numeric prefix ("6.2km" -> 6.2).
/// Thousands separators are not accepted here. `None` when no digit leads.
pub fn parse_float(raw: &str) -> Option<f64> {
    let s = raw.trim();
    let mut end = 0;
    let mut seen_digit = false;
    let mut seen_dot = false;
    for (idx, ch) in s.char_indices() {
        match ch {
            '0'..='9' => {
                seen_digit = true;
                end = idx + 1;
            }
            '.' if !seen_dot => seen_dot = true,
            '+' | '-' if idx == 0 => {}
            _ => break,
        }
    }
    if !seen_digit {
        return None;
    }
    s[..end].parse::<f64>().ok().filter(|v| v.is_finite())
}

pub fn parse_float_or_zero(raw: &str) -> f64 {
    parse_float(raw).unwrap_or(0.0)
}

const DAY_FORMATS: [&str; 3] = ["%Y-%m-%d", "%d/%m/%Y", "%Y/%m/%d"];

/// Calendar day of a session/wellness row. A trailing time part is ignored.
pub fn parse_day(raw: &str) -> Option<NaiveDate> {
    let day = raw.trim().split(['T', ' ']).next()?;
    DAY_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}
