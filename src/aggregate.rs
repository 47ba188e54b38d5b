use std::collections::{BTreeSet, HashMap};

use serde::Serialize;

use crate::records::{PlayerRecord, StatField};

pub const AGE_BUCKET_LABELS: [&str; 5] = ["Under 20", "20-23", "24-27", "28-31", "32+"];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct AgeDistribution {
    pub counts: [usize; 5],
}

impl AgeDistribution {
    pub fn buckets(&self) -> impl Iterator<Item = (&'static str, usize)> + '_ {
        AGE_BUCKET_LABELS.iter().copied().zip(self.counts.iter().copied())
    }

    pub fn total(&self) -> usize {
        self.counts.iter().sum()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SquadTotals {
    pub players: usize,
    pub total_minutes: i64,
    pub total_games: i64,
    pub average_age: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlayerFilter {
    All,
    Named(String),
}

/// Distinct non-empty player names, sorted.
pub fn unique_players(records: &[PlayerRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.player.is_empty())
        .map(|r| r.player.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn unique_seasons(records: &[PlayerRecord]) -> Vec<String> {
    records
        .iter()
        .filter(|r| !r.season.is_empty())
        .map(|r| r.season.clone())
        .collect::<BTreeSet<_>>()
        .into_iter()
        .collect()
}

pub fn total_for_player(records: &[PlayerRecord], name: &str, field: StatField) -> i64 {
    records
        .iter()
        .filter(|r| r.player == name)
        .map(|r| r.stat(field))
        .fold(0i64, i64::saturating_add)
}

pub fn player_total_games(records: &[PlayerRecord], name: &str) -> i64 {
    total_for_player(records, name, StatField::Games)
}

pub fn player_total_minutes(records: &[PlayerRecord], name: &str) -> i64 {
    total_for_player(records, name, StatField::Minutes)
}

/// Season rows for one player, in input order.
pub fn player_seasons<'a>(records: &'a [PlayerRecord], name: &str) -> Vec<&'a PlayerRecord> {
    records.iter().filter(|r| r.player == name).collect()
}

pub fn filter_by_player<'a>(
    records: &'a [PlayerRecord],
    filter: &PlayerFilter,
) -> Vec<&'a PlayerRecord> {
    match filter {
        PlayerFilter::All => records.iter().collect(),
        PlayerFilter::Named(name) => player_seasons(records, name),
    }
}

/// Row count per non-empty position, largest first. Equal counts keep the
/// order in which the position first appeared.
pub fn position_distribution(records: &[PlayerRecord]) -> Vec<(String, usize)> {
    let keyed = records
        .iter()
        .filter(|r| !r.position.is_empty())
        .map(|r| (r.position.as_str(), 1i64));
    ranked_by_first_seen(keyed)
        .into_iter()
        .map(|(position, count)| (position, count as usize))
        .collect()
}

/// Percentage share of each position, for pie rendering.
pub fn position_share(distribution: &[(String, usize)]) -> Vec<(String, f64)> {
    let total: usize = distribution.iter().map(|(_, count)| count).sum();
    if total == 0 {
        return Vec::new();
    }
    distribution
        .iter()
        .map(|(position, count)| (position.clone(), *count as f64 * 100.0 / total as f64))
        .collect()
}

pub fn age_distribution(records: &[PlayerRecord]) -> AgeDistribution {
    let mut dist = AgeDistribution::default();
    for record in records {
        dist.counts[age_bucket(record.stat(StatField::Age))] += 1;
    }
    dist
}

fn age_bucket(age: i64) -> usize {
    match age {
        a if a < 20 => 0,
        a if a < 24 => 1,
        a if a < 28 => 2,
        a if a < 32 => 3,
        _ => 4,
    }
}

pub fn top_n_by_minutes(records: &[PlayerRecord], n: usize) -> Vec<(String, i64)> {
    top_n_by_field(records, StatField::Minutes, n)
}

/// Per-player totals of `field`, highest first, truncated to `n`. Equal totals
/// keep first-seen player order.
pub fn top_n_by_field(records: &[PlayerRecord], field: StatField, n: usize) -> Vec<(String, i64)> {
    let keyed = records
        .iter()
        .filter(|r| !r.player.is_empty())
        .map(|r| (r.player.as_str(), r.stat(field)));
    let mut ranked = ranked_by_first_seen(keyed);
    ranked.truncate(n);
    ranked
}

/// Sum values per key and sort descending by sum. The sort is stable over
/// first-seen order, which makes it the tie-break.
fn ranked_by_first_seen<'a>(items: impl Iterator<Item = (&'a str, i64)>) -> Vec<(String, i64)> {
    let mut slots: HashMap<&'a str, usize> = HashMap::new();
    let mut out: Vec<(String, i64)> = Vec::new();
    for (key, value) in items {
        let idx = *slots.entry(key).or_insert_with(|| {
            out.push((key.to_string(), 0));
            out.len() - 1
        });
        out[idx].1 = out[idx].1.saturating_add(value);
    }
    out.sort_by(|a, b| b.1.cmp(&a.1));
    out
}

/// Mean parsed age over every row (blank age counts as 0), rounded half-up to
/// one decimal. `None` when there are no rows.
pub fn average_age(records: &[PlayerRecord]) -> Option<f64> {
    if records.is_empty() {
        return None;
    }
    let total: i64 = records
        .iter()
        .map(|r| r.stat(StatField::Age))
        .fold(0i64, i64::saturating_add);
    let mean = total as f64 / records.len() as f64;
    Some(round_one_decimal(mean))
}

fn round_one_decimal(value: f64) -> f64 {
    (value * 10.0 + 0.5).floor() / 10.0
}

/// Headline numbers for the overview cards. `players` counts distinct names
/// including blank ones, matching a plain set over the rows.
pub fn squad_totals(records: &[PlayerRecord]) -> SquadTotals {
    let players = records
        .iter()
        .map(|r| r.player.as_str())
        .collect::<BTreeSet<_>>()
        .len();
    let sum = |field| {
        records
            .iter()
            .map(|r| r.stat(field))
            .fold(0i64, i64::saturating_add)
    };
    SquadTotals {
        players,
        total_minutes: sum(StatField::Minutes),
        total_games: sum(StatField::Games),
        average_age: average_age(records),
    }
}
