use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result, anyhow};
use csv::{ReaderBuilder, StringRecord, Trim, WriterBuilder};
use log::{debug, info, warn};
use reqwest::header::CONTENT_TYPE;
use serde_json::Value;

use crate::config::{DataSource, SideTables};
use crate::http_client::http_client;
use crate::load::GpsSession;
use crate::mock_roster;
use crate::priority::PriorityArea;
use crate::records::PlayerRecord;
use crate::recovery::RecoveryDay;

pub const RECORD_COLUMNS: [&str; 9] = [
    "season",
    "player",
    "nationality",
    "position",
    "age",
    "games",
    "games_starts",
    "minutes",
    "minutes_90s",
];

/// Load records from the configured source, or an empty squad if anything
/// goes wrong. Callers render "no data" instead of failing.
pub fn load_or_empty(source: &DataSource, timeout_secs: u64) -> Vec<PlayerRecord> {
    match load(source, timeout_secs) {
        Ok(records) => records,
        Err(err) => {
            warn!("squad data unavailable: {err:#}");
            Vec::new()
        }
    }
}

pub fn load(source: &DataSource, timeout_secs: u64) -> Result<Vec<PlayerRecord>> {
    let records = match source {
        DataSource::File(path) => load_file(path)?,
        DataSource::Url(url) => fetch_url(url, timeout_secs)?,
        DataSource::Mock {
            seed,
            players,
            seasons,
        } => mock_roster::generate(*seed, *players, *seasons),
    };
    info!("loaded {} player-season rows", records.len());
    Ok(records)
}

/// How a body of tabular text is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BodyFormat {
    Csv,
    Json,
}

impl BodyFormat {
    /// JSON for any `application/json` media type (parameters such as
    /// `charset` are ignored), CSV otherwise, including a missing header.
    pub fn from_content_type(content_type: Option<&str>) -> Self {
        let is_json = content_type
            .and_then(|v| v.split(';').next())
            .is_some_and(|media| media.trim().eq_ignore_ascii_case("application/json"));
        if is_json { BodyFormat::Json } else { BodyFormat::Csv }
    }

    /// JSON for a `.json` extension, CSV otherwise.
    pub fn from_path(path: &Path) -> Self {
        let is_json = path
            .extension()
            .and_then(|ext| ext.to_str())
            .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));
        if is_json { BodyFormat::Json } else { BodyFormat::Csv }
    }
}

pub fn load_file(path: &Path) -> Result<Vec<PlayerRecord>> {
    load_table(path, record_from_lookup)
}

/// Fetch a squad table over HTTP and parse it according to its content type.
pub fn fetch_url(url: &str, timeout_secs: u64) -> Result<Vec<PlayerRecord>> {
    let client = http_client(timeout_secs)?;
    debug!("fetching squad data from {url}");
    let resp = client
        .get(url)
        .send()
        .with_context(|| format!("request {url}"))?;
    let status = resp.status();
    if !status.is_success() {
        return Err(anyhow!("fetch {url} failed: {status}"));
    }
    let content_type = resp
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);
    let body = resp.text().context("read response body")?;
    parse_body(content_type.as_deref(), &body)
}

/// Parse a fetched body: JSON rows for an `application/json` content type,
/// CSV for anything else or no content type at all.
pub fn parse_body(content_type: Option<&str>, body: &str) -> Result<Vec<PlayerRecord>> {
    let format = BodyFormat::from_content_type(content_type);
    debug!("{format:?} body, {} bytes", body.len());
    parse_table(body, format, record_from_lookup)
}

/// Parse a header-first CSV squad table. Header names are matched
/// case-insensitively; unknown columns are ignored and missing ones default.
pub fn parse_csv_records(raw: &str) -> Result<Vec<PlayerRecord>> {
    parse_csv_rows(raw, record_from_lookup)
}

/// Parse a JSON array of row objects. Values may be strings or numbers;
/// `null` counts as missing. `null` for the whole document is an empty squad.
pub fn parse_json_records(raw: &str) -> Result<Vec<PlayerRecord>> {
    parse_json_rows(raw, record_from_lookup)
}

pub fn load_gps_file(path: &Path) -> Result<Vec<GpsSession>> {
    load_table(path, GpsSession::from_lookup)
}

pub fn load_recovery_file(path: &Path) -> Result<Vec<RecoveryDay>> {
    load_table(path, RecoveryDay::from_lookup)
}

pub fn load_priority_file(path: &Path) -> Result<Vec<PriorityArea>> {
    load_table(path, PriorityArea::from_lookup)
}

/// Load an optional side table (GPS, wellness, priorities). No path, or a
/// file that fails to load, yields an empty table with a warning.
pub fn load_optional<T>(
    path: Option<&Path>,
    what: &str,
    load: impl Fn(&Path) -> Result<Vec<T>>,
) -> Vec<T> {
    let Some(path) = path else {
        return Vec::new();
    };
    match load(path) {
        Ok(rows) => {
            info!("loaded {} {what} rows from {}", rows.len(), path.display());
            rows
        }
        Err(err) => {
            warn!("{what} data unavailable: {err:#}");
            Vec::new()
        }
    }
}

/// GPS sessions, wellness days and priority areas loaded from [`SideTables`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SideData {
    pub gps: Vec<GpsSession>,
    pub recovery: Vec<RecoveryDay>,
    pub priority: Vec<PriorityArea>,
}

pub fn load_side_tables(tables: &SideTables) -> SideData {
    SideData {
        gps: load_optional(tables.gps.as_deref(), "gps", load_gps_file),
        recovery: load_optional(tables.recovery.as_deref(), "recovery", load_recovery_file),
        priority: load_optional(tables.priority.as_deref(), "priority", load_priority_file),
    }
}

/// Read a table file, CSV or JSON by extension, building one `T` per row.
pub fn load_table<T>(path: &Path, build: impl Fn(Lookup<'_>) -> T) -> Result<Vec<T>> {
    let raw = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_table(&raw, BodyFormat::from_path(path), build)
        .with_context(|| format!("parse {}", path.display()))
}

/// Column lookup handed to row builders: lower-cased header name to cell text.
pub type Lookup<'a> = &'a dyn Fn(&str) -> Option<String>;

pub fn parse_table<T>(
    raw: &str,
    format: BodyFormat,
    build: impl Fn(Lookup<'_>) -> T,
) -> Result<Vec<T>> {
    match format {
        BodyFormat::Csv => parse_csv_rows(raw, build),
        BodyFormat::Json => parse_json_rows(raw, build),
    }
}

/// Header-first CSV. Blank rows are skipped and short rows are allowed.
pub fn parse_csv_rows<T>(raw: &str, build: impl Fn(Lookup<'_>) -> T) -> Result<Vec<T>> {
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(Trim::All)
        .from_reader(raw.as_bytes());

    let headers = reader.headers().context("read csv header")?.clone();
    let columns: HashMap<String, usize> = headers
        .iter()
        .enumerate()
        .map(|(idx, name)| (name.trim().to_lowercase(), idx))
        .collect();

    let mut out = Vec::new();
    for (line, row) in reader.records().enumerate() {
        let row = row.with_context(|| format!("csv row {}", line + 2))?;
        if row.iter().all(|cell| cell.trim().is_empty()) {
            continue;
        }
        out.push(build(&|name: &str| csv_cell(&row, &columns, name)));
    }
    Ok(out)
}

fn csv_cell(row: &StringRecord, columns: &HashMap<String, usize>, name: &str) -> Option<String> {
    columns
        .get(name)
        .and_then(|idx| row.get(*idx))
        .map(str::to_string)
}

/// JSON array of objects, keys matched lower-cased. A `null` document is an
/// empty table.
pub fn parse_json_rows<T>(raw: &str, build: impl Fn(Lookup<'_>) -> T) -> Result<Vec<T>> {
    let value: Value = serde_json::from_str(raw).context("invalid json")?;
    let rows = match value {
        Value::Null => return Ok(Vec::new()),
        Value::Array(rows) => rows,
        other => return Err(anyhow!("expected an array of rows, got {}", json_kind(&other))),
    };

    let mut out = Vec::with_capacity(rows.len());
    for (idx, row) in rows.iter().enumerate() {
        let Some(obj) = row.as_object() else {
            return Err(anyhow!("row {idx} is {}, expected object", json_kind(row)));
        };
        let lowered: HashMap<String, &Value> =
            obj.iter().map(|(k, v)| (k.trim().to_lowercase(), v)).collect();
        out.push(build(&|name: &str| {
            lowered.get(name).and_then(|v| json_text(v))
        }));
    }
    Ok(out)
}

fn json_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

fn record_from_lookup(get: Lookup<'_>) -> PlayerRecord {
    let text = |name: &str| get(name).unwrap_or_default();
    PlayerRecord {
        season: text("season"),
        player: text("player"),
        nationality: text("nationality"),
        position: text("position"),
        age: text("age"),
        games: text("games"),
        games_starts: text("games_starts"),
        minutes: text("minutes"),
        minutes_90s: text("minutes_90s"),
    }
    .normalized()
}

pub fn records_to_csv(records: &[PlayerRecord]) -> Result<String> {
    let mut writer = WriterBuilder::new().from_writer(Vec::new());
    writer
        .write_record(RECORD_COLUMNS)
        .context("write csv header")?;
    for record in records {
        writer
            .write_record(record_cells(record))
            .with_context(|| format!("write csv row for {}", record.player))?;
    }
    let bytes = writer
        .into_inner()
        .map_err(|err| anyhow!("flush csv: {err}"))?;
    String::from_utf8(bytes).context("csv output is not utf-8")
}

pub fn record_cells(record: &PlayerRecord) -> [&str; 9] {
    [
        &record.season,
        &record.player,
        &record.nationality,
        &record.position,
        &record.age,
        &record.games,
        &record.games_starts,
        &record.minutes,
        &record.minutes_90s,
    ]
}
