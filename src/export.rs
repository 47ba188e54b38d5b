use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::Local;
use log::info;
use rust_xlsxwriter::{Workbook, Worksheet};

use crate::aggregate::{
    age_distribution, player_total_games, player_total_minutes, position_distribution,
    position_share, squad_totals, top_n_by_minutes, unique_players, unique_seasons,
};
use crate::config::DEFAULT_RECOVERY_WINDOW_DAYS;
use crate::country::{UNKNOWN_COUNTRY, flag_url, resolve_country_code};
use crate::dataset::{RECORD_COLUMNS, SideData, record_cells, records_to_csv};
use crate::priority::TrackingStatus;
use crate::records::PlayerRecord;
use crate::state::PerformanceData;

const FLAG_WIDTH: u16 = 80;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExportReport {
    pub records: usize,
    pub players: usize,
    pub positions: usize,
    pub top_rows: usize,
    pub sheets: usize,
}

/// Write the squad workbook: raw rows plus one sheet per derived view.
pub fn export_workbook(path: &Path, records: &[PlayerRecord], top_n: usize) -> Result<ExportReport> {
    export_workbook_with_side(
        path,
        records,
        &SideData::default(),
        DEFAULT_RECOVERY_WINDOW_DAYS,
        top_n,
    )
}

/// Squad workbook plus Load, WeeklyLoad, Recovery and Priorities sheets for
/// whichever side tables have rows.
pub fn export_workbook_with_side(
    path: &Path,
    records: &[PlayerRecord],
    side: &SideData,
    recovery_window_days: i64,
    top_n: usize,
) -> Result<ExportReport> {
    let mut records_rows = vec![RECORD_COLUMNS.iter().map(|c| c.to_string()).collect::<Vec<_>>()];
    records_rows.extend(
        records
            .iter()
            .map(|r| record_cells(r).iter().map(|c| c.to_string()).collect()),
    );

    let players = unique_players(records);
    let mut player_rows = vec![vec![
        "Player".to_string(),
        "Country".to_string(),
        "Flag".to_string(),
        "Games".to_string(),
        "Minutes".to_string(),
    ]];
    player_rows.extend(players.iter().map(|name| player_row(records, name)));

    let positions = position_distribution(records);
    let mut position_rows = vec![vec![
        "Position".to_string(),
        "Count".to_string(),
        "Share %".to_string(),
    ]];
    position_rows.extend(
        positions
            .iter()
            .zip(position_share(&positions))
            .map(|((position, count), (_, share))| {
                vec![position.clone(), count.to_string(), format!("{share:.1}")]
            }),
    );

    let ages = age_distribution(records);
    let mut age_rows = vec![vec!["Age Group".to_string(), "Count".to_string()]];
    age_rows.extend(
        ages.buckets()
            .map(|(label, count)| vec![label.to_string(), count.to_string()]),
    );

    let top = top_n_by_minutes(records, top_n);
    let mut top_rows = vec![vec![
        "Rank".to_string(),
        "Player".to_string(),
        "Minutes".to_string(),
    ]];
    top_rows.extend(
        top.iter()
            .enumerate()
            .map(|(idx, (player, minutes))| {
                vec![(idx + 1).to_string(), player.clone(), minutes.to_string()]
            }),
    );

    let totals = squad_totals(records);
    let summary_rows = vec![
        vec!["Generated".to_string(), Local::now().format("%Y-%m-%d %H:%M").to_string()],
        vec!["Players".to_string(), totals.players.to_string()],
        vec!["Seasons".to_string(), unique_seasons(records).join(", ")],
        vec!["Total Minutes".to_string(), totals.total_minutes.to_string()],
        vec!["Total Games".to_string(), totals.total_games.to_string()],
        vec![
            "Average Age".to_string(),
            totals
                .average_age
                .map(|a| format!("{a:.1}"))
                .unwrap_or_else(|| "-".to_string()),
        ],
    ];

    let mut sheets: Vec<(&str, Vec<Vec<String>>)> = vec![
        ("Summary", summary_rows),
        ("Records", records_rows),
        ("Totals", player_rows),
        ("Positions", position_rows),
        ("Ages", age_rows),
        ("TopMinutes", top_rows),
    ];
    sheets.extend(performance_sheets(side, recovery_window_days));

    let mut workbook = Workbook::new();
    for (name, rows) in &sheets {
        let sheet = workbook.add_worksheet();
        sheet.set_name(*name)?;
        write_rows(sheet, rows)?;
    }

    workbook
        .save(path)
        .with_context(|| format!("save workbook {}", path.display()))?;
    info!("wrote workbook {}", path.display());

    Ok(ExportReport {
        records: records.len(),
        players: players.len(),
        positions: positions.len(),
        top_rows: top.len(),
        sheets: sheets.len(),
    })
}

pub fn export_csv(path: &Path, records: &[PlayerRecord]) -> Result<usize> {
    let body = records_to_csv(records)?;
    fs::write(path, body).with_context(|| format!("write {}", path.display()))?;
    info!("wrote {} rows to {}", records.len(), path.display());
    Ok(records.len())
}

fn player_row(records: &[PlayerRecord], name: &str) -> Vec<String> {
    let nationality = records
        .iter()
        .find(|r| r.player == name)
        .map(|r| r.nationality.as_str())
        .unwrap_or_default();
    let code = resolve_country_code(nationality);
    let flag = if code == UNKNOWN_COUNTRY {
        String::new()
    } else {
        flag_url(&code, FLAG_WIDTH)
    };
    vec![
        name.to_string(),
        code,
        flag,
        player_total_games(records, name).to_string(),
        player_total_minutes(records, name).to_string(),
    ]
}

fn performance_sheets(side: &SideData, window_days: i64) -> Vec<(&'static str, Vec<Vec<String>>)> {
    let perf = PerformanceData::from_side(side, window_days);
    let mut sheets = Vec::new();

    if !side.gps.is_empty() {
        let mut load_rows = vec![
            [
                "Date", "Opposition", "Season", "Distance", "Sprint Distance", "HI Minutes",
                "Peak Speed",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>(),
        ];
        load_rows.extend(side.gps.iter().map(|s| {
            vec![
                s.date.clone(),
                s.opposition_code.clone(),
                s.season.clone(),
                format!("{:.1}", s.distance),
                format!("{:.1}", s.sprint_distance()),
                format!("{:.1}", s.high_intensity_minutes()),
                format!("{:.1}", s.peak_speed),
            ]
        }));
        sheets.push(("Load", load_rows));

        let mut weekly_rows = vec![vec![
            "Week".to_string(),
            "Sessions".to_string(),
            "Distance".to_string(),
        ]];
        weekly_rows.extend(perf.weekly.iter().map(|w| {
            vec![w.week.clone(), w.sessions.to_string(), format!("{:.1}", w.distance)]
        }));
        sheets.push(("WeeklyLoad", weekly_rows));
    }

    if perf.recovery_days > 0 {
        let avg = perf.recovery;
        let mut recovery_rows = vec![vec![
            format!("Last {window_days} days"),
            "Score".to_string(),
        ]];
        recovery_rows.extend(
            [
                ("Overall", avg.overall),
                ("Sleep", avg.sleep),
                ("Soreness", avg.soreness),
                ("Subjective", avg.subjective),
                ("Bio", avg.bio),
            ]
            .into_iter()
            .map(|(label, score)| vec![label.to_string(), format!("{score:.1}")]),
        );
        sheets.push(("Recovery", recovery_rows));
    }

    if perf.progress.total > 0 {
        let mut priority_rows = vec![
            [
                "Priority", "Category", "Area", "Target", "Performance Type", "Target set",
                "Review Date", "Tracking",
            ]
            .iter()
            .map(|h| h.to_string())
            .collect::<Vec<_>>(),
        ];
        priority_rows.extend(perf.priorities.iter().map(|a| {
            vec![
                a.priority.clone(),
                a.category.clone(),
                a.area.clone(),
                a.target.clone(),
                a.performance_type.clone(),
                a.target_set.clone(),
                a.review_date.clone(),
                a.tracking.clone(),
            ]
        }));
        priority_rows.push(Vec::new());
        priority_rows.extend(TrackingStatus::ALL.iter().map(|status| {
            vec![
                status.label().to_string(),
                perf.progress.counts.get(*status).to_string(),
                format!("{:.1}%", perf.progress.percent(*status)),
            ]
        }));
        sheets.push(("Priorities", priority_rows));
    }

    sheets
}

fn write_rows(worksheet: &mut Worksheet, rows: &[Vec<String>]) -> Result<()> {
    for (row_idx, row) in rows.iter().enumerate() {
        for (col_idx, value) in row.iter().enumerate() {
            worksheet
                .write_string(row_idx as u32, col_idx as u16, value)
                .with_context(|| format!("write cell ({row_idx},{col_idx})"))?;
        }
    }
    Ok(())
}
