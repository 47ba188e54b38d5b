use anyhow::{Context, Result};
use env_logger::Env;
use serde::Serialize;

use squad_pulse::StatField;
use squad_pulse::aggregate::{
    AGE_BUCKET_LABELS, SquadTotals, age_distribution, position_distribution, squad_totals,
    top_n_by_field, unique_seasons,
};
use squad_pulse::config::{DashboardConfig, flag_value};
use squad_pulse::dataset;
use squad_pulse::load::{LoadSummary, WeeklyLoad};
use squad_pulse::priority::{PriorityProgress, StatusCounts, TrackingStatus};
use squad_pulse::recovery::RecoveryAverages;
use squad_pulse::state::PerformanceData;

#[derive(Debug, Serialize)]
struct Summary {
    source: String,
    rows: usize,
    seasons: Vec<String>,
    totals: SquadTotals,
    top_field: String,
    top: Vec<(String, i64)>,
    positions: Vec<(String, usize)>,
    ages: Vec<(&'static str, usize)>,
    load: Option<PerformanceLoad>,
    recovery: Option<PerformanceRecovery>,
    priorities: Option<PerformancePriorities>,
}

#[derive(Debug, Serialize)]
struct PerformanceLoad {
    summary: LoadSummary,
    weekly: Vec<WeeklyLoad>,
}

#[derive(Debug, Serialize)]
struct PerformanceRecovery {
    window_days: i64,
    days: usize,
    averages: RecoveryAverages,
}

#[derive(Debug, Serialize)]
struct PerformancePriorities {
    progress: PriorityProgress,
    by_category: Vec<(String, StatusCounts)>,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = DashboardConfig::from_env().with_args(&args);
    let field = match flag_value(&args, "field") {
        Some(raw) => raw.parse::<StatField>()?,
        None => StatField::Minutes,
    };
    let records = dataset::load(&config.source, config.http_timeout_secs)
        .with_context(|| format!("load squad from {}", config.source.label()))?;
    let side = dataset::load_side_tables(&config.tables);
    let perf = PerformanceData::from_side(&side, config.recovery_window_days);

    let ages = age_distribution(&records);
    let summary = Summary {
        source: config.source.label(),
        rows: records.len(),
        seasons: unique_seasons(&records),
        totals: squad_totals(&records),
        top_field: field.to_string(),
        top: top_n_by_field(&records, field, config.top_n),
        positions: position_distribution(&records),
        ages: AGE_BUCKET_LABELS.iter().copied().zip(ages.counts).collect(),
        load: (!side.gps.is_empty()).then(|| PerformanceLoad {
            summary: perf.load.clone(),
            weekly: perf.weekly.clone(),
        }),
        recovery: (perf.recovery_days > 0).then(|| PerformanceRecovery {
            window_days: perf.recovery_window_days,
            days: perf.recovery_days,
            averages: perf.recovery,
        }),
        priorities: (perf.progress.total > 0).then(|| PerformancePriorities {
            progress: perf.progress.clone(),
            by_category: perf.categories.clone(),
        }),
    };

    if args.iter().any(|a| a == "--json") {
        println!("{}", serde_json::to_string_pretty(&summary)?);
        return Ok(());
    }

    println!("Squad summary ({})", summary.source);
    println!("Rows: {}", summary.rows);
    if !summary.seasons.is_empty() {
        println!("Seasons: {}", summary.seasons.join(", "));
    }
    println!("Players: {}", summary.totals.players);
    println!("Total minutes: {}", summary.totals.total_minutes);
    println!("Total games: {}", summary.totals.total_games);
    match summary.totals.average_age {
        Some(age) => println!("Average age: {age:.1}"),
        None => println!("Average age: -"),
    }

    println!();
    println!("Top {} by {}:", config.top_n, summary.top_field);
    for (idx, (player, total)) in summary.top.iter().enumerate() {
        println!(" {:>2}. {player:<28} {total:>6}", idx + 1);
    }

    println!();
    println!("Positions:");
    for (position, count) in &summary.positions {
        println!(" - {position:<8} {count}");
    }

    println!();
    println!("Ages:");
    for (label, count) in &summary.ages {
        println!(" - {label:<8} {count}");
    }

    if let Some(load) = &summary.load {
        println!();
        println!(
            "GPS load: {} sessions, {:.1} km, sprint {:.0} m, {:.1} HI min, peak {:.1} km/h",
            load.summary.sessions,
            load.summary.total_distance / 1000.0,
            load.summary.sprint_distance,
            load.summary.high_intensity_minutes,
            load.summary.peak_speed
        );
        for week in &load.weekly {
            println!(" - {:<10} {:>3} sessions {:>9.1} m", week.week, week.sessions, week.distance);
        }
    }

    if let Some(recovery) = &summary.recovery {
        let avg = recovery.averages;
        println!();
        println!(
            "Recovery (last {} days, {} entries): overall {:.1}, sleep {:.1}, soreness {:.1}, subjective {:.1}, bio {:.1}",
            recovery.window_days,
            recovery.days,
            avg.overall,
            avg.sleep,
            avg.soreness,
            avg.subjective,
            avg.bio
        );
    }

    if let Some(priorities) = &summary.priorities {
        println!();
        println!("Priority areas: {}", priorities.progress.total);
        for status in TrackingStatus::ALL {
            println!(
                " - {:<12} {:>3} ({:.1}%)",
                status.label(),
                priorities.progress.counts.get(status),
                priorities.progress.percent(status)
            );
        }
        for (category, counts) in &priorities.by_category {
            println!(
                " * {category}: {} achieved, {} on track, {} behind, {} not started",
                counts.achieved, counts.on_track, counts.behind, counts.not_started
            );
        }
    }

    Ok(())
}
