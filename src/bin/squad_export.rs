use std::path::Path;

use anyhow::{Context, Result};
use env_logger::Env;

use squad_pulse::aggregate::{PlayerFilter, filter_by_player};
use squad_pulse::config::{DashboardConfig, flag_value};
use squad_pulse::dataset;
use squad_pulse::export;

fn main() -> Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();

    let args = std::env::args().skip(1).collect::<Vec<_>>();
    let config = DashboardConfig::from_env().with_args(&args);
    let loaded = dataset::load(&config.source, config.http_timeout_secs)
        .with_context(|| format!("load squad from {}", config.source.label()))?;

    let selection = match flag_value(&args, "player") {
        Some(name) => PlayerFilter::Named(name),
        None => PlayerFilter::All,
    };
    let records: Vec<_> = filter_by_player(&loaded, &selection)
        .into_iter()
        .cloned()
        .collect();
    if let PlayerFilter::Named(name) = &selection {
        println!("Player: {name} ({} of {} rows)", records.len(), loaded.len());
    }

    if let Some(csv_path) = flag_value(&args, "csv") {
        let rows = export::export_csv(Path::new(&csv_path), &records)?;
        println!("CSV: {csv_path} ({rows} rows)");
    }

    let side = dataset::load_side_tables(&config.tables);
    let report = export::export_workbook_with_side(
        &config.export_path,
        &records,
        &side,
        config.recovery_window_days,
        config.top_n,
    )?;
    println!("Workbook: {}", config.export_path.display());
    println!("Rows: {}", report.records);
    println!("Players: {}", report.players);
    println!("Positions: {}", report.positions);
    println!("Top rows: {}", report.top_rows);
    println!("Sheets: {}", report.sheets);

    Ok(())
}
