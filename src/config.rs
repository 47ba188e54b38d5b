use std::env;
use std::path::PathBuf;

pub const DEFAULT_MOCK_SEED: u64 = 7;
pub const DEFAULT_TOP_N: usize = 5;
pub const DEFAULT_EXPORT_PATH: &str = "squad_export.xlsx";
pub const DEFAULT_RECOVERY_WINDOW_DAYS: i64 = 7;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DataSource {
    File(PathBuf),
    Url(String),
    Mock {
        seed: u64,
        players: usize,
        seasons: usize,
    },
}

impl DataSource {
    pub fn label(&self) -> String {
        match self {
            DataSource::File(path) => path.display().to_string(),
            DataSource::Url(url) => url.clone(),
            DataSource::Mock { seed, .. } => format!("mock (seed {seed})"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DashboardConfig {
    pub source: DataSource,
    pub top_n: usize,
    pub http_timeout_secs: u64,
    pub export_path: PathBuf,
    pub tables: SideTables,
    pub recovery_window_days: i64,
}

/// Optional performance-staff tables shown next to the squad data.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SideTables {
    pub gps: Option<PathBuf>,
    pub recovery: Option<PathBuf>,
    pub priority: Option<PathBuf>,
}

impl DashboardConfig {
    /// Reads `.env.local` / `.env` first, then the environment. A data path
    /// wins over a URL; with neither set the seeded mock roster is used.
    pub fn from_env() -> Self {
        let _ = dotenvy::from_filename(".env.local");
        let _ = dotenvy::from_filename(".env");

        let source = if let Some(path) = opt_env("SQUAD_DATA_PATH") {
            DataSource::File(PathBuf::from(path))
        } else if let Some(url) = opt_env("SQUAD_DATA_URL") {
            DataSource::Url(url)
        } else {
            DataSource::Mock {
                seed: env_parse("SQUAD_MOCK_SEED").unwrap_or(DEFAULT_MOCK_SEED),
                players: env_parse("SQUAD_MOCK_PLAYERS").unwrap_or(24).clamp(1, 200),
                seasons: env_parse("SQUAD_MOCK_SEASONS").unwrap_or(5).clamp(1, 20),
            }
        };

        Self {
            source,
            top_n: env_parse("SQUAD_TOP_N")
                .unwrap_or(DEFAULT_TOP_N)
                .clamp(1, 50),
            http_timeout_secs: env_parse("SQUAD_HTTP_TIMEOUT_SECS").unwrap_or(10).max(1),
            export_path: opt_env("SQUAD_EXPORT_PATH")
                .map(PathBuf::from)
                .unwrap_or_else(|| PathBuf::from(DEFAULT_EXPORT_PATH)),
            tables: SideTables {
                gps: opt_env("SQUAD_GPS_PATH").map(PathBuf::from),
                recovery: opt_env("SQUAD_RECOVERY_PATH").map(PathBuf::from),
                priority: opt_env("SQUAD_PRIORITY_PATH").map(PathBuf::from),
            },
            recovery_window_days: env_parse("SQUAD_RECOVERY_WINDOW_DAYS")
                .unwrap_or(DEFAULT_RECOVERY_WINDOW_DAYS)
                .clamp(1, 365),
        }
    }

    /// Apply command-line overrides (`--data`, `--url`, `--out`, `--top`,
    /// `--gps`, `--recovery`, `--priority`, `--window`).
    pub fn with_args(mut self, args: &[String]) -> Self {
        if let Some(path) = flag_value(args, "data") {
            self.source = DataSource::File(PathBuf::from(path));
        } else if let Some(url) = flag_value(args, "url") {
            self.source = DataSource::Url(url);
        }
        if let Some(out) = flag_value(args, "out") {
            self.export_path = PathBuf::from(out);
        }
        if let Some(n) = flag_value(args, "top").and_then(|v| v.parse::<usize>().ok()) {
            self.top_n = n.clamp(1, 50);
        }
        if let Some(path) = flag_value(args, "gps") {
            self.tables.gps = Some(PathBuf::from(path));
        }
        if let Some(path) = flag_value(args, "recovery") {
            self.tables.recovery = Some(PathBuf::from(path));
        }
        if let Some(path) = flag_value(args, "priority") {
            self.tables.priority = Some(PathBuf::from(path));
        }
        if let Some(days) = flag_value(args, "window").and_then(|v| v.parse::<i64>().ok()) {
            self.recovery_window_days = days.clamp(1, 365);
        }
        self
    }
}

fn opt_env(name: &str) -> Option<String> {
    env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

fn env_parse<T: std::str::FromStr>(name: &str) -> Option<T> {
    opt_env(name).and_then(|v| v.parse::<T>().ok())
}

/// Accepts both `--name=value` and `--name value`.
pub fn flag_value(args: &[String], name: &str) -> Option<String> {
    let long = format!("--{name}");
    let prefix = format!("--{name}=");
    for (idx, arg) in args.iter().enumerate() {
        if let Some(value) = arg.strip_prefix(&prefix) {
            let trimmed = value.trim();
            if !trimmed.is_empty() {
                return Some(trimmed.to_string());
            }
        }
        if *arg == long {
            let Some(next) = args.get(idx + 1) else {
                continue;
            };
            if !next.trim().is_empty() {
                return Some(next.trim().to_string());
            }
        }
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    fn args(raw: &[&str]) -> Vec<String> {
        raw.iter().map(|s| s.to_string()).collect()
    }

    #[test]
    fn flag_value_forms() {
        assert_eq!(
            flag_value(&args(&["--data=squad.csv"]), "data").as_deref(),
            Some("squad.csv")
        );
        assert_eq!(
            flag_value(&args(&["--out", "report.xlsx"]), "out").as_deref(),
            Some("report.xlsx")
        );
        assert_eq!(flag_value(&args(&["--out"]), "out"), None);
        assert_eq!(flag_value(&args(&["--data="]), "data"), None);
    }

    #[test]
    fn args_override_source() {
        let cfg = DashboardConfig {
            source: DataSource::Mock {
                seed: 1,
                players: 3,
                seasons: 1,
            },
            top_n: 5,
            http_timeout_secs: 10,
            export_path: PathBuf::from(DEFAULT_EXPORT_PATH),
            tables: SideTables::default(),
            recovery_window_days: DEFAULT_RECOVERY_WINDOW_DAYS,
        }
        .with_args(&args(&[
            "--url",
            "https://example.com/squad.csv",
            "--top=80",
            "--gps",
            "data/gps.csv",
            "--window=0",
        ]));
        assert_eq!(
            cfg.source,
            DataSource::Url("https://example.com/squad.csv".to_string())
        );
        assert_eq!(cfg.top_n, 50);
        assert_eq!(cfg.export_path, PathBuf::from(DEFAULT_EXPORT_PATH));
        assert_eq!(cfg.tables.gps, Some(PathBuf::from("data/gps.csv")));
        assert_eq!(cfg.tables.recovery, None);
        assert_eq!(cfg.recovery_window_days, 1);
    }
}
