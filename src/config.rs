//! Run configuration: command-line flags, optionally layered over a JSON file.
//!
//! JSON shape (every field optional):
//! {
//!   "num_results": 30,
//!   "date_from": "2024-01-02", "time_from": "08:00:00",
//!   "date_to": "2024-01-03",   "time_to": "08:00:00",
//!   "locale": "en_US",
//!   "min_calls": 10,
//!   "path_map": "numeric-ids"
//! }
//!
//! Flags given on the command line win over the file.

use crate::Result;
use crate::log::TimeWindow;
use crate::pipeline::RunConfig;
use crate::remap;
use crate::render::NumberFormat;
use anyhow::Context;
use clap::{Args, ValueEnum};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

pub const DEFAULT_NUM_RESULTS: usize = 30;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

/// Report options shared by the command line and the config file.
#[derive(Debug, Clone, Default, Args)]
pub struct Options {
    /// Number of paths listed in each report.
    #[arg(long)]
    pub num_results: Option<usize>,

    /// Skip requests before this date (YYYY-MM-DD).
    #[arg(long)]
    pub date_from: Option<String>,

    /// Time of day for --date-from (HH:MM:SS). Requires --date-from.
    #[arg(long)]
    pub time_from: Option<String>,

    /// Skip requests after this date (YYYY-MM-DD).
    #[arg(long)]
    pub date_to: Option<String>,

    /// Time of day for --date-to (HH:MM:SS). Requires --date-to.
    #[arg(long)]
    pub time_to: Option<String>,

    /// Locale used to group digits in the text report, e.g. en_US.
    #[arg(long)]
    pub locale: Option<String>,

    /// Add an average report limited to paths with more than this many calls.
    #[arg(long, alias = "avg-calls-from")]
    pub min_calls: Option<usize>,

    /// Built-in path rewrite applied before grouping (see --list-path-maps).
    #[arg(long)]
    pub path_map: Option<String>,

    /// Read defaults from a JSON config file.
    #[arg(long)]
    pub config: Option<PathBuf>,

    #[arg(long, value_enum, default_value_t = OutputFormat::Text)]
    pub format: OutputFormat,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    pub num_results: Option<usize>,
    pub date_from: Option<String>,
    pub time_from: Option<String>,
    pub date_to: Option<String>,
    pub time_to: Option<String>,
    pub locale: Option<String>,
    pub min_calls: Option<usize>,
    pub path_map: Option<String>,
}

impl FileConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let text = fs::read_to_string(path)
            .with_context(|| format!("read config file {}", path.display()))?;
        serde_json::from_str(&text).with_context(|| format!("parse config file {}", path.display()))
    }
}

/// Validated settings for one invocation.
#[derive(Clone)]
pub struct Settings {
    pub run: RunConfig,
    pub numbers: NumberFormat,
    pub format: OutputFormat,
}

impl Options {
    /// Merge with the config file (if any) and validate everything up front.
    pub fn resolve(self) -> Result<Settings> {
        let file = match &self.config {
            Some(path) => FileConfig::load(path)?,
            None => FileConfig::default(),
        };
        self.merge(file)
    }

    fn merge(self, file: FileConfig) -> Result<Settings> {
        let date_from = self.date_from.or(file.date_from);
        let time_from = self.time_from.or(file.time_from);
        let date_to = self.date_to.or(file.date_to);
        let time_to = self.time_to.or(file.time_to);

        let window = TimeWindow::from_bounds(
            date_from.as_deref(),
            time_from.as_deref(),
            date_to.as_deref(),
            time_to.as_deref(),
        )?;

        let path_map = self
            .path_map
            .or(file.path_map)
            .map(|name| remap::resolve(&name))
            .transpose()?;

        let numbers = match self.locale.or(file.locale) {
            Some(name) => NumberFormat::for_locale(&name)?,
            None => NumberFormat::plain(),
        };

        Ok(Settings {
            run: RunConfig {
                window,
                path_map,
                num_results: self
                    .num_results
                    .or(file.num_results)
                    .unwrap_or(DEFAULT_NUM_RESULTS),
                min_calls: self.min_calls.or(file.min_calls),
            },
            numbers,
            format: self.format,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn defaults() {
        let s = Options::default().resolve().unwrap();
        assert_eq!(s.run.num_results, DEFAULT_NUM_RESULTS);
        assert_eq!(s.run.min_calls, None);
        assert!(s.run.window.is_unbounded());
        assert!(s.run.path_map.is_none());
        assert_eq!(s.numbers, NumberFormat::plain());
        assert_eq!(s.format, OutputFormat::Text);
    }

    #[test]
    fn flags_override_file() {
        let opts = Options {
            num_results: Some(5),
            date_from: Some("2024-02-01".to_string()),
            ..Options::default()
        };
        let file: FileConfig = serde_json::from_str(
            r#"{"num_results": 10, "date_from": "2024-01-01", "min_calls": 3, "locale": "de_DE"}"#,
        )
        .unwrap();
        let s = opts.merge(file).unwrap();
        assert_eq!(s.run.num_results, 5);
        assert_eq!(s.run.min_calls, Some(3));
        assert_eq!(
            s.run.window,
            TimeWindow::from_bounds(Some("2024-02-01"), None, None, None).unwrap()
        );
        assert_eq!(s.numbers.format(1000), "1.000");
    }

    #[test]
    fn time_from_file_pairs_with_date_from_flag() {
        let opts = Options {
            date_from: Some("2024-02-01".to_string()),
            ..Options::default()
        };
        let file: FileConfig = serde_json::from_str(r#"{"time_from": "12:30:00"}"#).unwrap();
        let s = opts.merge(file).unwrap();
        assert_eq!(
            s.run.window.from,
            TimeWindow::from_bounds(Some("2024-02-01"), Some("12:30:00"), None, None)
                .unwrap()
                .from
        );
    }

    #[test]
    fn unknown_file_fields_are_rejected() {
        assert!(serde_json::from_str::<FileConfig>(r#"{"num_result": 3}"#).is_err());
    }

    #[test]
    fn bad_values_fail_before_any_log_is_read() {
        let cases = [
            Options {
                time_to: Some("10:00:00".to_string()),
                ..Options::default()
            },
            Options {
                date_to: Some("yesterday".to_string()),
                ..Options::default()
            },
            Options {
                path_map: Some("app.paths.rename".to_string()),
                ..Options::default()
            },
            Options {
                locale: Some("tlh_KX".to_string()),
                ..Options::default()
            },
            Options {
                config: Some(PathBuf::from("/nonexistent/latency-profiler.json")),
                ..Options::default()
            },
        ];
        for opts in cases {
            assert!(opts.resolve().is_err());
        }
    }

    #[test]
    fn path_map_is_resolved() {
        let opts = Options {
            path_map: Some("numeric-ids".to_string()),
            ..Options::default()
        };
        let s = opts.resolve().unwrap();
        let map = s.run.path_map.unwrap();
        assert_eq!(map("/u/1"), "/u/:id");
    }
}
