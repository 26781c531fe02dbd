use crate::log::record::{LineOutcome, LogRecord};
use crate::log::window::{TimeWindow, parse_log_timestamp};
use regex::Regex;
use std::fmt;
use std::sync::Arc;
use tracing::warn;

/// Path rewrite applied after normalization, already resolved by the caller.
pub type PathMap = Arc<dyn Fn(&str) -> String + Send + Sync>;

// Capture:
// 1) timestamp: "Mon Jan 02 15:04:05 2024", brackets optional
// 2) method: GET or POST only
// 3) path: no whitespace
// 4) latency in msecs
const ACCESS_LINE_RE: &str = concat!(
    r"^(?:.*\s)?\[?([A-Z][a-z]{2} [A-Z][a-z]{2} +\d{1,2} \d{2}:\d{2}:\d{2} \d{4})\]?",
    r" (GET|POST) (\S+)(?: .*)? in (\d+) msecs",
);

/// Turns raw access-log lines into [`LogRecord`]s.
pub struct LineParser {
    re: Regex,
    window: TimeWindow,
    path_map: Option<PathMap>,
}

impl fmt::Debug for LineParser {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LineParser")
            .field("window", &self.window)
            .field("path_map", &self.path_map.is_some())
            .finish()
    }
}

impl LineParser {
    pub fn new(window: TimeWindow, path_map: Option<PathMap>) -> anyhow::Result<Self> {
        Ok(Self {
            re: Regex::new(ACCESS_LINE_RE)?,
            window,
            path_map,
        })
    }

    /// Parse one line, returning `None` for anything that should be skipped.
    pub fn parse_line(&self, line: &str) -> Option<LogRecord> {
        self.classify(line).into_record()
    }

    /// Like [`LineParser::parse_line`], but says why a line was skipped.
    pub fn classify(&self, line: &str) -> LineOutcome {
        let line = line.trim_end_matches(['\r', '\n']);

        let Some(caps) = self.re.captures(line) else {
            warn!(line = line.trim(), "can't parse line");
            return LineOutcome::Malformed;
        };

        let (_, [timestamp, _method, raw_path, latency]) = caps.extract();

        let Ok(latency_ms) = latency.parse::<u64>() else {
            warn!(line = line.trim(), latency, "latency out of range");
            return LineOutcome::Malformed;
        };

        if !self.window.is_unbounded() {
            let Some(ts) = parse_log_timestamp(timestamp) else {
                warn!(line = line.trim(), timestamp, "bad timestamp");
                return LineOutcome::Malformed;
            };
            if !self.window.contains(ts) {
                return LineOutcome::OutsideWindow;
            }
        }

        let mut path = normalize_path(raw_path).to_string();
        if let Some(map) = &self.path_map {
            path = map(&path);
        }

        LineOutcome::Record(LogRecord { path, latency_ms })
    }
}

/// Drop the query string, then at most one trailing `/`.
///
/// `/` becomes the empty string.
pub fn normalize_path(raw: &str) -> &str {
    let path = raw.split_once('?').map_or(raw, |(p, _)| p);
    path.strip_suffix('/').unwrap_or(path)
}
