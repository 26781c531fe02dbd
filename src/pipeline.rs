//! One pass over the log: parse, group, rank.

use crate::Result;
use crate::log::{LineOutcome, LineParser, PathMap, TimeWindow};
use crate::model::{self, Metric, RankedEntry};
use anyhow::Context;
use serde::Serialize;
use std::io::{self, BufRead};
use tracing::debug;

/// Everything the core needs for a run, already validated.
#[derive(Clone, Default)]
pub struct RunConfig {
    pub window: TimeWindow,
    pub path_map: Option<PathMap>,
    pub num_results: usize,
    /// Enables the filtered-average ranking: paths with more calls than this.
    pub min_calls: Option<usize>,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunSummary {
    pub lines_read: usize,
    pub accepted: usize,
    pub malformed: usize,
    pub outside_window: usize,
    pub distinct_paths: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Report {
    pub by_total: Vec<RankedEntry>,
    pub by_max: Vec<RankedEntry>,
    pub by_average: Vec<RankedEntry>,
    /// Present only when `min_calls` was configured.
    pub by_average_filtered: Option<FilteredRanking>,
    pub summary: RunSummary,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FilteredRanking {
    pub min_calls: usize,
    pub entries: Vec<RankedEntry>,
}

/// Split a reader into lines, decoding invalid UTF-8 lossily.
///
/// Only genuine read failures surface as errors.
pub fn lossy_lines<R: BufRead>(reader: R) -> impl Iterator<Item = io::Result<String>> {
    reader.split(b'\n').map(|chunk| {
        chunk.map(|bytes| {
            let bytes = bytes.strip_suffix(b"\r").unwrap_or(&bytes);
            String::from_utf8_lossy(bytes).into_owned()
        })
    })
}

/// Run the whole pipeline over `lines`.
///
/// Lines are consumed lazily. The first read error aborts the run.
pub fn run<I>(lines: I, config: &RunConfig) -> Result<Report>
where
    I: IntoIterator<Item = io::Result<String>>,
{
    let parser = LineParser::new(config.window, config.path_map.clone())?;

    let mut summary = RunSummary::default();
    let mut read_error: Option<io::Error> = None;

    let records = lines.into_iter().map_while(|line| match line {
        Ok(line) => {
            summary.lines_read += 1;
            let outcome = parser.classify(&line);
            match outcome {
                LineOutcome::Record(_) => summary.accepted += 1,
                LineOutcome::Malformed => summary.malformed += 1,
                LineOutcome::OutsideWindow => summary.outside_window += 1,
            }
            Some(outcome.into_record())
        }
        Err(e) => {
            read_error = Some(e);
            None
        }
    });
    let data = model::condense(records);

    if let Some(e) = read_error {
        return Err(e).with_context(|| format!("read log after line {}", summary.lines_read));
    }

    summary.distinct_paths = data.len();
    debug!(?summary, "log condensed");

    let limit = config.num_results;
    Ok(Report {
        by_total: model::rank(&data, Metric::Total, limit, None),
        by_max: model::rank(&data, Metric::Max, limit, None),
        by_average: model::rank(&data, Metric::Average, limit, None),
        by_average_filtered: config.min_calls.map(|min_calls| FilteredRanking {
            min_calls,
            entries: model::rank(&data, Metric::Average, limit, Some(min_calls)),
        }),
        summary,
    })
}
