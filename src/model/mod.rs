//! Aggregation model: group latencies by path, then rank paths.

use crate::log::LogRecord;
use indexmap::IndexMap;
use serde::Serialize;

/// Latencies per normalized path, keyed in order of first appearance.
///
/// Every key holds at least one latency.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GroupedData {
    paths: IndexMap<String, Vec<u64>>,
}

impl GroupedData {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, record: LogRecord) {
        self.paths
            .entry(record.path)
            .or_default()
            .push(record.latency_ms);
    }

    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    pub fn get(&self, path: &str) -> Option<&[u64]> {
        self.paths.get(path).map(Vec::as_slice)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &[u64])> {
        self.paths.iter().map(|(p, l)| (p.as_str(), l.as_slice()))
    }
}

impl FromIterator<LogRecord> for GroupedData {
    fn from_iter<I: IntoIterator<Item = LogRecord>>(iter: I) -> Self {
        let mut data = GroupedData::new();
        for record in iter {
            data.push(record);
        }
        data
    }
}

/// Group a stream of parsed lines; `None` entries are skipped lines.
pub fn condense<I>(records: I) -> GroupedData
where
    I: IntoIterator<Item = Option<LogRecord>>,
{
    records.into_iter().flatten().collect()
}

/// Per-path aggregate a ranking is ordered by.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Metric {
    Total,
    Max,
    Average,
}

/// Sum, max and count of one path's latencies, computed in one pass.
///
/// The sum is kept in `u128`; adding `u64` latencies to it cannot overflow.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
struct PathStats {
    total: u128,
    max: u64,
    calls: usize,
}

impl PathStats {
    fn of(latencies: &[u64]) -> Self {
        latencies.iter().fold(
            PathStats {
                total: 0,
                max: 0,
                calls: 0,
            },
            |acc, &ms| PathStats {
                total: acc.total + u128::from(ms),
                max: acc.max.max(ms),
                calls: acc.calls + 1,
            },
        )
    }

    fn mean(&self) -> f64 {
        if self.calls == 0 {
            return 0.0;
        }
        self.total as f64 / self.calls as f64
    }

    fn metric(&self, metric: Metric) -> f64 {
        match metric {
            Metric::Total => self.total as f64,
            Metric::Max => self.max as f64,
            Metric::Average => self.mean(),
        }
    }
}

/// One row of a ranking. Carries all of the path's stats so the row can be
/// printed without going back to the grouped data.
///
/// `total_ms` saturates at `u64::MAX`; `metric` and `avg_ms` use the exact sum.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RankedEntry {
    pub path: String,
    pub metric: f64,
    pub call_count: usize,
    pub total_ms: u64,
    pub max_ms: u64,
    pub avg_ms: f64,
}

impl RankedEntry {
    fn new(path: &str, latencies: &[u64], metric: Metric) -> Self {
        let stats = PathStats::of(latencies);
        Self {
            path: path.to_string(),
            metric: stats.metric(metric),
            call_count: stats.calls,
            total_ms: u64::try_from(stats.total).unwrap_or(u64::MAX),
            max_ms: stats.max,
            avg_ms: stats.mean(),
        }
    }
}

/// Rank paths by `metric`, highest first. Equal metrics keep first-seen order.
///
/// With `min_calls`, only paths with strictly more calls are kept and `limit`
/// is ignored; otherwise the result is capped at `limit`.
pub fn rank(
    data: &GroupedData,
    metric: Metric,
    limit: usize,
    min_calls: Option<usize>,
) -> Vec<RankedEntry> {
    let mut entries: Vec<RankedEntry> = data
        .iter()
        .filter(|(_, latencies)| min_calls.is_none_or(|min| latencies.len() > min))
        .map(|(path, latencies)| RankedEntry::new(path, latencies, metric))
        .collect();

    // sort_by is stable, so ties stay in insertion order.
    entries.sort_by(|a, b| b.metric.total_cmp(&a.metric));

    if min_calls.is_none() {
        entries.truncate(limit);
    }
    entries
}
