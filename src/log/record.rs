/// One accepted request: the normalized path and its latency.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LogRecord {
    pub path: String,
    pub latency_ms: u64,
}

/// What the parser made of a single line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineOutcome {
    Record(LogRecord),
    /// The line does not have the access-log shape (or uses another method).
    Malformed,
    /// The line parsed but falls outside the configured time window.
    OutsideWindow,
}

impl LineOutcome {
    pub fn into_record(self) -> Option<LogRecord> {
        match self {
            LineOutcome::Record(r) => Some(r),
            LineOutcome::Malformed | LineOutcome::OutsideWindow => None,
        }
    }
}
