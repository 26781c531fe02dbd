//! Time window applied to log timestamps.
//!
//! Bounds come from `YYYY-MM-DD` dates with an optional `HH:MM:SS` time. A
//! date without a time means midnight of that date. Both bounds are compared
//! strictly: a line exactly on a bound is kept.

use anyhow::{Context, bail};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, Weekday};

/// Format of the timestamp token in the access log, once brackets and the
/// weekday are gone.
const LOG_TIMESTAMP_FORMAT: &str = "%b %d %H:%M:%S %Y";
const DATE_FORMAT: &str = "%Y-%m-%d";
const TIME_FORMAT: &str = "%H:%M:%S";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TimeWindow {
    pub from: Option<NaiveDateTime>,
    pub to: Option<NaiveDateTime>,
}

impl TimeWindow {
    /// Build the window from the raw configuration strings.
    ///
    /// A time without its date is rejected rather than silently dropped.
    pub fn from_bounds(
        date_from: Option<&str>,
        time_from: Option<&str>,
        date_to: Option<&str>,
        time_to: Option<&str>,
    ) -> anyhow::Result<Self> {
        Ok(Self {
            from: parse_bound("from", date_from, time_from)?,
            to: parse_bound("to", date_to, time_to)?,
        })
    }

    pub fn is_unbounded(&self) -> bool {
        self.from.is_none() && self.to.is_none()
    }

    /// True when `ts` is neither strictly before `from` nor strictly after `to`.
    pub fn contains(&self, ts: NaiveDateTime) -> bool {
        if let Some(from) = self.from {
            if ts < from {
                return false;
            }
        }
        if let Some(to) = self.to {
            if ts > to {
                return false;
            }
        }
        true
    }
}

fn parse_bound(
    which: &str,
    date: Option<&str>,
    time: Option<&str>,
) -> anyhow::Result<Option<NaiveDateTime>> {
    let date = match (date, time) {
        (None, None) => return Ok(None),
        (None, Some(t)) => bail!("--time-{which} {t:?} given without --date-{which}"),
        (Some(d), _) => d,
    };

    let day = NaiveDate::parse_from_str(date.trim(), DATE_FORMAT)
        .with_context(|| format!("bad --date-{which} {date:?}, expected YYYY-MM-DD"))?;

    let at = match time {
        Some(t) => NaiveTime::parse_from_str(t.trim(), TIME_FORMAT)
            .with_context(|| format!("bad --time-{which} {t:?}, expected HH:MM:SS"))?,
        None => NaiveTime::default(),
    };

    Ok(Some(day.and_time(at)))
}

/// Parse a log timestamp such as `[Mon Jan 02 15:04:05 2024]`.
///
/// Brackets are optional and runs of spaces (`Jan  2`) are collapsed first.
/// The weekday must name a day but is not checked against the date.
pub fn parse_log_timestamp(token: &str) -> Option<NaiveDateTime> {
    let cleaned: String = token.replace(['[', ']'], "");
    let mut parts = cleaned.split_whitespace();
    parts.next()?.parse::<Weekday>().ok()?;
    let rest = parts.collect::<Vec<_>>().join(" ");
    NaiveDateTime::parse_from_str(&rest, LOG_TIMESTAMP_FORMAT).ok()
}
