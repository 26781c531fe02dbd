//! Access log parsing: line shape, time window and path normalization.

pub mod parse;
pub mod record;
pub mod window;

pub use parse::{LineParser, PathMap, normalize_path};
pub use record::{LineOutcome, LogRecord};
pub use window::TimeWindow;
