//! Rank request paths in a uWSGI access log by total, max and average latency.
//!
//! The pipeline is: [`log::LineParser`] turns lines into records,
//! [`model::condense`] groups them by path and [`model::rank`] orders the
//! groups. [`pipeline::run`] ties the three together for one pass over a log.

pub mod config;
pub mod log;
pub mod logging;
pub mod model;
pub mod pipeline;
pub mod remap;
pub mod render;

pub type Result<T> = anyhow::Result<T>;
