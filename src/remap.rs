//! Named path rewrites selectable with `--path-map`.
//!
//! Names are resolved once at startup; the parser only ever sees the
//! resulting [`PathMap`].

use crate::log::PathMap;
use anyhow::bail;
use std::sync::Arc;

/// Registry entries: name, description, function.
const BUILTINS: &[(&str, &str, fn(&str) -> String)] = &[
    ("identity", "leave paths unchanged", identity),
    ("lowercase", "ASCII-lowercase the path", lowercase),
    ("numeric-ids", "replace all-digit segments with :id", numeric_ids),
    ("uuid-ids", "replace UUID segments with :uuid", uuid_ids),
    ("first-segment", "keep only the first path segment", first_segment),
];

/// Look up a built-in rewrite by name.
pub fn resolve(name: &str) -> anyhow::Result<PathMap> {
    match BUILTINS.iter().find(|(n, _, _)| *n == name.trim()) {
        Some((_, _, f)) => Ok(Arc::new(*f)),
        None => bail!(
            "unknown path map function {:?}; known: {}",
            name,
            known_names().join(", ")
        ),
    }
}

pub fn known_names() -> Vec<&'static str> {
    BUILTINS.iter().map(|(n, _, _)| *n).collect()
}

/// Name and description of every built-in, for `--list-path-maps`.
pub fn describe() -> impl Iterator<Item = (&'static str, &'static str)> {
    BUILTINS.iter().map(|(n, d, _)| (*n, *d))
}

fn identity(path: &str) -> String {
    path.to_string()
}

fn lowercase(path: &str) -> String {
    path.to_ascii_lowercase()
}

fn numeric_ids(path: &str) -> String {
    map_segments(path, |seg| {
        if !seg.is_empty() && seg.bytes().all(|b| b.is_ascii_digit()) {
            ":id"
        } else {
            seg
        }
    })
}

fn uuid_ids(path: &str) -> String {
    map_segments(path, |seg| if is_uuid(seg) { ":uuid" } else { seg })
}

fn first_segment(path: &str) -> String {
    match path.strip_prefix('/') {
        Some(rest) => match rest.split_once('/') {
            Some((first, _)) => format!("/{first}"),
            None => path.to_string(),
        },
        None => path.split('/').next().unwrap_or_default().to_string(),
    }
}

fn map_segments<'a>(path: &'a str, f: impl Fn(&'a str) -> &'a str) -> String {
    path.split('/').map(f).collect::<Vec<_>>().join("/")
}

/// 8-4-4-4-12 hex digits.
fn is_uuid(seg: &str) -> bool {
    let groups: Vec<&str> = seg.split('-').collect();
    groups.len() == 5
        && groups
            .iter()
            .zip([8, 4, 4, 4, 12])
            .all(|(g, len)| g.len() == len && g.bytes().all(|b| b.is_ascii_hexdigit()))
}
