use crate::pipeline::Report;

/// Render the report as pretty-printed JSON with raw numbers.
pub fn render_json_report(report: &Report) -> anyhow::Result<String> {
    Ok(serde_json::to_string_pretty(report)?)
}
