//! Report rendering: numbered text tables or a JSON document.

pub mod json;
pub mod locale;
pub mod text;

pub use json::render_json_report;
pub use locale::NumberFormat;
pub use text::render_text_report;
