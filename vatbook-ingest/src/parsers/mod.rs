pub mod register_csv;
pub mod register_json;

use std::path::Path;

use anyhow::{Context, Result};

use crate::types::SourceRecord;

pub use register_csv::{parse_register_csv, parse_register_csv_reader};
pub use register_json::parse_register_json;

/// Read a register export, choosing the parser by file extension
/// (`.csv` is CSV, anything else is JSON).
pub fn load_register_file(path: impl AsRef<Path>) -> Result<Vec<SourceRecord>> {
    let path = path.as_ref();
    let is_csv = path
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| e.eq_ignore_ascii_case("csv"));
    if is_csv {
        return parse_register_csv(path);
    }
    let text = std::fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    parse_register_json(&text).with_context(|| format!("parsing {}", path.display()))
}
