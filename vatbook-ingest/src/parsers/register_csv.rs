//! CSV register exports: one header row, then one invoice per row. Column
//! names are matched against the same aliases as JSON entries.

use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result};
use serde_json::{Map, Value};

use crate::types::{RegisterEntry, SourceRecord};

/// Parse a CSV register export from any reader.
pub fn parse_register_csv_reader<R: Read>(reader: R) -> Result<Vec<SourceRecord>> {
    let mut rdr = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let headers = rdr.headers().context("read CSV header row")?.clone();
    let mut out = Vec::new();

    for (i, result) in rdr.records().enumerate() {
        // header is line 1
        let record = result.with_context(|| format!("read CSV row {}", i + 2))?;
        if record.iter().all(|cell| cell.is_empty()) {
            continue;
        }
        let fields: Map<String, Value> = headers
            .iter()
            .zip(record.iter())
            .map(|(h, cell)| (h.to_string(), Value::String(cell.to_string())))
            .collect();
        out.push(SourceRecord::Entry(RegisterEntry::from_fields(&fields)));
    }

    Ok(out)
}

/// Parse a CSV register export file.
pub fn parse_register_csv(path: impl AsRef<Path>) -> Result<Vec<SourceRecord>> {
    let path = path.as_ref();
    let file = std::fs::File::open(path).with_context(|| format!("opening {}", path.display()))?;
    parse_register_csv_reader(file).with_context(|| format!("parsing {}", path.display()))
}
