//! JSON register exports.
//!
//! Accepted shapes, alone or concatenated back to back:
//!   [ {entry}, {entry}, ... ]
//!   {entry}{entry}
//!   {"results": [{"status": "success", "file_name": "...", "register_entry": {entry}}, ...]}
//!
//! Spreadsheet tooling writes bare `NaN`/`Infinity` tokens, which are not
//! JSON; they are read as null.

use std::borrow::Cow;

use anyhow::{Context, Result};
use serde_json::{Deserializer, Value};

use crate::types::{RegisterEntry, SourceRecord};

const NON_FINITE: [&str; 3] = ["-Infinity", "Infinity", "NaN"];

/// Replace non-finite number tokens outside string literals with `null`.
fn sanitize_non_finite(text: &str) -> Cow<'_, str> {
    if !NON_FINITE.iter().any(|t| text.contains(t)) {
        return Cow::Borrowed(text);
    }

    let mut out = String::with_capacity(text.len());
    let mut in_string = false;
    let mut escaped = false;
    let mut rest = text;
    while let Some(c) = rest.chars().next() {
        if in_string {
            if escaped {
                escaped = false;
            } else if c == '\\' {
                escaped = true;
            } else if c == '"' {
                in_string = false;
            }
        } else if c == '"' {
            in_string = true;
        } else if let Some(token) = NON_FINITE.iter().find(|t| rest.starts_with(**t)) {
            out.push_str("null");
            rest = &rest[token.len()..];
            continue;
        }
        out.push(c);
        rest = &rest[c.len_utf8()..];
    }
    Cow::Owned(out)
}

/// Parse register JSON text into records, in document order.
pub fn parse_register_json(text: &str) -> Result<Vec<SourceRecord>> {
    let clean = sanitize_non_finite(text);
    let mut out = Vec::new();
    for (i, value) in Deserializer::from_str(&clean).into_iter::<Value>().enumerate() {
        let value = value.with_context(|| format!("parse JSON value #{}", i + 1))?;
        collect(value, &mut out);
    }
    Ok(out)
}

fn collect(value: Value, out: &mut Vec<SourceRecord>) {
    match value {
        Value::Array(items) => {
            for item in items {
                collect(item, out);
            }
        }
        Value::Object(obj) => match obj.get("results") {
            Some(Value::Array(results)) => {
                for result in results {
                    out.push(from_result(result));
                }
            }
            _ => out.push(SourceRecord::Entry(RegisterEntry::from_fields(&obj))),
        },
        other => out.push(SourceRecord::Rejected {
            file_name: None,
            reason: format!("expected an object, found {}", kind_of(&other)),
        }),
    }
}

/// One item of a `results` wrapper produced by the extraction step.
fn from_result(result: &Value) -> SourceRecord {
    let file_name = result
        .get("file_name")
        .and_then(Value::as_str)
        .map(str::to_string)
        .filter(|s| !s.is_empty());

    let status = result.get("status").and_then(Value::as_str).unwrap_or("");
    if status != "success" {
        return SourceRecord::Rejected {
            file_name,
            reason: format!("extraction status {:?}", status),
        };
    }

    match result.get("register_entry").and_then(Value::as_object) {
        Some(fields) if !fields.is_empty() => {
            let mut entry = RegisterEntry::from_fields(fields);
            if entry.file_name.is_none() {
                entry.file_name = file_name;
            }
            SourceRecord::Entry(entry)
        }
        _ => SourceRecord::Rejected {
            file_name,
            reason: "missing register_entry".to_string(),
        },
    }
}

fn kind_of(v: &Value) -> &'static str {
    match v {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
