//! JSON envelopes printed by the report commands.

use anyhow::Result;
use chrono::{DateTime, Utc};
use chrono_tz::Europe::Amsterdam;
use chrono_tz::Tz;
use serde::Serialize;

/// Reports are pure functions of the book; the run timestamp lives here.
#[derive(Debug, Serialize)]
pub struct Envelope<T: Serialize> {
    pub generated_at: String,
    #[serde(flatten)]
    pub body: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn new(body: T) -> Self {
        Self { generated_at: now_local().to_rfc3339(), body }
    }
}

/// Local wall clock used for default periods.
pub fn now_local() -> DateTime<Tz> {
    Utc::now().with_timezone(&Amsterdam)
}

pub fn print_json<T: Serialize>(body: T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(&Envelope::new(body))?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Serialize)]
    struct Body {
        total: u32,
    }

    #[test]
    fn test_envelope_flattens_body() {
        let value = serde_json::to_value(Envelope::new(Body { total: 3 })).unwrap();
        assert_eq!(value["total"], 3);
        let stamp = value["generated_at"].as_str().unwrap();
        assert!(chrono::DateTime::parse_from_rfc3339(stamp).is_ok());
    }
}
