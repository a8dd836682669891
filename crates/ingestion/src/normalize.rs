//! Raw feed record normalization.
//!
//! A pure mapping from the feed's field names onto the canonical warning
//! record. Each canonical field has an explicit ordered list of source-key
//! aliases; the first key holding a non-empty value wins. Nothing here
//! touches the network or the store.

use chrono::{DateTime, NaiveDateTime, TimeZone, Utc};
use serde_json::{Map, Value};
use tracing::debug;

use alert_common::Warning;

use crate::error::{IngestError, Result};

/// Source-key aliases per canonical field, in precedence order.
///
/// The stable identifier has appeared under three different names across
/// feed revisions; the remaining fields have been stable.
const STABLE_ID_KEYS: &[&str] = &["id", "symbol", "uuid"];
const TITLE_KEYS: &[&str] = &["nazwa_zdarzenia"];
const LEVEL_KEYS: &[&str] = &["stopien"];
const PROBABILITY_KEYS: &[&str] = &["prawdopodobienstwo"];
const START_KEYS: &[&str] = &["obowiazuje_od"];
const END_KEYS: &[&str] = &["obowiazuje_do"];
const PUBLISHED_KEYS: &[&str] = &["opublikowano"];
const DESCRIPTION_KEYS: &[&str] = &["tresc"];
const COMMENT_KEYS: &[&str] = &["komentarz"];
const OFFICE_KEYS: &[&str] = &["biuro"];
const AREA_KEYS: &[&str] = &["teryt"];

/// Normalize one raw feed record into a canonical warning.
///
/// Fails only when the record is not a JSON object; unparsable or missing
/// fields degrade to their null/default values and the full raw payload is
/// preserved in `raw`.
pub fn normalize(raw: &Value) -> Result<Warning> {
    let record = raw.as_object().ok_or(IngestError::NotAnObject)?;

    Ok(Warning {
        stable_id: string_field(record, STABLE_ID_KEYS),
        title: string_field(record, TITLE_KEYS).unwrap_or_default(),
        level: string_field(record, LEVEL_KEYS),
        probability: probability_field(record, PROBABILITY_KEYS),
        start: timestamp_field(record, START_KEYS),
        end: timestamp_field(record, END_KEYS),
        published: timestamp_field(record, PUBLISHED_KEYS),
        description: string_field(record, DESCRIPTION_KEYS),
        comment: string_field(record, COMMENT_KEYS).unwrap_or_default(),
        office: string_field(record, OFFICE_KEYS).unwrap_or_default(),
        area_codes: area_codes_field(record, AREA_KEYS),
        raw: raw.clone(),
    })
}

/// First non-empty value among the aliased keys.
fn first_value<'a>(record: &'a Map<String, Value>, keys: &[&str]) -> Option<&'a Value> {
    keys.iter()
        .filter_map(|key| record.get(*key))
        .find(|value| !is_empty(value))
}

fn is_empty(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::String(s) => s.is_empty(),
        _ => false,
    }
}

fn string_field(record: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    match first_value(record, keys)? {
        Value::String(s) => Some(s.clone()),
        // Some feed revisions serve numeric identifiers
        Value::Number(n) => Some(n.to_string()),
        other => {
            debug!(keys = ?keys, value = %other, "Ignoring non-string field value");
            None
        }
    }
}

fn timestamp_field(record: &Map<String, Value>, keys: &[&str]) -> Option<DateTime<Utc>> {
    let value = first_value(record, keys)?;
    let text = value.as_str()?;
    let parsed = parse_feed_timestamp(text);
    if parsed.is_none() {
        debug!(keys = ?keys, value = %text, "Ignoring unparsable timestamp");
    }
    parsed
}

/// Parse a feed timestamp.
///
/// The feed has served RFC 3339 as well as unzoned `YYYY-MM-DD HH:MM:SS`
/// and `YYYY-MM-DDTHH:MM:SS` strings; unzoned values are taken as UTC.
pub fn parse_feed_timestamp(s: &str) -> Option<DateTime<Utc>> {
    if let Ok(dt) = DateTime::parse_from_rfc3339(s) {
        return Some(dt.with_timezone(&Utc));
    }

    for format in ["%Y-%m-%dT%H:%M:%S", "%Y-%m-%d %H:%M:%S"] {
        if let Ok(ndt) = NaiveDateTime::parse_from_str(s, format) {
            return Some(Utc.from_utc_datetime(&ndt));
        }
    }

    None
}

/// Probability in percent, clamped into [0, 100]; anything unparsable is 0.
fn probability_field(record: &Map<String, Value>, keys: &[&str]) -> i16 {
    let parsed = match first_value(record, keys) {
        Some(Value::Number(n)) => n.as_f64(),
        Some(Value::String(s)) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(p) => (p.round() as i64).clamp(0, 100) as i16,
        None => 0,
    }
}

/// Area codes: an array of code strings, or a single code string.
fn area_codes_field(record: &Map<String, Value>, keys: &[&str]) -> Vec<String> {
    match first_value(record, keys) {
        Some(Value::Array(values)) => values
            .iter()
            .filter_map(|value| value.as_str().map(str::to_string))
            .collect(),
        Some(Value::String(code)) => vec![code.clone()],
        _ => Vec::new(),
    }
}
