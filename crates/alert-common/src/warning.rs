//! Canonical weather warning records.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// A normalized warning record as produced by ingestion.
///
/// Optional fields are absent when the source record did not carry them (or
/// carried something unparsable); `raw` always preserves the full original
/// payload for audit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Warning {
    /// Source-assigned identifier, unique across fetches when present.
    pub stable_id: Option<String>,
    pub title: String,
    pub level: Option<String>,
    /// Occurrence probability in percent, [0, 100].
    pub probability: i16,
    pub start: Option<DateTime<Utc>>,
    pub end: Option<DateTime<Utc>>,
    pub published: Option<DateTime<Utc>>,
    pub description: Option<String>,
    pub comment: String,
    pub office: String,
    /// Region classification codes this warning applies to, in feed order.
    pub area_codes: Vec<String>,
    /// Untouched original feed record.
    pub raw: serde_json::Value,
}

impl Warning {
    /// The stable id, if it is actually usable as a matching key.
    ///
    /// The feed serializes missing ids as the literal string "None"; those
    /// and empty strings fall through to the (title, start) fallback key.
    pub fn usable_stable_id(&self) -> Option<&str> {
        match self.stable_id.as_deref() {
            Some(id) if !id.is_empty() && id != "None" => Some(id),
            _ => None,
        }
    }
}

/// A warning as held in the durable store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StoredWarning {
    /// Store row key.
    pub id: i64,
    #[serde(flatten)]
    pub record: Warning,
    /// Last successful write time, refreshed on every upsert.
    pub fetched_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn warning_with_id(stable_id: Option<&str>) -> Warning {
        Warning {
            stable_id: stable_id.map(str::to_string),
            title: "Silny wiatr".to_string(),
            level: Some("2".to_string()),
            probability: 80,
            start: None,
            end: None,
            published: None,
            description: None,
            comment: "".to_string(),
            office: "".to_string(),
            area_codes: vec![],
            raw: serde_json::Value::Null,
        }
    }

    #[test]
    fn test_usable_stable_id() {
        assert_eq!(
            warning_with_id(Some("abc-1")).usable_stable_id(),
            Some("abc-1")
        );
        assert_eq!(warning_with_id(Some("None")).usable_stable_id(), None);
        assert_eq!(warning_with_id(Some("")).usable_stable_id(), None);
        assert_eq!(warning_with_id(None).usable_stable_id(), None);
    }

    #[test]
    fn test_stored_warning_serializes_flat() {
        let stored = StoredWarning {
            id: 7,
            record: warning_with_id(Some("abc-1")),
            fetched_at: Utc::now(),
        };
        let json = serde_json::to_value(&stored).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["stable_id"], "abc-1");
        assert_eq!(json["title"], "Silny wiatr");
        assert!(json.get("record").is_none());
    }
}
