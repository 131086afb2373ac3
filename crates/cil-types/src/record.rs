use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The domain record carried JSON-encoded in a block's `data.text` field.
///
/// Upstream intake services serialize the full report into the chain payload
/// so the log is self-contained; consumers decode it lazily and treat a
/// record that fails to parse as unavailable, never as a chain-integrity
/// fault. All fields except `id` and `title` default, matching the uneven
/// shapes observed from intake.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ReportRecord {
    pub id: String,
    #[serde(default)]
    pub userid: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub category: String,
    #[serde(default)]
    pub city: String,
    #[serde(default)]
    pub state: String,
    #[serde(default)]
    pub country: String,
    #[serde(default)]
    pub latitude: f64,
    #[serde(default)]
    pub longitude: f64,
    #[serde(default)]
    pub is_anonymous: bool,
    #[serde(default)]
    pub isapublicpost: bool,
    #[serde(default)]
    pub reporter_id: String,
    #[serde(default)]
    pub status: String,
    #[serde(default)]
    pub submitted_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn full_record_roundtrip() {
        let json = r#"{
            "id": "b7e2",
            "userid": "u1",
            "title": "stolen bicycle",
            "description": "taken from the rack overnight",
            "category": "theft",
            "city": "Springfield",
            "state": "IL",
            "country": "US",
            "latitude": 39.78,
            "longitude": -89.65,
            "is_anonymous": false,
            "isapublicpost": true,
            "reporter_id": "r9",
            "status": "submitted",
            "submitted_at": "2025-11-02T08:15:00Z"
        }"#;
        let record: ReportRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.title, "stolen bicycle");
        assert_eq!(record.category, "theft");
        assert!(record.submitted_at.is_some());

        let reencoded = serde_json::to_string(&record).unwrap();
        let again: ReportRecord = serde_json::from_str(&reencoded).unwrap();
        assert_eq!(record, again);
    }

    #[test]
    fn sparse_record_uses_defaults() {
        let record: ReportRecord =
            serde_json::from_str(r#"{"id":"x","title":"noise complaint"}"#).unwrap();
        assert_eq!(record.status, "");
        assert_eq!(record.latitude, 0.0);
        assert!(record.submitted_at.is_none());
        assert!(!record.is_anonymous);
    }

    #[test]
    fn missing_required_fields_fail() {
        assert!(serde_json::from_str::<ReportRecord>(r#"{"title":"no id"}"#).is_err());
    }
}
