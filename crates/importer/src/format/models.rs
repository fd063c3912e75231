use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use storage::{
    dto::metric::CreateMetricRequest,
    models::{SessionType, SportStats},
};
use uuid::Uuid;

pub const FORMAT_VERSION: &str = "1.0.0";

/// A file of sessions for one athlete, as exported by a stats source.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MetricImportFile {
    pub format_version: String,
    pub athlete_id: Uuid,
    pub source: String,
    pub records: Vec<ImportRecord>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ImportRecord {
    pub session_date: NaiveDate,
    #[serde(default)]
    pub session_type: SessionType,
    pub opponent: Option<String>,
    pub notes: Option<String>,
    pub stats: SportStats,
}

impl ImportRecord {
    pub fn to_request(&self) -> CreateMetricRequest {
        CreateMetricRequest {
            session_date: self.session_date,
            session_type: self.session_type,
            opponent: self.opponent.clone(),
            notes: self.notes.clone(),
            stats: self.stats.clone(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use storage::models::Sport;

    #[test]
    fn test_parse_import_file() {
        let file: MetricImportFile = serde_json::from_value(serde_json::json!({
            "format_version": "1.0.0",
            "athlete_id": "6f1c1b8e-3f4a-4a53-9a7e-1d2b3c4d5e6f",
            "source": "league-export",
            "records": [
                {
                    "session_date": "2025-02-14",
                    "opponent": "Ridgeview",
                    "stats": { "sport": "basketball", "points": 21, "rebounds": 7 }
                }
            ]
        }))
        .unwrap();

        assert_eq!(file.records.len(), 1);
        let record = &file.records[0];
        assert_eq!(record.session_type, SessionType::Game);
        assert_eq!(record.stats.sport(), Sport::Basketball);

        let req = record.to_request();
        assert_eq!(req.opponent.as_deref(), Some("Ridgeview"));
        assert_eq!(req.stats, record.stats);
    }
}
