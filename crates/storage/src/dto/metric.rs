use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

use super::common::{check_page, default_page, default_per_page};
use crate::models::{MetricRecord, SessionType, Sport, SportStats};

/// Request payload for recording one session
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct CreateMetricRequest {
    pub session_date: NaiveDate,

    #[serde(default)]
    pub session_type: SessionType,

    #[validate(length(max = 255))]
    pub opponent: Option<String>,

    #[validate(length(max = 2000))]
    pub notes: Option<String>,

    #[validate(custom(function = "validate_stats"))]
    pub stats: SportStats,
}

#[derive(Debug, Clone, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct MetricFilter {
    pub sport: Option<Sport>,
    pub session_type: Option<SessionType>,
    pub from: Option<NaiveDate>,
    pub to: Option<NaiveDate>,
    #[serde(default = "default_page")]
    pub page: u32,
    #[serde(default = "default_per_page")]
    pub per_page: u32,
}

impl Default for MetricFilter {
    fn default() -> Self {
        Self {
            sport: None,
            session_type: None,
            from: None,
            to: None,
            page: default_page(),
            per_page: default_per_page(),
        }
    }
}

impl MetricFilter {
    pub fn validate(&self) -> Result<(), String> {
        check_page(self.page, self.per_page)?;

        if let (Some(from), Some(to)) = (self.from, self.to)
            && from > to
        {
            return Err("from must not be after to".to_string());
        }

        Ok(())
    }

    pub fn offset(&self) -> i64 {
        i64::from(self.page.saturating_sub(1)) * i64::from(self.per_page)
    }

    pub fn limit(&self) -> i64 {
        i64::from(self.per_page)
    }
}

/// A stored session plus its derived percentages
#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct MetricRecordResponse {
    #[serde(flatten)]
    pub record: MetricRecord,
    #[schema(value_type = Object)]
    pub derived: BTreeMap<&'static str, f64>,
}

impl From<MetricRecord> for MetricRecordResponse {
    fn from(record: MetricRecord) -> Self {
        let derived = record.stats.derived_ratios();
        Self { record, derived }
    }
}

fn validate_stats(stats: &SportStats) -> Result<(), ValidationError> {
    let inconsistent = stats.inconsistencies();
    if inconsistent.is_empty() {
        return Ok(());
    }

    let mut err = ValidationError::new("made_exceeds_attempted");
    err.message = Some(format!("Made exceeds attempted for: {}", inconsistent.join(", ")).into());
    Err(err)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_inconsistent_stats_fail_validation() {
        let req: CreateMetricRequest = serde_json::from_value(serde_json::json!({
            "session_date": "2025-03-02",
            "stats": {
                "sport": "soccer",
                "passes_completed": 41,
                "passes_attempted": 40
            }
        }))
        .unwrap();

        assert_eq!(req.session_type, SessionType::Game);
        assert!(req.validate().is_err());
    }

    #[test]
    fn test_filter_bounds() {
        let mut filter = MetricFilter::default();
        assert!(filter.validate().is_ok());
        assert_eq!(filter.offset(), 0);

        filter.page = 3;
        filter.per_page = 20;
        assert_eq!(filter.offset(), 40);

        filter.from = NaiveDate::from_ymd_opt(2025, 5, 1);
        filter.to = NaiveDate::from_ymd_opt(2025, 4, 1);
        assert!(filter.validate().is_err());
    }
}
