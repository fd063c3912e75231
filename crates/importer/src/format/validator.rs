use super::models::{FORMAT_VERSION, MetricImportFile};
use crate::{ImporterError, Result};
use chrono::NaiveDate;
use std::collections::HashSet;
use storage::models::Sport;
use tracing::warn;
use validator::Validate;

pub struct MetricFileValidator;

impl MetricFileValidator {
    /// Checks a file before anything is written.
    ///
    /// `athlete_sport` is the sport on the athlete's profile when it is known
    /// (it is not during a dry run); records of any other sport are errors.
    /// Without it, the file must at least be single-sport.
    pub fn validate(
        file: &MetricImportFile,
        athlete_sport: Option<Sport>,
        today: NaiveDate,
    ) -> Result<ValidationReport> {
        let mut report = ValidationReport::default();

        if file.format_version != FORMAT_VERSION {
            report.errors.push(format!(
                "Unsupported format version: {}. Expected {}",
                file.format_version, FORMAT_VERSION
            ));
        }

        if file.source.trim().is_empty() {
            report.warnings.push("Source is not specified".to_string());
        }

        if file.records.is_empty() {
            report
                .errors
                .push("At least one record is required".to_string());
        }

        let file_sports: HashSet<Sport> = file.records.iter().map(|r| r.stats.sport()).collect();
        if athlete_sport.is_none() && file_sports.len() > 1 {
            report
                .errors
                .push("Records mix more than one sport".to_string());
        }

        let mut seen_dates = HashSet::new();
        for (idx, record) in file.records.iter().enumerate() {
            let label = format!("Record {} ({})", idx + 1, record.session_date);

            if let Some(expected) = athlete_sport
                && record.stats.sport() != expected
            {
                report.errors.push(format!(
                    "{}: stats are for {} but the athlete plays {}",
                    label,
                    record.stats.sport(),
                    expected
                ));
            }

            // Stats consistency is reported per counter pair below.
            if let Err(errors) = record.to_request().validate() {
                let mut fields: Vec<&str> = errors
                    .field_errors()
                    .into_keys()
                    .filter(|field| *field != "stats")
                    .collect();
                fields.sort_unstable();
                for field in fields {
                    report
                        .errors
                        .push(format!("{}: {} is out of bounds", label, field));
                }
            }

            for field in record.stats.inconsistencies() {
                report
                    .errors
                    .push(format!("{}: made exceeds attempted for {}", label, field));
            }

            if record.session_date > today {
                report
                    .warnings
                    .push(format!("{}: session date is in the future", label));
            }

            if !seen_dates.insert(record.session_date) {
                report
                    .warnings
                    .push(format!("{}: another record has the same date", label));
            }
        }

        if !report.errors.is_empty() {
            Err(ImporterError::ValidationError(format!(
                "Validation failed with {} error(s): {}",
                report.errors.len(),
                report.errors.join("; ")
            )))
        } else {
            Ok(report)
        }
    }
}

#[derive(Debug, Default)]
pub struct ValidationReport {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl ValidationReport {
    pub fn log_warnings(&self) {
        for warning in &self.warnings {
            warn!("  {}", warning);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::format::models::ImportRecord;
    use storage::models::{BasketballStats, SessionType, SoccerStats, SportStats};
    use uuid::Uuid;

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn record(day: u32, stats: SportStats) -> ImportRecord {
        ImportRecord {
            session_date: NaiveDate::from_ymd_opt(2025, 5, day).unwrap(),
            session_type: SessionType::Game,
            opponent: None,
            notes: None,
            stats,
        }
    }

    fn basketball(points: u32) -> SportStats {
        SportStats::Basketball(BasketballStats {
            points,
            ..Default::default()
        })
    }

    fn file(records: Vec<ImportRecord>) -> MetricImportFile {
        MetricImportFile {
            format_version: FORMAT_VERSION.to_string(),
            athlete_id: Uuid::new_v4(),
            source: "league-export".to_string(),
            records,
        }
    }

    #[test]
    fn test_valid_file_has_no_warnings() {
        let f = file(vec![record(1, basketball(20)), record(3, basketball(12))]);
        let report = MetricFileValidator::validate(&f, Some(Sport::Basketball), today()).unwrap();
        assert!(report.errors.is_empty());
        assert!(report.warnings.is_empty());
    }

    #[test]
    fn test_unknown_version_and_empty_records_fail() {
        let mut f = file(Vec::new());
        f.format_version = "0.9.0".to_string();

        let err = MetricFileValidator::validate(&f, None, today()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("2 error(s)"));
        assert!(message.contains("Unsupported format version"));
    }

    #[test]
    fn test_made_exceeding_attempted_fails() {
        let stats = SportStats::Basketball(BasketballStats {
            field_goals_made: 9,
            field_goals_attempted: 4,
            ..Default::default()
        });
        let f = file(vec![record(1, stats)]);

        let err = MetricFileValidator::validate(&f, Some(Sport::Basketball), today()).unwrap_err();
        assert!(err.to_string().contains("made exceeds attempted"));
    }

    #[test]
    fn test_overlong_text_fields_fail_before_writing() {
        let mut long_opponent = record(1, basketball(10));
        long_opponent.opponent = Some("x".repeat(256));
        let mut long_notes = record(2, basketball(12));
        long_notes.notes = Some("n".repeat(2001));
        let f = file(vec![long_opponent, long_notes]);

        let err = MetricFileValidator::validate(&f, Some(Sport::Basketball), today()).unwrap_err();
        let message = err.to_string();
        assert!(message.contains("2 error(s)"));
        assert!(message.contains("Record 1 (2025-05-01): opponent is out of bounds"));
        assert!(message.contains("Record 2 (2025-05-02): notes is out of bounds"));
    }

    #[test]
    fn test_inconsistent_stats_are_reported_once() {
        let stats = SportStats::Basketball(BasketballStats {
            free_throws_made: 5,
            free_throws_attempted: 2,
            ..Default::default()
        });
        let f = file(vec![record(1, stats)]);

        let err = MetricFileValidator::validate(&f, Some(Sport::Basketball), today()).unwrap_err();
        assert!(err.to_string().contains("1 error(s)"));
    }

    #[test]
    fn test_sport_mismatch_with_profile_fails() {
        let soccer = SportStats::Soccer(SoccerStats::default());
        let f = file(vec![record(1, soccer)]);

        let err = MetricFileValidator::validate(&f, Some(Sport::Basketball), today()).unwrap_err();
        assert!(err.to_string().contains("athlete plays basketball"));
    }

    #[test]
    fn test_mixed_sports_fail_without_profile() {
        let f = file(vec![
            record(1, basketball(10)),
            record(2, SportStats::Soccer(SoccerStats::default())),
        ]);

        assert!(MetricFileValidator::validate(&f, None, today()).is_err());
    }

    #[test]
    fn test_future_and_duplicate_dates_warn() {
        let mut future = record(1, basketball(8));
        future.session_date = NaiveDate::from_ymd_opt(2025, 7, 4).unwrap();
        let f = file(vec![record(2, basketball(10)), record(2, basketball(14)), future]);

        let report = MetricFileValidator::validate(&f, Some(Sport::Basketball), today()).unwrap();
        assert_eq!(report.warnings.len(), 2);
        assert!(report.warnings[0].contains("same date"));
        assert!(report.warnings[1].contains("future"));
    }
}
