use crate::Result;
use crate::format::{models::MetricImportFile, validator::MetricFileValidator};
use crate::traits::RecordSink;
use chrono::NaiveDate;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ImportOutcome {
    pub records_read: usize,
    pub records_written: usize,
    pub warnings: Vec<String>,
}

pub async fn load_file(path: &Path) -> Result<MetricImportFile> {
    let json_content = tokio::fs::read_to_string(path).await?;
    Ok(serde_json::from_str(&json_content)?)
}

/// Validates the file against the athlete's profile and hands it to the sink.
pub async fn import_file(
    file: &MetricImportFile,
    sink: &dyn RecordSink,
    today: NaiveDate,
) -> Result<ImportOutcome> {
    let athlete_sport = sink.athlete_sport(file.athlete_id).await?;

    let report = MetricFileValidator::validate(file, athlete_sport, today)?;
    report.log_warnings();

    let requests: Vec<_> = file.records.iter().map(|r| r.to_request()).collect();
    let records_written = sink.write(file.athlete_id, &requests).await?;

    tracing::info!(
        athlete_id = %file.athlete_id,
        source = %file.source,
        records = requests.len(),
        records_written,
        "Import processed"
    );

    Ok(ImportOutcome {
        records_read: requests.len(),
        records_written,
        warnings: report.warnings,
    })
}
