use chrono::Utc;
use clap::{Parser, Subcommand};
use importer::{DryRunSink, ImporterError, PostgresSink, RecordSink, import_file, load_file};
use sqlx::postgres::PgPoolOptions;
use std::path::{Path, PathBuf};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(name = "metrics-import")]
#[command(about = "Athlete metric record importer", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Required unless --validate-only is given
    #[arg(long, env = "DATABASE_URL")]
    database_url: Option<String>,

    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Import a single JSON file
    File {
        file: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
    /// Import every JSON file in a directory (one level of subdirectories included)
    BulkImport {
        #[arg(long, default_value = "./imports")]
        directory: PathBuf,

        #[arg(long)]
        validate_only: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenvy::dotenv().ok();

    let cli = Cli::parse();

    let log_level = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env().unwrap_or_else(|_| {
                format!("metrics_import={},importer={}", log_level, log_level).into()
            }),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    match cli.command {
        Commands::File {
            file,
            validate_only,
        } => {
            let sink = build_sink(validate_only, cli.database_url.as_deref()).await?;
            handle_file_import(&file, sink.as_ref()).await?;
        }
        Commands::BulkImport {
            directory,
            validate_only,
        } => {
            let sink = build_sink(validate_only, cli.database_url.as_deref()).await?;
            handle_bulk_import(&directory, sink.as_ref()).await?;
        }
    }

    Ok(())
}

async fn build_sink(
    validate_only: bool,
    database_url: Option<&str>,
) -> Result<Box<dyn RecordSink>, Box<dyn std::error::Error>> {
    if validate_only {
        return Ok(Box::new(DryRunSink));
    }

    let database_url = database_url.ok_or_else(|| {
        ImporterError::ImportError(
            "DATABASE_URL is required unless --validate-only is given".to_string(),
        )
    })?;

    tracing::info!("Connecting to database...");
    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(database_url)
        .await?;

    Ok(Box::new(PostgresSink::new(pool)))
}

async fn handle_file_import(
    file: &Path,
    sink: &dyn RecordSink,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Loading metric file from: {}", file.display());

    let import = load_file(file).await?;
    tracing::info!(
        "Loaded {} record(s) for athlete {} from '{}' (v{})",
        import.records.len(),
        import.athlete_id,
        import.source,
        import.format_version
    );

    let outcome = import_file(&import, sink, Utc::now().date_naive()).await?;
    tracing::info!(
        "✓ {} record(s) validated, {} written",
        outcome.records_read,
        outcome.records_written
    );

    Ok(())
}

async fn collect_json_files(directory: &Path) -> std::io::Result<Vec<PathBuf>> {
    let mut json_files = Vec::new();
    let mut entries = tokio::fs::read_dir(directory).await?;

    while let Some(entry) = entries.next_entry().await? {
        let path = entry.path();
        if path.is_dir() {
            let mut sub_entries = tokio::fs::read_dir(&path).await?;
            while let Some(sub_entry) = sub_entries.next_entry().await? {
                let sub_path = sub_entry.path();
                if sub_path.extension().is_some_and(|ext| ext == "json") {
                    json_files.push(sub_path);
                }
            }
        } else if path.extension().is_some_and(|ext| ext == "json") {
            json_files.push(path);
        }
    }

    json_files.sort();
    Ok(json_files)
}

async fn handle_bulk_import(
    directory: &Path,
    sink: &dyn RecordSink,
) -> Result<(), Box<dyn std::error::Error>> {
    tracing::info!("Scanning directory for metric JSON files: {}", directory.display());

    let json_files = collect_json_files(directory).await?;
    if json_files.is_empty() {
        tracing::warn!("No JSON files found in {}", directory.display());
        return Ok(());
    }

    tracing::info!("Found {} metric JSON file(s)", json_files.len());

    let mut success_count = 0;
    let mut error_count = 0;
    let today = Utc::now().date_naive();

    for (idx, file_path) in json_files.iter().enumerate() {
        tracing::info!("[{}/{}] Processing: {}", idx + 1, json_files.len(), file_path.display());

        let result = match load_file(file_path).await {
            Ok(import) => import_file(&import, sink, today).await,
            Err(e) => Err(e),
        };

        match result {
            Ok(outcome) => {
                success_count += 1;
                tracing::info!(
                    "  ✓ {} record(s), {} written",
                    outcome.records_read,
                    outcome.records_written
                );
            }
            Err(e) => {
                error_count += 1;
                tracing::error!("  ✗ Error: {}", e);
            }
        }
    }

    tracing::info!("Summary: {} succeeded, {} failed", success_count, error_count);

    if error_count > 0 {
        return Err(format!("{} file(s) failed to import", error_count).into());
    }

    Ok(())
}
