use std::path::Path;

use anyhow::{Context, Result};
use tracing::info;

use userload_cli::pipeline::{self, PipelineOptions, RunReport};
use userload_ingest::RowSource;
use userload_store::PgUserStore;

use crate::cli::{ConnectionArgs, LoadArgs};

pub async fn run_load(args: &LoadArgs) -> Result<RunReport> {
    let store = PgUserStore::connect(&args.connection.store_config()).await?;
    store.ensure_schema().await?;
    let source = RowSource::open(&args.file)?;
    let options = PipelineOptions {
        dry_run: args.dry_run,
    };
    let report = pipeline::run(source, &store, options).await?;
    if let Some(path) = &args.report {
        write_report(path, &report)?;
    }
    Ok(report)
}

pub async fn run_create_table(args: &ConnectionArgs) -> Result<()> {
    let store = PgUserStore::connect(&args.store_config()).await?;
    store.ensure_schema().await?;
    println!("users table created");
    Ok(())
}

fn write_report(path: &Path, report: &RunReport) -> Result<()> {
    let json = serde_json::to_string_pretty(report).context("serialize run report")?;
    std::fs::write(path, json).with_context(|| format!("write report: {}", path.display()))?;
    info!(path = %path.display(), "run report written");
    Ok(())
}
