//! Script that runs the monthly recurrence job once and exits.
//!
//! Meant for a daily cron; on any day other than the 1st it only logs that it skipped.
//! Pass `--date YYYY-MM-DD` to run for another day.

use chrono::NaiveDate;
use dotenvy::dotenv;
use rust_fiscal_api::business_days::WeekendHandling;
use rust_fiscal_api::db_storage::FiscalStorage;
use rust_fiscal_api::recurrence_job::run_recurrences;
use sqlx::postgres::PgPoolOptions;
use std::env;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables
    dotenv().ok();

    // Initialize logging
    tracing_subscriber::fmt::init();

    let database_url = env::var("DATABASE_URL")
        .or_else(|_| env::var("DB_URL"))
        .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?;

    let default_handling = match env::var("DEFAULT_WEEKEND_HANDLING") {
        Ok(raw) if !raw.trim().is_empty() => raw
            .parse::<WeekendHandling>()
            .map_err(|e| anyhow::anyhow!("DEFAULT_WEEKEND_HANDLING: {}", e))?,
        _ => WeekendHandling::default(),
    };

    let mut args = env::args().skip(1);
    let today = match (args.next().as_deref(), args.next()) {
        (Some("--date"), Some(raw)) => NaiveDate::parse_from_str(&raw, "%Y-%m-%d")
            .map_err(|e| anyhow::anyhow!("invalid --date '{}': {}", raw, e))?,
        (None, _) => chrono::Local::now().date_naive(),
        _ => anyhow::bail!("usage: auto_create_recurrences [--date YYYY-MM-DD]"),
    };

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&database_url)
        .await?;

    tracing::info!("Connected to database. Running recurrence job for {}", today);

    let summary = run_recurrences(&FiscalStorage::new(pool), today, default_handling).await?;

    tracing::info!(
        "{} ({} created, {} duplicates, {} failures)",
        summary.message,
        summary.created,
        summary.duplicates,
        summary.failures
    );

    if summary.failures > 0 {
        anyhow::bail!("{} items failed to copy", summary.failures);
    }

    Ok(())
}
