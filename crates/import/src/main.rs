//! Attainments bulk user import
//!
//! Creates user accounts from a Microsoft Excel workbook:
//! 1. Selects the user sheet
//! 2. Checks the header and the required cells of every row
//! 3. Creates one account per row, skipping rows that conflict
//! 4. Logs a created/failed summary

use attainments_common::{config::AppConfig, db::DbPool, VERSION};
use attainments_import::{import_users, read_users, DEFAULT_SHEET};
use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

#[derive(Debug, Parser)]
#[command(name = "loadusers", version, about = "Create users from the data saved in an Excel workbook")]
struct Args {
    /// Path to the source workbook
    workbook: PathBuf,

    /// Name of the sheet containing the user data
    #[arg(short, long, default_value = DEFAULT_SHEET)]
    sheet: String,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    // Load environment variables
    dotenvy::dotenv().ok();

    // Load configuration
    let config = AppConfig::load().map_err(|e| {
        eprintln!("Failed to load configuration: {}", e);
        e
    })?;

    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(&config.observability.log_level));
    let registry = tracing_subscriber::registry().with(filter);
    if config.observability.json_logging {
        registry.with(fmt::layer().json().with_target(true)).init();
    } else {
        registry.with(fmt::layer().with_target(true)).init();
    }

    info!("Starting loadusers v{}", VERSION);

    let rows = read_users(&args.workbook, &args.sheet).map_err(|e| {
        error!(error = %e, "Workbook rejected");
        e
    })?;

    info!("Connecting to database...");
    let db = DbPool::new(&config.database).await?;

    let summary = import_users(db.write(), rows).await?;
    info!(
        created = summary.created,
        failed = summary.failed,
        "Users loaded from {}",
        args.workbook.display()
    );

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sheet_defaults() {
        let args = Args::try_parse_from(["loadusers", "users.xlsx"]).unwrap();
        assert_eq!(args.workbook, PathBuf::from("users.xlsx"));
        assert_eq!(args.sheet, "accounts.user");

        let args = Args::try_parse_from(["loadusers", "users.xlsx", "-s", "staff"]).unwrap();
        assert_eq!(args.sheet, "staff");

        assert!(Args::try_parse_from(["loadusers"]).is_err());
    }
}
