//! Core command implementations and shared utilities
//!
//! This module contains:
//! - `open_db` - Open the live transaction store
//! - `open_source` - Pick the store or a JSON fixture for read-only commands
//! - `load_engine` - Build the insight engine from threshold config
//! - `cmd_init` - Initialize the database

use std::path::Path;

use anyhow::{Context, Result};
use chrono::{Local, NaiveDate};
use fintrack_core::config::default_config_path;
use fintrack_core::{Database, FixtureSource, InsightConfig, InsightEngine, TransactionSource};

/// Open (and migrate) the database at `db_path`
pub fn open_db(db_path: &Path) -> Result<Database> {
    let path_str = db_path
        .to_str()
        .with_context(|| format!("Database path is not valid UTF-8: {}", db_path.display()))?;
    Database::new(path_str).context("Failed to open database")
}

/// Transaction source for read-only commands: the fixture when given,
/// otherwise the database
pub fn open_source(db_path: &Path, fixture: Option<&Path>) -> Result<Box<dyn TransactionSource>> {
    match fixture {
        Some(path) => {
            let source = FixtureSource::from_json_file(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            tracing::debug!(transactions = source.len(), "Using fixture source");
            Ok(Box::new(source))
        }
        None => Ok(Box::new(open_db(db_path)?)),
    }
}

/// Insight engine with thresholds from `config_path`, or from the default
/// override location when no path is given
pub fn load_engine(config_path: Option<&Path>) -> Result<InsightEngine> {
    let config = match config_path {
        Some(path) => {
            if !path.exists() {
                anyhow::bail!("Config file not found: {}", path.display());
            }
            InsightConfig::load_from(path)
        }
        None => InsightConfig::load(),
    }
    .context("Failed to load insight config")?;

    Ok(InsightEngine::with_config(config))
}

/// Reference date for analytics: the explicit date, or today
pub fn resolve_as_of(as_of: Option<NaiveDate>) -> NaiveDate {
    as_of.unwrap_or_else(|| Local::now().date_naive())
}

pub fn cmd_init(db_path: &Path) -> Result<()> {
    println!("🔧 Initializing database at {}...", db_path.display());

    let db = open_db(db_path)?;
    let count = db.count_transactions()?;
    if count > 0 {
        println!("   Existing transactions: {}", count);
    }

    match default_config_path() {
        Some(path) if path.exists() => {
            println!("   ⚙️  Insight config: {}", path.display());
        }
        Some(path) => {
            println!("   ⚙️  Insight config: built-in defaults");
            println!("      Override thresholds in {}", path.display());
        }
        None => println!("   ⚙️  Insight config: built-in defaults"),
    }

    println!("✅ Database initialized successfully!");
    println!();
    println!("Next steps:");
    println!("  1. Import transactions: fintrack import --file transactions.csv");
    println!("  2. See what stands out: fintrack insights");
    println!("  3. Start web API: fintrack serve");

    Ok(())
}
