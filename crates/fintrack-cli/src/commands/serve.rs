//! Server command implementation

use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use fintrack_core::FixtureSource;
use fintrack_server::{AppState, ServerConfig, ALLOWED_ORIGINS_ENV};

use super::{load_engine, open_db};

pub async fn cmd_serve(
    db_path: &Path,
    fixture: Option<&Path>,
    config_path: Option<&Path>,
    host: &str,
    port: u16,
    cache_capacity: usize,
) -> Result<()> {
    println!("🚀 Starting Fintrack web server...");

    let engine = load_engine(config_path)?;
    let config = ServerConfig {
        cache_capacity,
        ..ServerConfig::from_env()
    };

    let state = match fixture {
        Some(path) => {
            let source = FixtureSource::from_json_file(path)
                .with_context(|| format!("Failed to load fixture {}", path.display()))?;
            println!(
                "   Fixture: {} ({} transactions, read-only)",
                path.display(),
                source.len()
            );
            AppState::with_source(Arc::new(source), engine, config)
        }
        None => {
            println!("   Database: {}", db_path.display());
            AppState::with_database(open_db(db_path)?, engine, config)
        }
    };

    println!("   Listening: http://{}:{}", host, port);
    if state.config.allowed_origins.is_empty() {
        println!("   🔒 CORS: same-origin only (set {} to allow others)", ALLOWED_ORIGINS_ENV);
    } else {
        println!("   🌐 CORS: {}", state.config.allowed_origins.join(", "));
    }
    if cache_capacity == 0 {
        println!("   ⚠️  Analysis cache disabled");
    }
    println!();

    fintrack_server::serve(state, host, port).await
}
