//! Fintrack CLI - Personal finance analytics
//!
//! Usage:
//!   fintrack init                   Initialize database
//!   fintrack import --file CSV      Import transactions
//!   fintrack delete 42              Delete a transaction
//!   fintrack insights               Run the insight rules
//!   fintrack scenario -g 30000 -t 12  Evaluate a purchase goal
//!   fintrack serve --port 3000      Start web server

mod cli;
mod commands;


use anyhow::Result;
use clap::Parser;
use fintrack_core::NewTransaction;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use cli::*;

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Set up logging
    // Priority: RUST_LOG env var > --verbose flag > default (info)
    let filter = if std::env::var("RUST_LOG").is_ok() {
        EnvFilter::from_default_env()
    } else if cli.verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::new("info")
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_target(false).compact())
        .init();

    let as_of = commands::resolve_as_of(cli.as_of);

    match cli.command {
        Commands::Init => commands::cmd_init(&cli.db),
        Commands::Import { file } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_import(&db, &file)
        }
        Commands::Add {
            date,
            name,
            category,
            tx_type,
            amount,
            payment_method,
        } => {
            let db = commands::open_db(&cli.db)?;
            let tx = NewTransaction {
                date,
                name,
                category,
                tx_type,
                amount,
                payment_method,
            };
            commands::cmd_add(&db, &tx)
        }
        Commands::Delete { id } => {
            let db = commands::open_db(&cli.db)?;
            commands::cmd_delete(&db, id)
        }
        Commands::List { limit } => {
            let source = commands::open_source(&cli.db, cli.fixture.as_deref())?;
            commands::cmd_list(source.as_ref(), limit, cli.json)
        }
        Commands::Stats => {
            let source = commands::open_source(&cli.db, cli.fixture.as_deref())?;
            commands::cmd_stats(source.as_ref(), as_of, cli.json)
        }
        Commands::Insights => {
            let source = commands::open_source(&cli.db, cli.fixture.as_deref())?;
            let engine = commands::load_engine(cli.config.as_deref())?;
            commands::cmd_insights(source.as_ref(), &engine, as_of, cli.json)
        }
        Commands::Trends { months } => {
            let source = commands::open_source(&cli.db, cli.fixture.as_deref())?;
            commands::cmd_trends(source.as_ref(), months, as_of, cli.json)
        }
        Commands::Categories { window, tx_type } => {
            let source = commands::open_source(&cli.db, cli.fixture.as_deref())?;
            commands::cmd_categories(source.as_ref(), &window, tx_type, as_of, cli.json)
        }
        Commands::Income => {
            let source = commands::open_source(&cli.db, cli.fixture.as_deref())?;
            commands::cmd_income(source.as_ref(), as_of, cli.json)
        }
        Commands::Scenario {
            goal,
            down_payment,
            timeline,
            savings,
            capacity,
            expenses,
            allow_zero_timeline,
        } => {
            let source = commands::open_source(&cli.db, cli.fixture.as_deref())?;
            let input = commands::ScenarioInput {
                goal,
                down_payment,
                timeline,
                savings,
                capacity,
                expenses,
                allow_zero_timeline,
            };
            commands::cmd_scenario(source.as_ref(), &input, as_of, cli.json)
        }
        Commands::Serve {
            port,
            host,
            cache_capacity,
        } => {
            commands::cmd_serve(
                &cli.db,
                cli.fixture.as_deref(),
                cli.config.as_deref(),
                &host,
                port,
                cache_capacity,
            )
            .await
        }
    }
}
