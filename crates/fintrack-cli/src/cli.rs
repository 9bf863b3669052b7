//! CLI argument definitions using clap
//!
//! This module contains all the clap structs and enums for parsing CLI arguments.
//! The actual command implementations are in the `commands` module.

use std::path::PathBuf;

use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use fintrack_core::TransactionType;

/// Fintrack - Personal finance analytics and insights
#[derive(Parser)]
#[command(name = "fintrack")]
#[command(about = "Personal finance analytics: stats, insights and goal scenarios", long_about = None)]
#[command(version)]
pub struct Cli {
    /// Database path
    #[arg(long, default_value = "fintrack.db", global = true)]
    pub db: PathBuf,

    /// Read transactions from a JSON fixture instead of the database
    ///
    /// The fixture is a JSON array of transaction records. Commands that
    /// write (init, import, add, delete) always use the database.
    #[arg(long, global = true)]
    pub fixture: Option<PathBuf>,

    /// Insight threshold config (defaults to the user data directory)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Reference date for analytics (YYYY-MM-DD, defaults to today)
    #[arg(long, global = true)]
    pub as_of: Option<NaiveDate>,

    /// Print machine-readable JSON instead of tables
    #[arg(long, global = true)]
    pub json: bool,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database
    Init,

    /// Import transactions from CSV
    ///
    /// Expected columns (any order, matched by header name):
    /// date, name, category, type, amount, and optionally payment_method.
    Import {
        /// CSV file to import
        #[arg(short, long)]
        file: PathBuf,
    },

    /// Add a single transaction
    Add {
        /// Transaction date (YYYY-MM-DD)
        #[arg(long)]
        date: NaiveDate,

        /// Description or merchant
        #[arg(long)]
        name: String,

        /// Category label
        #[arg(short, long)]
        category: String,

        /// income or expense
        #[arg(short = 't', long = "type")]
        tx_type: TransactionType,

        /// Non-negative amount
        #[arg(short, long)]
        amount: f64,

        /// Payment method (card, cash, ...)
        #[arg(long)]
        payment_method: Option<String>,
    },

    /// Delete a transaction from the database
    Delete {
        /// Transaction ID (as shown by `list --json`)
        id: i64,
    },

    /// List transactions, newest first
    List {
        /// Maximum number of transactions to show
        #[arg(short, long, default_value = "20")]
        limit: usize,
    },

    /// Show dashboard stats with month-over-month changes
    Stats,

    /// Run the insight rules for the current month
    Insights,

    /// Show monthly income/expense trends
    Trends {
        /// Number of months to show, ending with the current month
        #[arg(short, long, default_value = "6")]
        months: usize,
    },

    /// Show spending by category
    Categories {
        /// Window: current-month, last-month, all
        #[arg(short, long, default_value = "current-month")]
        window: String,

        /// income or expense
        #[arg(short = 't', long = "type", default_value = "expense")]
        tx_type: TransactionType,
    },

    /// Show income this month vs last month
    Income,

    /// Evaluate whether a purchase goal is affordable
    Scenario {
        /// Total goal amount
        #[arg(short, long)]
        goal: f64,

        /// Down payment already covered by other means
        #[arg(short, long, default_value = "0")]
        down_payment: f64,

        /// Months until the goal is due
        #[arg(short, long)]
        timeline: u32,

        /// Current savings (defaults to the positive all-time balance)
        #[arg(long)]
        savings: Option<f64>,

        /// Monthly savings capacity (defaults to this month's savings)
        #[arg(long)]
        capacity: Option<f64>,

        /// Monthly expenses (defaults to this month's expenses)
        #[arg(long)]
        expenses: Option<f64>,

        /// Accept a zero-month timeline
        #[arg(long)]
        allow_zero_timeline: bool,
    },

    /// Start the web server
    Serve {
        /// Port to listen on
        #[arg(short, long, default_value = "3000")]
        port: u16,

        /// Host to bind to
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Number of analysis results kept in memory
        #[arg(long, default_value = "64")]
        cache_capacity: usize,
    },
}
