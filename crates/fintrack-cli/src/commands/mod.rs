//! CLI command implementations
//!
//! Commands are organized by domain:
//! - `core` - Init and shared utilities (open_db, open_source, load_engine)
//! - `transactions` - Import, add, delete and list
//! - `analytics` - Stats, insights and reports (trends, categories, income)
//! - `scenario` - Purchase goal simulator
//! - `serve` - Web server command

pub mod analytics;
pub mod core;
pub mod scenario;
pub mod serve;
pub mod transactions;

// Re-export command functions for main.rs
pub use analytics::*;
pub use self::core::*;
pub use scenario::*;
pub use serve::*;
pub use transactions::*;

/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max.saturating_sub(3)).collect();
        format!("{}...", kept)
    }
}

/// Format a percentage change with an explicit sign
pub fn format_change(change: f64) -> String {
    if change > 0.0 {
        format!("+{:.1}%", change)
    } else {
        format!("{:.1}%", change)
    }
}

/// Pretty-print a value as JSON on stdout
pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
