//! Analytics command implementations: stats, insights and reports

use anyhow::Result;
use chrono::NaiveDate;
use fintrack_core::insights::format_amount;
use fintrack_core::{
    aggregate_categories, compute_stats_as_of, income_summary, monthly_trends, DateWindow,
    InsightEngine, MonthKey, Severity, TransactionSource, TransactionType,
};

use super::{format_change, print_json, truncate};

/// Longest trend series the CLI will print
pub const MAX_TREND_MONTHS: usize = 60;

/// Resolve a window name relative to the month of `as_of`
pub fn resolve_window(window: &str, as_of: NaiveDate) -> Result<DateWindow> {
    let month = MonthKey::from_date(as_of);
    match window.to_lowercase().as_str() {
        "current-month" => Ok(DateWindow::Month(month)),
        "last-month" => Ok(DateWindow::Month(month.previous())),
        "all" => Ok(DateWindow::AllTime),
        _ => anyhow::bail!(
            "Unknown window: {}. Available: current-month, last-month, all",
            window
        ),
    }
}

pub fn cmd_stats(source: &dyn TransactionSource, as_of: NaiveDate, json: bool) -> Result<()> {
    let transactions = source.fetch_transactions()?;
    let stats = compute_stats_as_of(&transactions, as_of);

    if json {
        return print_json(&stats);
    }

    println!();
    println!("📊 Dashboard ({})", MonthKey::from_date(as_of).label());
    println!("   ─────────────────────────────────────────────");
    println!("   {:18} {:>14}   {:>9}", "", "Amount", "vs last");
    let rows = [
        ("💰 Total balance", stats.total_balance, stats.balance_change),
        ("📈 Income", stats.monthly_income, stats.income_change),
        ("📉 Expenses", stats.monthly_expenses, stats.expenses_change),
        ("🏦 Savings", stats.savings, stats.savings_change),
    ];
    for (label, amount, change) in rows {
        println!(
            "   {:18} {:>14}   {:>9}",
            label,
            format!("${}", format_amount(amount)),
            format_change(change)
        );
    }

    Ok(())
}

pub fn cmd_insights(
    source: &dyn TransactionSource,
    engine: &InsightEngine,
    as_of: NaiveDate,
    json: bool,
) -> Result<()> {
    let transactions = source.fetch_transactions()?;
    let insights = engine.analyze(&transactions, as_of);

    if json {
        return print_json(&insights);
    }

    if insights.is_empty() {
        println!("✅ Nothing stands out for {}.", MonthKey::from_date(as_of).label());
        return Ok(());
    }

    println!();
    println!("💡 Insights ({})", MonthKey::from_date(as_of).label());
    println!("   ─────────────────────────────────────────────────────────────");

    for insight in &insights {
        let icon = match insight.severity {
            Severity::Critical => "🔴",
            Severity::Warning => "🟡",
            Severity::Info => "🔵",
        };
        println!("   {} {}", icon, insight.title);
        println!("      {}", insight.description);
        if let Some(impact) = insight.impact {
            println!("      Impact: ${}", format_amount(impact));
        }
        if let Some(action) = &insight.action_label {
            println!("      → {}", action);
        }
        println!();
    }

    let critical = insights
        .iter()
        .filter(|i| i.severity == Severity::Critical)
        .count();
    if critical > 0 {
        println!("⚠️  {} critical insight(s) need attention.", critical);
    }

    Ok(())
}

pub fn cmd_trends(
    source: &dyn TransactionSource,
    months: usize,
    as_of: NaiveDate,
    json: bool,
) -> Result<()> {
    if !(1..=MAX_TREND_MONTHS).contains(&months) {
        anyhow::bail!("--months must be between 1 and {}", MAX_TREND_MONTHS);
    }

    let transactions = source.fetch_transactions()?;
    let trends = monthly_trends(&transactions, months, as_of);

    if json {
        return print_json(&trends);
    }

    println!();
    println!("📈 Monthly Trends");
    println!("   ─────────────────────────────────────────────────────────────");
    println!(
        "   {:10} │ {:>14} │ {:>14} │ {:>14}",
        "Month", "Income", "Expenses", "Balance"
    );
    println!("   ───────────┼────────────────┼────────────────┼────────────────");

    for point in &trends {
        println!(
            "   {:10} │ {:>14} │ {:>14} │ {:>14}",
            point.label,
            format_amount(point.income),
            format_amount(point.expense),
            format_amount(point.balance)
        );
    }

    Ok(())
}

pub fn cmd_categories(
    source: &dyn TransactionSource,
    window: &str,
    tx_type: TransactionType,
    as_of: NaiveDate,
    json: bool,
) -> Result<()> {
    let date_window = resolve_window(window, as_of)?;
    let transactions = source.fetch_transactions()?;
    let breakdown = aggregate_categories(&transactions, tx_type, date_window);

    if json {
        return print_json(&breakdown);
    }

    println!();
    println!("🗂️  {} by Category ({})", capitalize(tx_type.as_str()), window);
    println!("   ─────────────────────────────────────────────────────────────");

    if breakdown.is_empty() {
        println!("   No {} transactions in this window.", tx_type);
        return Ok(());
    }

    println!("   Total: ${}", format_amount(breakdown.total));
    println!();
    println!(
        "   {:25} │ {:>12} │ {:>6} │ {:>5}",
        "Category", "Amount", "%", "Count"
    );
    println!("   ──────────────────────────┼──────────────┼────────┼───────");

    for cat in &breakdown.categories {
        println!(
            "   {:25} │ {:>12} │ {:>5.1}% │ {:>5}",
            truncate(&cat.category, 25),
            format_amount(cat.amount),
            cat.percentage,
            cat.transaction_count
        );
    }

    Ok(())
}

pub fn cmd_income(source: &dyn TransactionSource, as_of: NaiveDate, json: bool) -> Result<()> {
    let transactions = source.fetch_transactions()?;
    let summary = income_summary(&transactions, as_of);

    if json {
        return print_json(&summary);
    }

    let month = MonthKey::from_date(as_of);
    println!();
    println!("💵 Income");
    println!("   ─────────────────────────────");
    println!(
        "   {:10} ${} ({})",
        month.label(),
        format_amount(summary.current_month),
        format_change(summary.change)
    );
    println!(
        "   {:10} ${}",
        month.previous().label(),
        format_amount(summary.previous_month)
    );
    println!(
        "   {:10} ${} (flat +5%)",
        month.next().label(),
        format_amount(summary.predicted_next_month)
    );

    Ok(())
}

fn capitalize(s: &str) -> String {
    let mut chars = s.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}
