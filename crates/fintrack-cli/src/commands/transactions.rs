//! Transaction command implementations (import, add, delete, list)

use std::fs::File;
use std::path::Path;

use anyhow::{Context, Result};
use fintrack_core::{import_csv, Database, NewTransaction, TransactionSource, TransactionType};

use super::{print_json, truncate};

pub fn cmd_import(db: &Database, file: &Path) -> Result<()> {
    println!("📥 Importing transactions from {}...", file.display());

    let reader =
        File::open(file).with_context(|| format!("Failed to open {}", file.display()))?;
    let stats = import_csv(db, reader).context("Import failed")?;

    println!();
    println!("📊 Import Results");
    println!("   ─────────────────────────────");
    println!("   Rows read:   {}", stats.rows);
    println!("   Imported:    {}", stats.inserted);
    println!("   Duplicates:  {}", stats.duplicates);
    if stats.skipped > 0 {
        println!("   ⚠️  Skipped:  {} (run with --verbose for details)", stats.skipped);
    }

    println!();
    if stats.inserted > 0 {
        println!("✅ Import complete. Run 'fintrack insights' to see what stands out.");
    } else {
        println!("✅ Import complete. No new transactions.");
    }

    Ok(())
}

pub fn cmd_add(db: &Database, tx: &NewTransaction) -> Result<()> {
    match db.insert_transaction(tx)? {
        Some(id) => println!(
            "✅ Added {} #{}: {} ${:.2} ({})",
            tx.tx_type, id, tx.name, tx.amount, tx.category
        ),
        None => println!("⚠️  Identical transaction already recorded, nothing added"),
    }
    Ok(())
}

pub fn cmd_delete(db: &Database, id: i64) -> Result<()> {
    let tx = db
        .get_transaction(id)?
        .with_context(|| format!("Transaction {} not found", id))?;

    db.delete_transaction(id)?;
    println!(
        "🗑️  Deleted {} #{}: {} ${:.2} ({}, {})",
        tx.tx_type, id, tx.name, tx.amount, tx.category, tx.date
    );
    Ok(())
}

pub fn cmd_list(source: &dyn TransactionSource, limit: usize, json: bool) -> Result<()> {
    let mut transactions = source.fetch_transactions()?;
    transactions.sort_by(|a, b| b.date.cmp(&a.date));
    transactions.truncate(limit);

    if json {
        return print_json(&transactions);
    }

    if transactions.is_empty() {
        println!("No transactions found. Import some with:");
        println!("  fintrack import --file transactions.csv");
        return Ok(());
    }

    println!();
    println!("📝 Recent Transactions");
    println!("   ─────────────────────────────────────────────────────────────");

    for tx in transactions {
        let amount_str = match tx.tx_type {
            TransactionType::Expense => format!("\x1b[31m-${:.2}\x1b[0m", tx.amount), // Red
            TransactionType::Income => format!("\x1b[32m+${:.2}\x1b[0m", tx.amount), // Green
        };

        println!(
            "   {} │ {:>12} │ {:15} │ {}",
            tx.date,
            amount_str,
            truncate(&tx.category, 15),
            truncate(&tx.name, 30)
        );
    }

    Ok(())
}
