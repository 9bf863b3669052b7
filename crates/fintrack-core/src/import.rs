//! CSV import
//!
//! Expected header: `date,name,category,type,amount,payment_method`.
//! Columns are matched by name (case-insensitive, any order); the
//! `payment_method` column is optional. Rows that fail to parse or
//! validate are skipped and counted rather than aborting the import.

use std::io::Read;

use csv::{ReaderBuilder, StringRecord};
use serde::Serialize;
use tracing::{debug, info, warn};

use crate::db::Database;
use crate::error::{Error, Result};
use crate::models::{parse_date, NewTransaction, TransactionType};

/// Outcome counters for an import run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct ImportStats {
    /// Data rows read from the file
    pub rows: usize,
    /// Rows that parsed and validated
    pub parsed: usize,
    /// Rows rejected as malformed or invalid
    pub skipped: usize,
    /// Rows written to the store
    pub inserted: usize,
    /// Rows already present in the store
    pub duplicates: usize,
}

struct Columns {
    date: usize,
    name: usize,
    category: usize,
    tx_type: usize,
    amount: usize,
    payment_method: Option<usize>,
}

impl Columns {
    fn from_headers(headers: &StringRecord) -> Result<Self> {
        let find = |name: &str| {
            headers
                .iter()
                .position(|h| h.trim().eq_ignore_ascii_case(name))
        };
        let require = |name: &str| {
            find(name)
                .ok_or_else(|| Error::invalid(format!("CSV is missing the '{}' column", name)))
        };

        Ok(Self {
            date: require("date")?,
            name: require("name")?,
            category: require("category")?,
            tx_type: require("type")?,
            amount: require("amount")?,
            payment_method: find("payment_method"),
        })
    }
}

/// Parse transactions from CSV
pub fn parse_csv<R: Read>(reader: R) -> Result<(Vec<NewTransaction>, ImportStats)> {
    let mut rdr = ReaderBuilder::new()
        .has_headers(true)
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(reader);

    let columns = Columns::from_headers(rdr.headers()?)?;
    let mut stats = ImportStats::default();
    let mut transactions = Vec::new();

    for (index, result) in rdr.records().enumerate() {
        stats.rows += 1;
        // Header is line 1
        let line = index + 2;

        let parsed = result
            .map_err(Error::from)
            .and_then(|record| parse_record(&record, &columns));

        match parsed {
            Ok(tx) => transactions.push(tx),
            Err(e) => {
                warn!(line, error = %e, "Skipping CSV row");
                stats.skipped += 1;
            }
        }
    }

    stats.parsed = transactions.len();
    debug!(rows = stats.rows, skipped = stats.skipped, "Parsed CSV");
    Ok((transactions, stats))
}

fn parse_record(record: &StringRecord, columns: &Columns) -> Result<NewTransaction> {
    let field = |i: usize, name: &str| {
        record
            .get(i)
            .filter(|v| !v.is_empty())
            .ok_or_else(|| Error::invalid(format!("missing {}", name)))
    };

    let date = parse_date(field(columns.date, "date")?)?;
    let tx_type: TransactionType = field(columns.tx_type, "type")?
        .parse()
        .map_err(Error::InvalidInput)?;
    let amount = parse_amount(field(columns.amount, "amount")?)?;

    let tx = NewTransaction {
        date,
        name: field(columns.name, "name")?.to_string(),
        category: field(columns.category, "category")?.to_string(),
        tx_type,
        amount,
        payment_method: columns
            .payment_method
            .and_then(|i| record.get(i))
            .filter(|v| !v.is_empty())
            .map(str::to_string),
    };
    tx.validate()?;
    Ok(tx)
}

/// Parse an amount, tolerating thousands separators
fn parse_amount(s: &str) -> Result<f64> {
    s.replace(',', "")
        .parse::<f64>()
        .map_err(|_| Error::invalid(format!("Invalid amount '{}'", s)))
}

/// Parse CSV and store every valid row, skipping duplicates
pub fn import_csv<R: Read>(db: &Database, reader: R) -> Result<ImportStats> {
    let (transactions, mut stats) = parse_csv(reader)?;

    for tx in &transactions {
        match db.insert_transaction(tx)? {
            Some(_) => stats.inserted += 1,
            None => stats.duplicates += 1,
        }
    }

    info!(
        inserted = stats.inserted,
        duplicates = stats.duplicates,
        skipped = stats.skipped,
        "Import complete"
    );
    Ok(stats)
}
