//! Domain models for Fintrack

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Date format used for storage, fixtures, CSV and query parameters
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Direction of money movement. Amounts are always non-negative; the sign
/// lives here.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransactionType {
    Income,
    Expense,
}

impl TransactionType {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Income => "income",
            Self::Expense => "expense",
        }
    }
}

impl std::str::FromStr for TransactionType {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "income" => Ok(Self::Income),
            "expense" => Ok(Self::Expense),
            _ => Err(format!("Unknown transaction type: {}", s)),
        }
    }
}

impl std::fmt::Display for TransactionType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A financial transaction as supplied by a transaction source
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Transaction {
    /// Opaque identifier assigned by the source
    pub id: String,
    /// Non-negative amount in the base currency
    pub amount: f64,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    /// Free-text label, grouped case-insensitively
    pub category: String,
    pub date: NaiveDate,
    pub name: String,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl Transaction {
    pub fn is_income(&self) -> bool {
        self.tx_type == TransactionType::Income
    }

    pub fn is_expense(&self) -> bool {
        self.tx_type == TransactionType::Expense
    }

    /// Check the record against the engine's input contract
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)
            .map_err(|e| Error::invalid(format!("transaction {}: {}", self.id, e)))
    }
}

/// A new transaction to be stored (before an id is assigned)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewTransaction {
    pub date: NaiveDate,
    pub name: String,
    pub category: String,
    #[serde(rename = "type")]
    pub tx_type: TransactionType,
    pub amount: f64,
    #[serde(default)]
    pub payment_method: Option<String>,
}

impl NewTransaction {
    pub fn validate(&self) -> Result<()> {
        validate_amount(self.amount)?;
        if self.name.trim().is_empty() {
            return Err(Error::invalid("transaction name must not be empty"));
        }
        Ok(())
    }

    /// Hash for deduplication of imported rows
    pub fn import_hash(&self) -> String {
        use sha2::{Digest, Sha256};

        let mut hasher = Sha256::new();
        hasher.update(self.date.format(DATE_FORMAT).to_string());
        hasher.update(b"|");
        hasher.update(self.name.trim().to_lowercase());
        hasher.update(b"|");
        hasher.update(self.category.trim().to_lowercase());
        hasher.update(b"|");
        hasher.update(self.tx_type.as_str());
        hasher.update(b"|");
        hasher.update(format!("{:.2}", self.amount));
        hex::encode(hasher.finalize())
    }

    /// Attach an id, producing the record shape sources hand out
    pub fn into_transaction(self, id: impl Into<String>) -> Transaction {
        Transaction {
            id: id.into(),
            amount: self.amount,
            tx_type: self.tx_type,
            category: self.category,
            date: self.date,
            name: self.name,
            payment_method: self.payment_method,
        }
    }
}

fn validate_amount(amount: f64) -> Result<()> {
    if !amount.is_finite() {
        return Err(Error::invalid(format!("amount {} is not a number", amount)));
    }
    if amount < 0.0 {
        return Err(Error::invalid(format!(
            "amount {} is negative; direction is carried by the type",
            amount
        )));
    }
    Ok(())
}

/// Parse a `YYYY-MM-DD` date, reporting malformed input as invalid input
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), DATE_FORMAT)
        .map_err(|_| Error::invalid(format!("Invalid date '{}', expected YYYY-MM-DD", s)))
}

/// Reject the whole list if any record violates the input contract
pub fn validate_transactions(transactions: &[Transaction]) -> Result<()> {
    transactions.iter().try_for_each(Transaction::validate)
}

/// Keep the records that satisfy the input contract, logging the rest.
///
/// Analytics entry points use this so one bad record never aborts a
/// computation.
pub fn valid_transactions(transactions: &[Transaction]) -> Vec<&Transaction> {
    let mut skipped = 0usize;
    let valid: Vec<&Transaction> = transactions
        .iter()
        .filter(|tx| match tx.validate() {
            Ok(()) => true,
            Err(e) => {
                tracing::warn!(id = %tx.id, error = %e, "Skipping invalid transaction");
                skipped += 1;
                false
            }
        })
        .collect();

    if skipped > 0 {
        tracing::debug!(skipped, kept = valid.len(), "Filtered transaction snapshot");
    }
    valid
}
