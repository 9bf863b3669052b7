//! Transaction sources: where analytics snapshots come from
//!
//! The analytics core only ever sees a `&[Transaction]`. Callers pick a
//! source (the live SQLite store or a JSON fixture) and hand its snapshot
//! to the engine.

use std::path::Path;

use serde_json::Value;
use sha2::{Digest, Sha256};

use crate::error::{Error, Result};
use crate::models::Transaction;

/// Anything that can produce a read-only transaction snapshot
pub trait TransactionSource: Send + Sync {
    /// Fetch every transaction. No ordering is guaranteed.
    fn fetch_transactions(&self) -> Result<Vec<Transaction>>;

    /// Short description for logs
    fn describe(&self) -> String {
        "transaction source".to_string()
    }
}

/// Fixed, in-memory transactions (demo data, tests, offline analysis)
#[derive(Debug, Clone, Default)]
pub struct FixtureSource {
    transactions: Vec<Transaction>,
}

impl FixtureSource {
    pub fn new(transactions: Vec<Transaction>) -> Self {
        Self { transactions }
    }

    /// Parse a JSON array of transactions.
    ///
    /// Records that do not deserialize are skipped with a warning; a
    /// document that is not an array is an error.
    pub fn from_json_str(content: &str) -> Result<Self> {
        let values: Vec<Value> = serde_json::from_str(content)?;
        let total = values.len();

        let mut transactions = Vec::with_capacity(total);
        for (index, value) in values.into_iter().enumerate() {
            match serde_json::from_value::<Transaction>(value) {
                Ok(tx) => transactions.push(tx),
                Err(e) => {
                    tracing::warn!(index, error = %e, "Skipping malformed fixture record");
                }
            }
        }

        tracing::debug!(
            loaded = transactions.len(),
            skipped = total - transactions.len(),
            "Loaded fixture transactions"
        );
        Ok(Self { transactions })
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            Error::Io(std::io::Error::new(
                e.kind(),
                format!("Failed to read fixture {}: {}", path.display(), e),
            ))
        })?;
        Self::from_json_str(&content)
    }

    pub fn len(&self) -> usize {
        self.transactions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.transactions.is_empty()
    }
}

impl TransactionSource for FixtureSource {
    fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        Ok(self.transactions.clone())
    }

    fn describe(&self) -> String {
        format!("fixture ({} transactions)", self.transactions.len())
    }
}

/// Content fingerprint of a snapshot (hex SHA-256 of its JSON form).
///
/// Equal snapshots in equal order hash equally, so callers can key caches
/// of derived results on it.
pub fn fingerprint(transactions: &[Transaction]) -> Result<String> {
    let bytes = serde_json::to_vec(transactions)?;
    Ok(hex::encode(Sha256::digest(&bytes)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_utils::{expense, ymd};
    use std::io::Write;

    const FIXTURE: &str = r#"[
        {"id": "1", "amount": 100000, "type": "income", "category": "Salary",
         "date": "2024-01-01", "name": "Payroll"},
        {"id": "2", "amount": 30000, "type": "expense", "category": "Food",
         "date": "2024-01-15", "name": "Groceries", "payment_method": "card"},
        {"id": "3", "amount": 10, "type": "transfer", "category": "Misc",
         "date": "2024-01-15", "name": "Bad type"},
        {"id": "4", "amount": 10, "type": "expense", "category": "Misc",
         "date": "2024-13-01", "name": "Bad date"}
    ]"#;

    #[test]
    fn test_fixture_skips_malformed_records() {
        let source = FixtureSource::from_json_str(FIXTURE).unwrap();
        let txs = source.fetch_transactions().unwrap();
        assert_eq!(txs.len(), 2);
        assert_eq!(txs[1].payment_method.as_deref(), Some("card"));
        assert!(source.describe().contains("2 transactions"));
    }

    #[test]
    fn test_fixture_requires_array() {
        assert!(FixtureSource::from_json_str(r#"{"id": "1"}"#).is_err());
        assert!(FixtureSource::from_json_str("not json").is_err());
    }

    #[test]
    fn test_fixture_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(FIXTURE.as_bytes()).unwrap();

        let source = FixtureSource::from_json_file(file.path()).unwrap();
        assert_eq!(source.len(), 2);

        let missing = FixtureSource::from_json_file(Path::new("/nonexistent/fixture.json"));
        assert!(matches!(missing, Err(Error::Io(_))));
    }

    #[test]
    fn test_fingerprint_tracks_content() {
        let a = vec![expense(10.0, "Food", ymd(2024, 1, 1))];
        let mut b = a.clone();
        assert_eq!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());

        b[0].amount = 11.0;
        assert_ne!(fingerprint(&a).unwrap(), fingerprint(&b).unwrap());
        assert_eq!(fingerprint(&a).unwrap().len(), 64);
    }
}
