//! Transaction operations

use rusqlite::{params, OptionalExtension};

use super::Database;
use crate::error::{Error, Result};
use crate::models::{NewTransaction, Transaction, TransactionType, DATE_FORMAT};
use crate::source::TransactionSource;

const SELECT_COLUMNS: &str = "id, date, name, category, type, amount, payment_method";

impl Database {
    /// Insert a transaction (skips duplicates based on import hash)
    ///
    /// Returns the new id, or `None` when an identical record already exists.
    pub fn insert_transaction(&self, tx: &NewTransaction) -> Result<Option<i64>> {
        tx.validate()?;
        let conn = self.conn()?;
        let import_hash = tx.import_hash();

        let existing: Option<i64> = conn
            .query_row(
                "SELECT id FROM transactions WHERE import_hash = ?",
                params![import_hash],
                |row| row.get(0),
            )
            .optional()?;

        if existing.is_some() {
            return Ok(None); // Duplicate, skip
        }

        conn.execute(
            r#"
            INSERT INTO transactions (date, name, category, type, amount, payment_method, import_hash)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
            params![
                tx.date.format(DATE_FORMAT).to_string(),
                tx.name.trim(),
                tx.category.trim(),
                tx.tx_type.as_str(),
                tx.amount,
                tx.payment_method,
                import_hash,
            ],
        )?;

        Ok(Some(conn.last_insert_rowid()))
    }

    /// List transactions, newest first
    pub fn list_transactions(&self, limit: i64, offset: i64) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions ORDER BY date DESC, id DESC LIMIT ? OFFSET ?",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let transactions = stmt
            .query_map(params![limit, offset], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    /// Every stored transaction, oldest first
    pub fn all_transactions(&self) -> Result<Vec<Transaction>> {
        let conn = self.conn()?;
        let sql = format!(
            "SELECT {} FROM transactions ORDER BY date ASC, id ASC",
            SELECT_COLUMNS
        );
        let mut stmt = conn.prepare(&sql)?;

        let transactions = stmt
            .query_map([], Self::row_to_transaction)?
            .collect::<std::result::Result<Vec<_>, _>>()?;

        Ok(transactions)
    }

    pub fn get_transaction(&self, id: i64) -> Result<Option<Transaction>> {
        let conn = self.conn()?;
        let sql = format!("SELECT {} FROM transactions WHERE id = ?", SELECT_COLUMNS);
        let tx = conn
            .query_row(&sql, params![id], Self::row_to_transaction)
            .optional()?;
        Ok(tx)
    }

    pub fn count_transactions(&self) -> Result<i64> {
        let conn = self.conn()?;
        let count: i64 =
            conn.query_row("SELECT COUNT(*) FROM transactions", [], |row| row.get(0))?;
        Ok(count)
    }

    /// Delete a transaction by id
    pub fn delete_transaction(&self, id: i64) -> Result<()> {
        let conn = self.conn()?;
        let deleted = conn.execute("DELETE FROM transactions WHERE id = ?", params![id])?;
        if deleted == 0 {
            return Err(Error::NotFound(format!("transaction {}", id)));
        }
        Ok(())
    }

    fn row_to_transaction(row: &rusqlite::Row) -> rusqlite::Result<Transaction> {
        let id: i64 = row.get(0)?;
        let date_str: String = row.get(1)?;
        let type_str: String = row.get(4)?;

        let date = chrono::NaiveDate::parse_from_str(&date_str, DATE_FORMAT).map_err(|e| {
            rusqlite::Error::FromSqlConversionFailure(1, rusqlite::types::Type::Text, Box::new(e))
        })?;
        let tx_type: TransactionType = type_str.parse().map_err(|e: String| {
            rusqlite::Error::FromSqlConversionFailure(4, rusqlite::types::Type::Text, e.into())
        })?;

        Ok(Transaction {
            id: id.to_string(),
            date,
            name: row.get(2)?,
            category: row.get(3)?,
            tx_type,
            amount: row.get(5)?,
            payment_method: row.get(6)?,
        })
    }
}

impl TransactionSource for Database {
    fn fetch_transactions(&self) -> Result<Vec<Transaction>> {
        self.all_transactions()
    }

    fn describe(&self) -> String {
        format!("database {}", self.path())
    }
}
