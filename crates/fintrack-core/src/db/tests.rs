//! Database tests

use super::*;
use crate::error::Error;
use crate::models::TransactionType;
use crate::source::TransactionSource;
use crate::test_utils::{new_transaction, ymd};

#[test]
fn test_in_memory_db() {
    let db = Database::in_memory().unwrap();
    assert_eq!(db.count_transactions().unwrap(), 0);
    assert!(db.list_transactions(10, 0).unwrap().is_empty());
}

#[test]
fn test_in_memory_db_files_removed_on_drop() {
    let db = Database::in_memory().unwrap();
    let file = std::path::PathBuf::from(db.path());
    let dir = file.parent().unwrap().to_path_buf();
    db.insert_transaction(&new_transaction(
        TransactionType::Income,
        100.0,
        "Salary",
        "Payroll",
        ymd(2024, 1, 1),
    ))
    .unwrap();

    // A clone keeps the files alive
    let clone = db.clone();
    drop(db);
    assert!(file.exists());
    assert_eq!(clone.count_transactions().unwrap(), 1);

    drop(clone);
    assert!(!file.exists());
    assert!(!dir.exists());
}

#[test]
fn test_transactions_schema_exists() {
    let db = Database::in_memory().unwrap();
    let conn = db.conn().unwrap();

    let result: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM pragma_table_info('transactions') WHERE name IN ('id', 'date', 'name', 'category', 'type', 'amount', 'payment_method', 'import_hash')",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(result, 8, "transactions table should have 8 expected columns");
}

#[test]
fn test_insert_and_list() {
    let db = Database::in_memory().unwrap();

    let mut tx = new_transaction(
        TransactionType::Expense,
        42.5,
        " Food ",
        "Groceries",
        ymd(2024, 2, 10),
    );
    tx.payment_method = Some("card".to_string());
    let id = db.insert_transaction(&tx).unwrap().unwrap();

    db.insert_transaction(&new_transaction(
        TransactionType::Income,
        1000.0,
        "Salary",
        "Payroll",
        ymd(2024, 2, 1),
    ))
    .unwrap();

    let listed = db.list_transactions(10, 0).unwrap();
    assert_eq!(listed.len(), 2);
    // Newest first
    assert_eq!(listed[0].id, id.to_string());
    assert_eq!(listed[0].category, "Food");
    assert_eq!(listed[0].payment_method.as_deref(), Some("card"));
    assert_eq!(listed[1].tx_type, TransactionType::Income);

    let page = db.list_transactions(1, 1).unwrap();
    assert_eq!(page.len(), 1);
    assert_eq!(page[0].name, "Payroll");
}

#[test]
fn test_duplicate_insert_is_skipped() {
    let db = Database::in_memory().unwrap();
    let tx = new_transaction(
        TransactionType::Expense,
        15.99,
        "Entertainment",
        "Netflix",
        ymd(2024, 3, 1),
    );

    assert!(db.insert_transaction(&tx).unwrap().is_some());
    assert!(db.insert_transaction(&tx).unwrap().is_none());
    assert_eq!(db.count_transactions().unwrap(), 1);
}

#[test]
fn test_invalid_insert_is_rejected() {
    let db = Database::in_memory().unwrap();
    let tx = new_transaction(
        TransactionType::Expense,
        -5.0,
        "Food",
        "Refund?",
        ymd(2024, 3, 1),
    );

    let err = db.insert_transaction(&tx).unwrap_err();
    assert!(err.is_invalid_input());
    assert_eq!(db.count_transactions().unwrap(), 0);
}

#[test]
fn test_get_and_delete() {
    let db = Database::in_memory().unwrap();
    let id = db
        .insert_transaction(&new_transaction(
            TransactionType::Expense,
            9.0,
            "Coffee",
            "Cafe",
            ymd(2024, 3, 2),
        ))
        .unwrap()
        .unwrap();

    assert!(db.get_transaction(id).unwrap().is_some());
    db.delete_transaction(id).unwrap();
    assert!(db.get_transaction(id).unwrap().is_none());

    let err = db.delete_transaction(id).unwrap_err();
    assert!(matches!(err, Error::NotFound(_)));
}

#[test]
fn test_database_as_source() {
    let db = Database::in_memory().unwrap();
    for day in [5, 1, 3] {
        db.insert_transaction(&new_transaction(
            TransactionType::Expense,
            day as f64,
            "Food",
            &format!("Lunch {}", day),
            ymd(2024, 4, day),
        ))
        .unwrap();
    }

    let snapshot = db.fetch_transactions().unwrap();
    let days: Vec<u32> = snapshot
        .iter()
        .map(|tx| chrono::Datelike::day(&tx.date))
        .collect();
    assert_eq!(days, vec![1, 3, 5]);
    assert!(db.describe().starts_with("database"));
}

#[test]
fn test_reopen_keeps_data() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("fintrack.db");
    let path = path.to_string_lossy();

    {
        let db = Database::new(&path).unwrap();
        db.insert_transaction(&new_transaction(
            TransactionType::Income,
            10.0,
            "Gift",
            "Birthday",
            ymd(2024, 1, 1),
        ))
        .unwrap();
    }

    let db = Database::new(&path).unwrap();
    assert_eq!(db.count_transactions().unwrap(), 1);
}
