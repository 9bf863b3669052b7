//! Memoized analysis results
//!
//! Stats and insights are pure functions of (snapshot, reference date), so
//! results are keyed on a SHA-256 fingerprint of the snapshot plus the date.
//! Any change to the underlying transactions yields a new key; stale entries
//! simply age out.

use std::collections::{HashMap, VecDeque};
use std::sync::Arc;

use chrono::NaiveDate;
use tokio::sync::Mutex;

use fintrack_core::{
    compute_stats_as_of, fingerprint, Insight, InsightEngine, Result, StatsSnapshot, Transaction,
};

/// Engine output for one snapshot and reference date
#[derive(Debug, Clone, PartialEq)]
pub struct Analysis {
    pub stats: StatsSnapshot,
    pub insights: Vec<Insight>,
}

#[derive(Default)]
struct Entries {
    map: HashMap<String, Arc<Analysis>>,
    /// Insertion order, oldest first
    order: VecDeque<String>,
}

/// Bounded FIFO cache of analysis results
pub struct AnalysisCache {
    capacity: usize,
    entries: Mutex<Entries>,
}

impl AnalysisCache {
    pub fn new(capacity: usize) -> Self {
        Self {
            capacity,
            entries: Mutex::new(Entries::default()),
        }
    }

    /// Cached analysis for the snapshot, computing it on a miss
    pub async fn get_or_compute(
        &self,
        engine: &InsightEngine,
        transactions: &[Transaction],
        as_of: NaiveDate,
    ) -> Result<Arc<Analysis>> {
        let key = format!("{}:{}", fingerprint(transactions)?, as_of);

        if let Some(hit) = self.entries.lock().await.map.get(&key) {
            tracing::debug!(key = %key, "Analysis cache hit");
            return Ok(hit.clone());
        }

        let analysis = Arc::new(Analysis {
            stats: compute_stats_as_of(transactions, as_of),
            insights: engine.analyze(transactions, as_of),
        });

        if self.capacity == 0 {
            return Ok(analysis);
        }

        let mut entries = self.entries.lock().await;
        if !entries.map.contains_key(&key) {
            while entries.order.len() >= self.capacity {
                if let Some(oldest) = entries.order.pop_front() {
                    entries.map.remove(&oldest);
                }
            }
            entries.order.push_back(key.clone());
        }
        entries.map.insert(key, analysis.clone());

        Ok(analysis)
    }

    pub async fn len(&self) -> usize {
        self.entries.lock().await.map.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fintrack_core::test_utils::{expense, income, ymd};

    #[tokio::test]
    async fn test_hit_returns_same_result() {
        let cache = AnalysisCache::new(4);
        let engine = InsightEngine::new();
        let txs = vec![
            income(1000.0, "Salary", ymd(2024, 2, 1)),
            expense(100.0, "Food", ymd(2024, 2, 2)),
        ];

        let first = cache.get_or_compute(&engine, &txs, ymd(2024, 2, 10)).await.unwrap();
        let second = cache.get_or_compute(&engine, &txs, ymd(2024, 2, 10)).await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(cache.len().await, 1);

        // Different reference date is a different entry
        cache.get_or_compute(&engine, &txs, ymd(2024, 3, 10)).await.unwrap();
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_content_change_misses() {
        let cache = AnalysisCache::new(4);
        let engine = InsightEngine::new();
        let mut txs = vec![income(1000.0, "Salary", ymd(2024, 2, 1))];
        let as_of = ymd(2024, 2, 10);

        let before = cache.get_or_compute(&engine, &txs, as_of).await.unwrap();
        txs.push(expense(900.0, "Rent", ymd(2024, 2, 3)));
        let after = cache.get_or_compute(&engine, &txs, as_of).await.unwrap();

        assert_eq!(before.stats.monthly_expenses, 0.0);
        assert_eq!(after.stats.monthly_expenses, 900.0);
    }

    #[tokio::test]
    async fn test_capacity_evicts_oldest() {
        let cache = AnalysisCache::new(2);
        let engine = InsightEngine::new();
        let txs = vec![income(10.0, "Gift", ymd(2024, 1, 1))];

        for month in 1..=3 {
            cache
                .get_or_compute(&engine, &txs, ymd(2024, month, 1))
                .await
                .unwrap();
        }
        assert_eq!(cache.len().await, 2);

        // The January entry was evicted and is recomputed
        let again = cache
            .get_or_compute(&engine, &txs, ymd(2024, 1, 1))
            .await
            .unwrap();
        assert_eq!(again.stats.monthly_income, 10.0);
        assert_eq!(cache.len().await, 2);
    }

    #[tokio::test]
    async fn test_zero_capacity_disables_caching() {
        let cache = AnalysisCache::new(0);
        let engine = InsightEngine::new();
        cache.get_or_compute(&engine, &[], ymd(2024, 1, 1)).await.unwrap();
        assert_eq!(cache.len().await, 0);
    }
}
