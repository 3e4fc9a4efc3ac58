//! In-memory local repository implementation.
//!
//! Stores the catalog and the weekly history in memory, giving fast,
//! deterministic and isolated behaviour for tests and local development.

use async_trait::async_trait;
use parking_lot::RwLock;
use std::sync::Arc;

use crate::db::repository::*;
use crate::models::{upsert_record, WeekKey, WeeklyHistory, WeeklyRecord, Yard, YardCatalog};
use crate::services::Snapshot;

/// In-memory local repository.
///
/// Clones share the same underlying data.
///
/// # Example
/// ```
/// use yard_stock::db::repositories::LocalRepository;
/// use yard_stock::db::repository::YardRepository;
/// use yard_stock::models::{Category, Yard};
///
/// # tokio_test_block(async {
/// let repo = LocalRepository::new();
/// repo.put_yard(&Yard::new("North", Category::SelfOwned)).await.unwrap();
/// assert_eq!(repo.yard_count(), 1);
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) -> F::Output {
/// #     tokio::runtime::Runtime::new().unwrap().block_on(f)
/// # }
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    yards: YardCatalog,
    history: WeeklyHistory,

    // Connection health
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            yards: YardCatalog::new(),
            history: WeeklyHistory::new(),
            is_healthy: true,
        }
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Create a repository pre-populated with `snapshot`.
    pub fn with_snapshot(snapshot: Snapshot) -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData {
                yards: snapshot.yards,
                history: snapshot.history,
                is_healthy: true,
            })),
        }
    }

    /// Set the health status for testing connection failures.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        data.yards.clear();
        data.history.clear();
    }

    /// Replace the stored yards and records, keeping the health flag.
    pub fn restore(&self, snapshot: Snapshot) {
        let mut data = self.data.write();
        data.yards = snapshot.yards;
        data.history = snapshot.history;
    }

    /// Copy of everything currently stored.
    pub fn snapshot(&self) -> Snapshot {
        let data = self.data.read();
        Snapshot::new(data.yards.clone(), data.history.clone())
    }

    /// Get the number of yards stored.
    pub fn yard_count(&self) -> usize {
        self.data.read().yards.len()
    }

    /// Total number of weekly records across all weeks.
    pub fn record_count(&self) -> usize {
        self.data.read().history.values().map(Vec::len).sum()
    }

    /// Helper to check health and return error if unhealthy.
    fn check_health(&self, operation: &str) -> RepositoryResult<()> {
        if !self.data.read().is_healthy {
            return Err(RepositoryError::connection("Store is not healthy").with_operation(operation));
        }
        Ok(())
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl YardRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn get_all_yards(&self) -> RepositoryResult<YardCatalog> {
        self.check_health("get_all_yards")?;
        Ok(self.data.read().yards.clone())
    }

    async fn get_yard(&self, name: &str) -> RepositoryResult<Option<Yard>> {
        self.check_health("get_yard")?;
        Ok(self.data.read().yards.get(name).cloned())
    }

    async fn put_yard(&self, yard: &Yard) -> RepositoryResult<()> {
        self.check_health("put_yard")?;
        self.data
            .write()
            .yards
            .insert(yard.name.clone(), yard.clone());
        Ok(())
    }

    async fn delete_yard(&self, name: &str) -> RepositoryResult<bool> {
        self.check_health("delete_yard")?;
        Ok(self.data.write().yards.remove(name).is_some())
    }

    async fn get_all_weekly_records(&self) -> RepositoryResult<WeeklyHistory> {
        self.check_health("get_all_weekly_records")?;
        Ok(self.data.read().history.clone())
    }

    async fn get_weekly_records(&self, week: WeekKey) -> RepositoryResult<Vec<WeeklyRecord>> {
        self.check_health("get_weekly_records")?;
        Ok(self
            .data
            .read()
            .history
            .get(&week)
            .cloned()
            .unwrap_or_default())
    }

    async fn upsert_weekly_record(
        &self,
        week: WeekKey,
        record: &WeeklyRecord,
    ) -> RepositoryResult<bool> {
        self.check_health("upsert_weekly_record")?;
        let mut data = self.data.write();
        Ok(upsert_record(&mut data.history, week, record.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Category;
    use chrono::NaiveDate;

    fn week(s: &str) -> WeekKey {
        s.parse().unwrap()
    }

    fn record(yard: &str, stock: u32) -> WeeklyRecord {
        WeeklyRecord::new(yard, stock, NaiveDate::from_ymd_opt(2024, 1, 9).unwrap())
    }

    #[tokio::test]
    async fn test_health_check() {
        let repo = LocalRepository::new();
        assert!(repo.health_check().await.unwrap());
        repo.set_healthy(false);
        assert!(!repo.health_check().await.unwrap());
    }

    #[tokio::test]
    async fn test_unhealthy_store_fails_reads() {
        let repo = LocalRepository::new();
        repo.set_healthy(false);
        let err = repo.get_all_yards().await.unwrap_err();
        assert!(matches!(err, RepositoryError::ConnectionError { .. }));
        assert!(err.is_retryable());
    }

    #[tokio::test]
    async fn test_put_get_and_replace_yard() {
        let repo = LocalRepository::new();
        repo.put_yard(&Yard::new("North", Category::SelfOwned))
            .await
            .unwrap();
        repo.put_yard(&Yard::new("North", Category::External).with_owner("ACME"))
            .await
            .unwrap();

        let yard = repo.get_yard("North").await.unwrap().unwrap();
        assert_eq!(yard.category, Category::External);
        assert_eq!(yard.owner, "ACME");
        assert_eq!(repo.yard_count(), 1);
        assert!(repo.get_yard("South").await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_delete_yard_keeps_records() {
        let repo = LocalRepository::new();
        repo.put_yard(&Yard::new("North", Category::SelfOwned))
            .await
            .unwrap();
        repo.upsert_weekly_record(week("2024-01-08"), &record("North", 5))
            .await
            .unwrap();

        assert!(repo.delete_yard("North").await.unwrap());
        assert!(!repo.delete_yard("North").await.unwrap());
        assert_eq!(repo.yard_count(), 0);
        assert_eq!(repo.record_count(), 1);
    }

    #[tokio::test]
    async fn test_upsert_and_read_weekly_records() {
        let repo = LocalRepository::new();
        let w = week("2024-01-08");
        assert!(!repo.upsert_weekly_record(w, &record("North", 5)).await.unwrap());
        assert!(repo.upsert_weekly_record(w, &record("North", 8)).await.unwrap());
        repo.upsert_weekly_record(w, &record("South", 2))
            .await
            .unwrap();

        let records = repo.get_weekly_records(w).await.unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].stock, 8);
        assert!(repo
            .get_weekly_records(week("2024-02-05"))
            .await
            .unwrap()
            .is_empty());
        assert_eq!(repo.get_all_weekly_records().await.unwrap().len(), 1);
    }

    #[tokio::test]
    async fn test_clones_share_state() {
        let repo = LocalRepository::new();
        let other = repo.clone();
        other
            .put_yard(&Yard::new("North", Category::SelfOwned))
            .await
            .unwrap();
        assert_eq!(repo.yard_count(), 1);
        repo.clear();
        assert_eq!(other.yard_count(), 0);
    }
}
