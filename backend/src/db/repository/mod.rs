//! Repository trait for abstracting the yard/record store.
//!
//! The store is a small key-value tree: yards keyed by name, and weekly record
//! lists keyed by week. Implementations can keep it in memory or in a file;
//! callers only see this trait.

use async_trait::async_trait;

use crate::models::{WeekKey, WeeklyHistory, WeeklyRecord, Yard, YardCatalog};

pub mod error;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

/// Store operations needed by the yard stock service.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` so a single instance can be shared
/// across request handlers.
#[async_trait]
pub trait YardRepository: Send + Sync {
    // ==================== Health & Connection ====================

    /// Check if the store is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    // ==================== Yard Operations ====================

    /// All yards keyed by name.
    async fn get_all_yards(&self) -> RepositoryResult<YardCatalog>;

    /// A single yard, `None` when absent.
    async fn get_yard(&self, name: &str) -> RepositoryResult<Option<Yard>>;

    /// Create or replace the yard stored under `yard.name`.
    async fn put_yard(&self, yard: &Yard) -> RepositoryResult<()>;

    /// Remove a yard. Its weekly records are left untouched.
    ///
    /// # Returns
    /// * `Ok(true)` if a yard was removed
    /// * `Ok(false)` if no yard had that name
    async fn delete_yard(&self, name: &str) -> RepositoryResult<bool>;

    // ==================== Weekly Record Operations ====================

    /// Every week with its records.
    async fn get_all_weekly_records(&self) -> RepositoryResult<WeeklyHistory>;

    /// Records of one week; empty when the week has none.
    async fn get_weekly_records(&self, week: WeekKey) -> RepositoryResult<Vec<WeeklyRecord>>;

    /// Store `record` under `week`, replacing the same yard's earlier record.
    ///
    /// # Returns
    /// * `Ok(true)` if an existing record was replaced
    /// * `Ok(false)` if the record was new for that week
    async fn upsert_weekly_record(
        &self,
        week: WeekKey,
        record: &WeeklyRecord,
    ) -> RepositoryResult<bool>;
}
