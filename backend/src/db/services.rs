//! High-level store service layer.
//!
//! Repository-agnostic operations that work with any [`YardRepository`]. The
//! business rules that must hold regardless of backend live here: yard
//! validation, stock submission checks, and the tolerant snapshot read that
//! feeds the pure computations in [`crate::services`].
//!
//! # Usage
//!
//! ```no_run
//! use yard_stock::db::{services, repositories::LocalRepository};
//! use yard_stock::models::WeekKey;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let repo = LocalRepository::new();
//!     let today = chrono::Local::now().date_naive();
//!     let week = WeekKey::containing(today).ok_or("date out of range")?;
//!     let report = services::build_stock_report(&repo, week).await;
//!     println!("Total stock: {}", report.summary.total);
//!     Ok(())
//! }
//! ```

use chrono::NaiveDate;
use log::{info, warn};
use serde::{Deserialize, Serialize};

use super::repository::{ErrorContext, RepositoryError, RepositoryResult, YardRepository};
use crate::models::{WeekKey, WeeklyHistory, WeeklyRecord, Yard, YardCatalog};
use crate::services::{weekly_trend, Snapshot, StockReport, TrendFilter, TrendPoint};

// ==================== Health & Connection ====================

/// Check if the store is healthy.
pub async fn health_check<R: YardRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Yard Operations ====================

/// List every yard, ordered by name.
pub async fn list_yards<R: YardRepository + ?Sized>(repo: &R) -> RepositoryResult<Vec<Yard>> {
    let yards = repo.get_all_yards().await?;
    Ok(yards.into_values().collect())
}

/// Fetch a yard, failing with `NotFound` when it does not exist.
pub async fn get_yard<R: YardRepository + ?Sized>(repo: &R, name: &str) -> RepositoryResult<Yard> {
    repo.get_yard(name).await?.ok_or_else(|| {
        RepositoryError::not_found_with_context(
            format!("Yard '{}' not found", name),
            ErrorContext::new("get_yard")
                .with_entity("yard")
                .with_entity_id(name),
        )
    })
}

/// Create or update a yard.
///
/// Rejects yards that fail [`Yard::validate`] and yards whose category is
/// outside the closed set. Legacy categories can still be read back from
/// the store, but no new data is written with them.
pub async fn save_yard<R: YardRepository + ?Sized>(repo: &R, yard: &Yard) -> RepositoryResult<()> {
    let context = || {
        ErrorContext::new("save_yard")
            .with_entity("yard")
            .with_entity_id(&yard.name)
    };

    yard.validate()
        .map_err(|e| RepositoryError::validation_with_context(e, context()))?;

    if !yard.category.is_known() {
        return Err(RepositoryError::validation_with_context(
            format!("Unknown category '{}'", yard.category),
            context(),
        ));
    }

    info!(
        "Service layer: saving yard '{}' ({}, band {:?}..{:?})",
        yard.name, yard.category, yard.min, yard.max
    );
    repo.put_yard(yard).await
}

/// Delete a yard. Its weekly records stay in the store.
pub async fn delete_yard<R: YardRepository + ?Sized>(repo: &R, name: &str) -> RepositoryResult<()> {
    if !repo.delete_yard(name).await? {
        return Err(RepositoryError::not_found_with_context(
            format!("Yard '{}' not found", name),
            ErrorContext::new("delete_yard")
                .with_entity("yard")
                .with_entity_id(name),
        ));
    }
    info!("Service layer: deleted yard '{}'", name);
    Ok(())
}

// ==================== Weekly Record Operations ====================

/// Outcome of a stock submission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSubmission {
    pub week: WeekKey,
    pub record: WeeklyRecord,
    /// Whether an earlier submission for the same yard and week was overwritten.
    pub replaced: bool,
}

/// Record a stock count for a yard.
///
/// The week is derived from `date` (defaulting to `today`) and the record is
/// stamped with `today` as its report date. Negative or oversized counts and
/// unknown yards are rejected.
pub async fn submit_stock<R: YardRepository + ?Sized>(
    repo: &R,
    yard: &str,
    stock: i64,
    date: Option<NaiveDate>,
    today: NaiveDate,
) -> RepositoryResult<StockSubmission> {
    let context = || {
        ErrorContext::new("submit_stock")
            .with_entity("weekly_record")
            .with_entity_id(yard)
    };

    let stock = u32::try_from(stock).map_err(|_| {
        RepositoryError::validation_with_context(
            format!("Stock must be a non-negative whole number, got {}", stock),
            context(),
        )
    })?;

    if repo.get_yard(yard).await?.is_none() {
        return Err(RepositoryError::validation_with_context(
            format!("Unknown yard '{}'", yard),
            context(),
        ));
    }

    let date = date.unwrap_or(today);
    let week = WeekKey::containing(date).ok_or_else(|| {
        RepositoryError::validation_with_context(
            format!("Date {} is outside the supported calendar range", date),
            context(),
        )
    })?;
    let record = WeeklyRecord::new(yard, stock, today);
    let replaced = repo.upsert_weekly_record(week, &record).await?;

    info!(
        "Service layer: stock {} for yard '{}' in week {}{}",
        stock,
        yard,
        week,
        if replaced { " (replaced)" } else { "" }
    );

    Ok(StockSubmission {
        week,
        record,
        replaced,
    })
}

/// Every week with its records.
pub async fn list_weekly_records<R: YardRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<WeeklyHistory> {
    repo.get_all_weekly_records().await
}

/// Records submitted for one week.
pub async fn get_week_records<R: YardRepository + ?Sized>(
    repo: &R,
    week: WeekKey,
) -> RepositoryResult<Vec<WeeklyRecord>> {
    repo.get_weekly_records(week).await
}

// ==================== Derived Data ====================

/// Read the catalog and the weekly history concurrently.
///
/// A failed read is logged and replaced by an empty mapping, so callers
/// always get something they can summarize.
pub async fn load_snapshot<R: YardRepository + ?Sized>(repo: &R) -> Snapshot {
    let (yards, history) = futures::join!(repo.get_all_yards(), repo.get_all_weekly_records());

    let yards = yards.unwrap_or_else(|e| {
        warn!("Service layer: failed to read yards, using empty catalog: {}", e);
        YardCatalog::new()
    });
    let history = history.unwrap_or_else(|e| {
        warn!("Service layer: failed to read weekly records, using empty history: {}", e);
        WeeklyHistory::new()
    });

    Snapshot::new(yards, history)
}

/// Reconstruct every yard's stock as of `week` and summarize it.
pub async fn build_stock_report<R: YardRepository + ?Sized>(repo: &R, week: WeekKey) -> StockReport {
    let snapshot = load_snapshot(repo).await;
    let report = snapshot.summarize(week);
    info!(
        "Service layer: report for week {}: {} yards, total {}, {} unreported",
        week,
        report.summary.yard_count,
        report.summary.total,
        report.summary.unreported_yards.len()
    );
    report
}

/// Weekly stock series for the given filter.
pub async fn build_trend<R: YardRepository + ?Sized>(
    repo: &R,
    filter: &TrendFilter,
) -> Vec<TrendPoint> {
    let snapshot = load_snapshot(repo).await;
    weekly_trend(&snapshot.yards, &snapshot.history, filter)
}
