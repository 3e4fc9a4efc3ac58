//! JSON-file repository implementation.
//!
//! Keeps the store in a single JSON document laid out as a key-value tree:
//!
//! ```text
//! {
//!   "Yard":          { "<name>": { "Company", "Class", "Min", "Max" } },
//!   "weeklyRecords": { "<YYYY-MM-DD>": { "records": [
//!       { "dealer", "stock", "status", "lastUpdated" } ] } }
//! }
//! ```
//!
//! The document is loaded into a [`LocalRepository`] on open and rewritten
//! after every mutation (write to a sibling temp file, then rename). A
//! mutation becomes visible to readers only after the rewrite succeeds.

use async_trait::async_trait;
use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::BTreeMap;
use std::path::{Path, PathBuf};
use tokio::sync::Mutex;

use super::local::LocalRepository;
use crate::db::repository::*;
use crate::models::{
    upsert_record, Category, WeekKey, WeeklyHistory, WeeklyRecord, Yard, YardCatalog,
};
use crate::services::Snapshot;

const REPORTED_STATUS: &str = "Reported";

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoreDocument {
    #[serde(rename = "Yard", default)]
    yards: BTreeMap<String, StoredYard>,
    #[serde(rename = "weeklyRecords", default)]
    weekly_records: BTreeMap<String, StoredWeek>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredYard {
    #[serde(rename = "Company", default)]
    company: String,
    #[serde(rename = "Class", default)]
    class: String,
    #[serde(rename = "Min", default)]
    min: Value,
    #[serde(rename = "Max", default)]
    max: Value,
}

#[derive(Debug, Default, Serialize, Deserialize)]
struct StoredWeek {
    #[serde(default)]
    records: Vec<StoredRecord>,
}

#[derive(Debug, Serialize, Deserialize)]
struct StoredRecord {
    dealer: String,
    #[serde(default)]
    stock: Value,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    status: Option<String>,
    #[serde(rename = "lastUpdated", default, skip_serializing_if = "Option::is_none")]
    last_updated: Option<String>,
}

/// Read a non-negative whole number out of a loosely typed store value.
///
/// Numbers and numeric strings are accepted; anything negative, fractional,
/// non-numeric or beyond `u32` yields `None`.
fn count_value(value: &Value) -> Option<u32> {
    match value {
        Value::Number(n) => {
            if let Some(u) = n.as_u64() {
                return u32::try_from(u).ok();
            }
            n.as_f64()
                .filter(|f| f.is_finite() && *f >= 0.0 && f.fract() == 0.0 && *f <= u32::MAX as f64)
                .map(|f| f as u32)
        }
        Value::String(s) => s.trim().parse::<u32>().ok(),
        _ => None,
    }
}

fn threshold_value(threshold: Option<u32>) -> Value {
    threshold.map(Value::from).unwrap_or(Value::Null)
}

impl StoreDocument {
    fn into_snapshot(self) -> Snapshot {
        let yards: YardCatalog = self
            .yards
            .into_iter()
            .map(|(name, stored)| {
                let yard = Yard {
                    name: name.clone(),
                    owner: stored.company,
                    category: Category::from(stored.class),
                    min: count_value(&stored.min),
                    max: count_value(&stored.max),
                };
                (name, yard)
            })
            .collect();

        let mut history = WeeklyHistory::new();
        for (key, week) in self.weekly_records {
            let week_key: WeekKey = match key.parse() {
                Ok(k) => k,
                Err(e) => {
                    log::warn!("Skipping weekly records under invalid key: {}", e);
                    continue;
                }
            };
            for stored in week.records {
                let Some(stock) = count_value(&stored.stock) else {
                    log::warn!(
                        "Dropping record for yard '{}' in week {}: invalid stock {}",
                        stored.dealer,
                        week_key,
                        stored.stock
                    );
                    continue;
                };
                let reported_on = stored
                    .last_updated
                    .as_deref()
                    .and_then(|d| NaiveDate::parse_from_str(d.trim(), "%Y-%m-%d").ok())
                    .unwrap_or_else(|| week_key.date());

                let records = history.entry(week_key).or_default();
                if records.iter().any(|r| r.yard == stored.dealer) {
                    log::debug!(
                        "Ignoring duplicate record for yard '{}' in week {}",
                        stored.dealer,
                        week_key
                    );
                    continue;
                }
                records.push(WeeklyRecord::new(stored.dealer, stock, reported_on));
            }
        }
        history.retain(|_, records| !records.is_empty());

        Snapshot::new(yards, history)
    }

    fn from_snapshot(snapshot: &Snapshot) -> Self {
        let yards = snapshot
            .yards
            .iter()
            .map(|(name, yard)| {
                let stored = StoredYard {
                    company: yard.owner.clone(),
                    class: yard.category.label().to_string(),
                    min: threshold_value(yard.min),
                    max: threshold_value(yard.max),
                };
                (name.clone(), stored)
            })
            .collect();

        let weekly_records = snapshot
            .history
            .iter()
            .map(|(week, records)| {
                let records = records
                    .iter()
                    .map(|r| StoredRecord {
                        dealer: r.yard.clone(),
                        stock: Value::from(r.stock),
                        status: Some(REPORTED_STATUS.to_string()),
                        last_updated: Some(r.reported_on.format("%Y-%m-%d").to_string()),
                    })
                    .collect();
                (week.to_string(), StoredWeek { records })
            })
            .collect();

        Self {
            yards,
            weekly_records,
        }
    }
}

/// Parse a store document.
///
/// Week keys are normalised to their Monday, so two stored keys of the same
/// week are merged. Records with missing, negative or non-numeric stock are
/// dropped with a warning. Within a week the first record of a yard wins.
pub fn parse_document(json: &str) -> RepositoryResult<Snapshot> {
    if json.trim().is_empty() {
        return Ok(Snapshot::default());
    }
    let document: StoreDocument = serde_json::from_str(json)?;
    Ok(document.into_snapshot())
}

/// Render a snapshot as a pretty-printed store document.
pub fn render_document(snapshot: &Snapshot) -> RepositoryResult<String> {
    Ok(serde_json::to_string_pretty(&StoreDocument::from_snapshot(
        snapshot,
    ))?)
}

/// Repository persisted to a JSON document on disk.
pub struct FileRepository {
    path: PathBuf,
    inner: LocalRepository,
    // Held across stage, persist and commit so concurrent writers cannot
    // lose each other's changes.
    write_lock: Mutex<()>,
}

impl FileRepository {
    /// Open the store at `path`. A missing file is an empty store; it is
    /// created on the first mutation.
    pub async fn open(path: impl AsRef<Path>) -> RepositoryResult<Self> {
        let path = path.as_ref().to_path_buf();
        let snapshot = match tokio::fs::read_to_string(&path).await {
            Ok(content) => parse_document(&content).map_err(|e| e.with_operation("open"))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                log::info!("Store file {} not found, starting empty", path.display());
                Snapshot::default()
            }
            Err(e) => return Err(RepositoryError::from(e).with_operation("open")),
        };

        log::info!(
            "Opened store {} ({} yards, {} weeks)",
            path.display(),
            snapshot.yards.len(),
            snapshot.history.len()
        );

        Ok(Self {
            path,
            inner: LocalRepository::with_snapshot(snapshot),
            write_lock: Mutex::new(()),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Write `staged` to disk and only then make it visible to readers.
    /// On failure the in-memory store is left untouched.
    async fn commit(&self, staged: Snapshot, operation: &str) -> RepositoryResult<()> {
        self.persist(&staged, operation).await?;
        self.inner.restore(staged);
        Ok(())
    }

    async fn persist(&self, snapshot: &Snapshot, operation: &str) -> RepositoryResult<()> {
        let content = render_document(snapshot)?;

        if let Some(parent) = self.path.parent().filter(|p| !p.as_os_str().is_empty()) {
            tokio::fs::create_dir_all(parent)
                .await
                .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
        }

        let mut tmp_name = self.path.as_os_str().to_os_string();
        tmp_name.push(".tmp");
        let tmp_path = PathBuf::from(tmp_name);

        tokio::fs::write(&tmp_path, content)
            .await
            .map_err(|e| RepositoryError::from(e).with_operation(operation))?;
        if let Err(e) = tokio::fs::rename(&tmp_path, &self.path).await {
            if let Err(cleanup) = tokio::fs::remove_file(&tmp_path).await {
                log::warn!("Failed to remove {}: {}", tmp_path.display(), cleanup);
            }
            return Err(RepositoryError::from(e).with_operation(operation));
        }

        log::debug!("Persisted store to {}", self.path.display());
        Ok(())
    }
}

#[async_trait]
impl YardRepository for FileRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        self.inner.health_check().await
    }

    async fn get_all_yards(&self) -> RepositoryResult<YardCatalog> {
        self.inner.get_all_yards().await
    }

    async fn get_yard(&self, name: &str) -> RepositoryResult<Option<Yard>> {
        self.inner.get_yard(name).await
    }

    async fn put_yard(&self, yard: &Yard) -> RepositoryResult<()> {
        let _guard = self.write_lock.lock().await;
        let mut staged = self.inner.snapshot();
        staged.yards.insert(yard.name.clone(), yard.clone());
        self.commit(staged, "put_yard").await
    }

    async fn delete_yard(&self, name: &str) -> RepositoryResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut staged = self.inner.snapshot();
        if staged.yards.remove(name).is_none() {
            return Ok(false);
        }
        self.commit(staged, "delete_yard").await?;
        Ok(true)
    }

    async fn get_all_weekly_records(&self) -> RepositoryResult<WeeklyHistory> {
        self.inner.get_all_weekly_records().await
    }

    async fn get_weekly_records(&self, week: WeekKey) -> RepositoryResult<Vec<WeeklyRecord>> {
        self.inner.get_weekly_records(week).await
    }

    async fn upsert_weekly_record(
        &self,
        week: WeekKey,
        record: &WeeklyRecord,
    ) -> RepositoryResult<bool> {
        let _guard = self.write_lock.lock().await;
        let mut staged = self.inner.snapshot();
        let replaced = upsert_record(&mut staged.history, week, record.clone());
        self.commit(staged, "upsert_weekly_record").await?;
        Ok(replaced)
    }
}
