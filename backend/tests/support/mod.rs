//! Shared helpers for integration tests.
#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Mutex;

use chrono::NaiveDate;
use yard_stock::db::repositories::LocalRepository;
use yard_stock::models::{
    upsert_record, Category, WeekKey, WeeklyHistory, WeeklyRecord, Yard, YardCatalog,
};
use yard_stock::services::Snapshot;

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// Restores the previous values on drop, unwinding included, and holds a
/// process-wide lock so parallel tests never observe each other's changes.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    saved: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let saved = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { saved }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.saved.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

pub fn week(s: &str) -> WeekKey {
    s.parse().unwrap()
}

pub fn day(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Three yards, one per category, over three weeks of January 2024.
///
/// | week       | North (self, 10..50) | South (JV, no band) | Port (ext, min 5) |
/// |------------|----------------------|---------------------|-------------------|
/// | 2024-01-01 | 40                   |                     | 12                |
/// | 2024-01-08 | 60                   | 7                   |                   |
/// | 2024-01-15 |                      | 9                   |                   |
pub fn sample_snapshot() -> Snapshot {
    let yards: YardCatalog = [
        Yard::new("North", Category::SelfOwned)
            .with_owner("ACME Logistics")
            .with_band(Some(10), Some(50)),
        Yard::new("South", Category::JointVenture).with_owner("Southern JV"),
        Yard::new("Port", Category::External).with_band(Some(5), None),
    ]
    .into_iter()
    .map(|y| (y.name.clone(), y))
    .collect();

    let mut history = WeeklyHistory::new();
    for (w, yard, stock, reported) in [
        ("2024-01-01", "North", 40, day(2024, 1, 2)),
        ("2024-01-01", "Port", 12, day(2024, 1, 3)),
        ("2024-01-08", "North", 60, day(2024, 1, 9)),
        ("2024-01-08", "South", 7, day(2024, 1, 8)),
        ("2024-01-15", "South", 9, day(2024, 1, 16)),
    ] {
        upsert_record(&mut history, week(w), WeeklyRecord::new(yard, stock, reported));
    }

    Snapshot::new(yards, history)
}

pub fn sample_repository() -> LocalRepository {
    LocalRepository::with_snapshot(sample_snapshot())
}
