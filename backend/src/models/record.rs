use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::week::WeekKey;

/// One stock count submitted by a yard for one week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyRecord {
    /// Name of the reporting yard.
    pub yard: String,
    pub stock: u32,
    /// Date the value was captured.
    pub reported_on: NaiveDate,
}

impl WeeklyRecord {
    pub fn new(yard: impl Into<String>, stock: u32, reported_on: NaiveDate) -> Self {
        Self {
            yard: yard.into(),
            stock,
            reported_on,
        }
    }
}

/// Sparse weekly observations: week key to the records submitted that week.
pub type WeeklyHistory = BTreeMap<WeekKey, Vec<WeeklyRecord>>;

/// Insert `record` under `week`, replacing any earlier record from the same yard.
///
/// Returns `true` when an existing record was replaced.
pub fn upsert_record(history: &mut WeeklyHistory, week: WeekKey, record: WeeklyRecord) -> bool {
    let records = history.entry(week).or_default();
    match records.iter_mut().find(|r| r.yard == record.yard) {
        Some(existing) => {
            *existing = record;
            true
        }
        None => {
            records.push(record);
            false
        }
    }
}
