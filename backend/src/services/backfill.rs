//! Backfill of missing weekly reports.
//!
//! Every consumer that needs "the stock of yard X as of week W" goes through
//! [`StockTimeline`], so the summary table, the previous-week comparison and
//! the trend series all resolve gaps the same way.

use std::collections::{BTreeMap, HashMap};

use serde::{Deserialize, Serialize};

use crate::models::{WeekKey, WeeklyHistory, WeeklyRecord, YardCatalog};

/// Stock of a yard as of some week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "source", rename_all = "snake_case")]
pub enum EffectiveStock {
    /// The yard reported in that very week.
    Observed { stock: u32 },
    /// The yard did not report; the most recent earlier report stands in.
    Backfilled { stock: u32, from: WeekKey },
    /// Nothing reported at or before that week.
    Unresolved,
}

impl EffectiveStock {
    pub fn value(&self) -> Option<u32> {
        match self {
            EffectiveStock::Observed { stock } | EffectiveStock::Backfilled { stock, .. } => {
                Some(*stock)
            }
            EffectiveStock::Unresolved => None,
        }
    }

    /// Contribution to sums, counting unresolved stock as zero.
    pub fn value_or_zero(&self) -> u64 {
        self.value().map(u64::from).unwrap_or(0)
    }

    pub fn is_observed(&self) -> bool {
        matches!(self, EffectiveStock::Observed { .. })
    }

    pub fn is_backfilled(&self) -> bool {
        matches!(self, EffectiveStock::Backfilled { .. })
    }
}

/// Per-yard index of the weekly history.
///
/// Only yards present in the catalog are indexed; records from unknown yards
/// are ignored. When a week holds more than one record for a yard the first
/// one wins.
#[derive(Debug, Default)]
pub struct StockTimeline<'a> {
    by_yard: HashMap<&'a str, BTreeMap<WeekKey, &'a WeeklyRecord>>,
}

impl<'a> StockTimeline<'a> {
    pub fn build(yards: &YardCatalog, history: &'a WeeklyHistory) -> Self {
        let mut by_yard: HashMap<&'a str, BTreeMap<WeekKey, &'a WeeklyRecord>> = HashMap::new();
        for (week, records) in history {
            for record in records {
                if !yards.contains_key(&record.yard) {
                    continue;
                }
                by_yard
                    .entry(record.yard.as_str())
                    .or_default()
                    .entry(*week)
                    .or_insert(record);
            }
        }
        Self { by_yard }
    }

    /// Most recent record of `yard` in `week` or any earlier week.
    pub fn latest_at_or_before(
        &self,
        yard: &str,
        week: WeekKey,
    ) -> Option<(WeekKey, &'a WeeklyRecord)> {
        self.by_yard
            .get(yard)?
            .range(..=week)
            .next_back()
            .map(|(w, r)| (*w, *r))
    }

    /// Stock of `yard` as of `week`, backfilled from the nearest earlier week.
    pub fn resolve(&self, yard: &str, week: WeekKey) -> EffectiveStock {
        match self.latest_at_or_before(yard, week) {
            Some((found, record)) if found == week => EffectiveStock::Observed {
                stock: record.stock,
            },
            Some((found, record)) => EffectiveStock::Backfilled {
                stock: record.stock,
                from: found,
            },
            None => EffectiveStock::Unresolved,
        }
    }
}
