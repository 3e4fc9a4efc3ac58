//! Weekly stock reconstruction and summarization.
//!
//! Given the yard catalog, the sparse weekly history and a target week, this
//! module derives one row per yard (current stock, week-over-week change,
//! reporting gap, band status) and a category-level summary. It is pure: no
//! I/O and no clock reads, the target week is always passed in.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use super::backfill::StockTimeline;
use super::band::{BandStatus, Reporting, Staleness};
use crate::models::{Category, WeekKey, WeeklyHistory, YardCatalog};

/// Inputs of a report: everything read from the store in one go.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Snapshot {
    pub yards: YardCatalog,
    pub history: WeeklyHistory,
}

impl Snapshot {
    pub fn new(yards: YardCatalog, history: WeeklyHistory) -> Self {
        Self { yards, history }
    }

    pub fn summarize(&self, target: WeekKey) -> StockReport {
        summarize(&self.yards, &self.history, target)
    }
}

/// Derived figures for one yard as of the target week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct YardStockRow {
    pub yard: String,
    pub owner: String,
    pub category: Category,
    pub min: Option<u32>,
    pub max: Option<u32>,
    /// Observed or backfilled stock; `None` when nothing was ever reported.
    pub current_stock: Option<u32>,
    /// True when `current_stock` comes from an earlier week.
    pub estimated: bool,
    /// Stock as of exactly one week before the target, backfilled the same way.
    pub previous_stock: Option<u32>,
    /// `current_stock - previous_stock`, only when both are known.
    pub delta: Option<i64>,
    pub reporting: Reporting,
    pub staleness: Staleness,
    pub last_report_week: Option<WeekKey>,
    pub last_report_date: Option<NaiveDate>,
    pub band: BandStatus,
    pub out_of_band: bool,
}

impl YardStockRow {
    pub fn reported_this_week(&self) -> bool {
        self.reporting.is_current()
    }

    pub fn unreported_weeks(&self) -> Option<u32> {
        self.reporting.unreported_weeks()
    }
}

/// Running totals per category bucket.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTotals {
    pub self_owned: u64,
    pub joint_venture: u64,
    pub external: u64,
    /// Yards whose stored category is outside the closed set.
    pub other: u64,
}

impl CategoryTotals {
    pub fn add(&mut self, category: &Category, stock: u64) {
        *self.bucket_mut(category) += stock;
    }

    pub fn get(&self, category: &Category) -> u64 {
        match category {
            Category::SelfOwned => self.self_owned,
            Category::JointVenture => self.joint_venture,
            Category::External => self.external,
            Category::Other(_) => self.other,
        }
    }

    pub fn sum(&self) -> u64 {
        self.self_owned + self.joint_venture + self.external + self.other
    }

    fn bucket_mut(&mut self, category: &Category) -> &mut u64 {
        match category {
            Category::SelfOwned => &mut self.self_owned,
            Category::JointVenture => &mut self.joint_venture,
            Category::External => &mut self.external,
            Category::Other(_) => &mut self.other,
        }
    }
}

/// Aggregate over all yards for the target week.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockSummary {
    pub week: WeekKey,
    pub yard_count: usize,
    /// Sum of every yard's current stock, unresolved counted as zero.
    pub total: u64,
    pub by_category: CategoryTotals,
    /// Yards without a record in the target week.
    pub unreported_yards: Vec<String>,
    /// Yards with no record at or before the target week.
    pub unresolved_yards: Vec<String>,
    pub out_of_band_yards: Vec<String>,
}

impl StockSummary {
    fn empty(week: WeekKey) -> Self {
        Self {
            week,
            yard_count: 0,
            total: 0,
            by_category: CategoryTotals::default(),
            unreported_yards: Vec::new(),
            unresolved_yards: Vec::new(),
            out_of_band_yards: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StockReport {
    pub summary: StockSummary,
    pub rows: Vec<YardStockRow>,
}

/// Reconstruct every yard's stock as of `target` and summarize it.
///
/// Rows follow the catalog order (yard name). Records of yards missing from
/// the catalog are ignored, as are records in weeks after `target`.
pub fn summarize(yards: &YardCatalog, history: &WeeklyHistory, target: WeekKey) -> StockReport {
    let timeline = StockTimeline::build(yards, history);
    let previous_week = target.previous();

    let mut summary = StockSummary::empty(target);
    let mut rows = Vec::with_capacity(yards.len());

    for (name, yard) in yards {
        let current = timeline.resolve(name, target);
        let previous = previous_week.map(|week| timeline.resolve(name, week));
        let last = timeline.latest_at_or_before(name, target);

        let current_stock = current.value();
        let previous_stock = previous.and_then(|p| p.value());
        let delta = current_stock
            .zip(previous_stock)
            .map(|(c, p)| i64::from(c) - i64::from(p));

        let reporting = Reporting::from_last_report(last.map(|(week, _)| week), target);
        let band = BandStatus::classify(current_stock, yard.min, yard.max);

        let contribution = current.value_or_zero();
        summary.total += contribution;
        summary.by_category.add(&yard.category, contribution);
        if !current.is_observed() {
            summary.unreported_yards.push(name.clone());
        }
        if current_stock.is_none() {
            summary.unresolved_yards.push(name.clone());
        }
        if band.is_out_of_band() {
            summary.out_of_band_yards.push(name.clone());
        }

        rows.push(YardStockRow {
            yard: name.clone(),
            owner: yard.owner.clone(),
            category: yard.category.clone(),
            min: yard.min,
            max: yard.max,
            current_stock,
            estimated: current.is_backfilled(),
            previous_stock,
            delta,
            reporting,
            staleness: reporting.staleness(),
            last_report_week: last.map(|(week, _)| week),
            last_report_date: last.map(|(_, record)| record.reported_on),
            band,
            out_of_band: band.is_out_of_band(),
        });
    }

    summary.yard_count = rows.len();
    StockReport { summary, rows }
}

#[cfg(test)]
#[path = "stock_report_tests.rs"]
mod stock_report_tests;
