//! Week-by-week stock series for charting.

use serde::{Deserialize, Serialize};

use super::backfill::StockTimeline;
use crate::models::{Category, WeekKey, WeeklyHistory, Yard, YardCatalog};

/// Which yards a trend series covers.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum TrendFilter {
    /// Grand total over every yard.
    #[default]
    All,
    /// Total over the yards of one category.
    Category(Category),
    /// A single yard.
    Yard(String),
}

impl TrendFilter {
    fn includes(&self, yard: &Yard) -> bool {
        match self {
            TrendFilter::All => true,
            TrendFilter::Category(category) => &yard.category == category,
            TrendFilter::Yard(name) => &yard.name == name,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrendPoint {
    pub week: WeekKey,
    /// `None` only for a single-yard series with nothing reported yet.
    pub value: Option<u64>,
    /// At least one contribution was backfilled from an earlier week.
    pub estimated: bool,
}

/// One point per week present in `history`, oldest first.
pub fn weekly_trend(
    yards: &YardCatalog,
    history: &WeeklyHistory,
    filter: &TrendFilter,
) -> Vec<TrendPoint> {
    let timeline = StockTimeline::build(yards, history);
    let selected: Vec<&Yard> = yards.values().filter(|y| filter.includes(y)).collect();

    history
        .keys()
        .map(|&week| {
            let resolved: Vec<_> = selected
                .iter()
                .map(|y| timeline.resolve(&y.name, week))
                .collect();
            let estimated = resolved.iter().any(|s| s.is_backfilled());
            let value = match filter {
                TrendFilter::Yard(_) => resolved
                    .first()
                    .and_then(|s| s.value())
                    .map(u64::from),
                _ => Some(resolved.iter().map(|s| s.value_or_zero()).sum()),
            };
            TrendPoint {
                week,
                value,
                estimated,
            }
        })
        .collect()
}

#[cfg(test)]
#[path = "trends_tests.rs"]
mod trends_tests;
