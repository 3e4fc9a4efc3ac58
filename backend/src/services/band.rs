//! Threshold band and reporting-staleness classification.

use serde::{Deserialize, Serialize};

use crate::models::WeekKey;

/// Where a stock value sits relative to a yard's `[min, max]` band.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BandStatus {
    /// At least one threshold is not configured.
    NoLimits,
    /// Both thresholds are set but there is no stock to compare.
    Unknown,
    BelowMin,
    WithinBand,
    AboveMax,
}

impl BandStatus {
    /// Compare `stock` against the closed interval `[min, max]`.
    pub fn classify(stock: Option<u32>, min: Option<u32>, max: Option<u32>) -> Self {
        let Some((min, max)) = min.zip(max) else {
            return BandStatus::NoLimits;
        };
        match stock {
            None => BandStatus::Unknown,
            Some(s) if s < min => BandStatus::BelowMin,
            Some(s) if s > max => BandStatus::AboveMax,
            Some(_) => BandStatus::WithinBand,
        }
    }

    pub fn is_out_of_band(self) -> bool {
        matches!(self, BandStatus::BelowMin | BandStatus::AboveMax)
    }
}

/// Whether and when a yard last reported, as of some target week.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "state", rename_all = "snake_case")]
pub enum Reporting {
    /// Reported in the target week.
    Current,
    /// Last reported `weeks` whole weeks before the target week.
    Lapsed { weeks: u32 },
    /// No report at or before the target week.
    Never,
}

impl Reporting {
    pub fn from_last_report(last_week: Option<WeekKey>, target: WeekKey) -> Self {
        match last_week {
            None => Reporting::Never,
            Some(week) if week == target => Reporting::Current,
            Some(week) => Reporting::Lapsed {
                weeks: target.weeks_since(week),
            },
        }
    }

    /// Consecutive unreported weeks; `None` when the yard never reported.
    pub fn unreported_weeks(&self) -> Option<u32> {
        match self {
            Reporting::Current => Some(0),
            Reporting::Lapsed { weeks } => Some(*weeks),
            Reporting::Never => None,
        }
    }

    pub fn is_current(&self) -> bool {
        matches!(self, Reporting::Current)
    }

    pub fn staleness(&self) -> Staleness {
        Staleness::from_unreported_weeks(self.unreported_weeks())
    }
}

/// Severity of a reporting gap.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Staleness {
    Ok,
    Warning,
    Critical,
}

impl Staleness {
    pub const WARNING_WEEKS: u32 = 2;
    pub const CRITICAL_WEEKS: u32 = 4;

    pub fn from_unreported_weeks(weeks: Option<u32>) -> Self {
        match weeks {
            None => Staleness::Critical,
            Some(w) if w >= Self::CRITICAL_WEEKS => Staleness::Critical,
            Some(w) if w >= Self::WARNING_WEEKS => Staleness::Warning,
            Some(_) => Staleness::Ok,
        }
    }
}
