//! Data Transfer Objects for the HTTP API.
//!
//! Request bodies and query strings are parsed into these types. Report and
//! trend payloads reuse the serializable service types directly.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::models::{Category, UnknownCategory, WeekKey, WeeklyHistory, WeeklyRecord, Yard};
use crate::services::{TrendFilter, TrendPoint};

pub use crate::db::services::StockSubmission;
pub use crate::services::{StockReport, StockSummary, YardStockRow};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Status of the service
    pub status: String,
    /// Version of the API
    pub version: String,
    /// Store connection status
    pub store: String,
}

/// Yard list response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct YardListResponse {
    pub yards: Vec<Yard>,
    pub total: usize,
}

/// Request body for creating or updating a yard. The name comes from the path.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UpsertYardRequest {
    #[serde(default)]
    pub owner: String,
    /// One of "Self-owned", "JV Dealer", "External" (case-insensitive, aliases accepted).
    pub category: String,
    #[serde(default)]
    pub min: Option<u32>,
    #[serde(default)]
    pub max: Option<u32>,
}

impl UpsertYardRequest {
    pub fn into_yard(self, name: impl Into<String>) -> Result<Yard, UnknownCategory> {
        let category = Category::parse_strict(&self.category)?;
        Ok(Yard::new(name, category)
            .with_owner(self.owner)
            .with_band(self.min, self.max))
    }
}

/// Request body for submitting a stock count.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitStockRequest {
    pub yard: String,
    /// Signed so that negative input reaches validation instead of failing to parse.
    pub stock: i64,
    /// Day the count applies to; defaults to today.
    #[serde(default)]
    pub date: Option<NaiveDate>,
}

/// Every stored week with its records.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RecordsResponse {
    pub weeks: WeeklyHistory,
    pub total_records: usize,
}

/// Records of a single week.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WeekRecordsResponse {
    pub week: WeekKey,
    pub records: Vec<WeeklyRecord>,
}

/// Query parameters for the report endpoint.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct ReportQuery {
    /// Any day of the target week (YYYY-MM-DD); defaults to the current week.
    #[serde(default)]
    pub week: Option<String>,
}

/// Query parameters for the trends endpoint. At most one filter may be set.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct TrendsQuery {
    #[serde(default)]
    pub category: Option<String>,
    #[serde(default)]
    pub yard: Option<String>,
}

impl TrendsQuery {
    pub fn into_filter(self) -> Result<TrendFilter, String> {
        match (self.category, self.yard) {
            (Some(_), Some(_)) => Err("Use either 'category' or 'yard', not both".to_string()),
            (Some(category), None) => Ok(TrendFilter::Category(Category::from(category))),
            (None, Some(yard)) => Ok(TrendFilter::Yard(yard)),
            (None, None) => Ok(TrendFilter::All),
        }
    }
}

/// Trend series response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TrendsResponse {
    pub filter: TrendFilter,
    pub points: Vec<TrendPoint>,
}
