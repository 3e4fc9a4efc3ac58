//! Derived-data computations over the yard catalog and weekly history.
//!
//! Everything in here is pure and synchronous. Fetching the inputs is the job
//! of [`crate::db::services`], which then hands them to these functions.

pub mod backfill;
pub mod band;
pub mod stock_report;
pub mod trends;

pub use backfill::{EffectiveStock, StockTimeline};
pub use band::{BandStatus, Reporting, Staleness};
pub use stock_report::{
    summarize, CategoryTotals, Snapshot, StockReport, StockSummary, YardStockRow,
};
pub use trends::{weekly_trend, TrendFilter, TrendPoint};
