//! # Yard Stock
//!
//! Weekly stock reconstruction and reporting for a network of inventory yards.
//!
//! Yards report their stock at most once per Monday-anchored week, and many
//! weeks go unreported. This crate rebuilds each yard's effective stock as of
//! any week by backfilling from the most recent earlier report, flags yards
//! that stopped reporting or left their configured stock band, and rolls the
//! figures up per ownership category.
//!
//! ## Architecture
//!
//! - [`models`]: Week keys, yards, categories and weekly records
//! - [`services`]: Pure computations (backfill, stock report, trends, band status)
//! - [`db`]: Repository pattern, in-memory and JSON-file stores, service layer
//! - [`http`]: Axum-based HTTP server and request handlers
//!
//! ## Example
//!
//! ```
//! use chrono::NaiveDate;
//! use yard_stock::models::{upsert_record, Category, WeekKey, WeeklyHistory, WeeklyRecord, Yard, YardCatalog};
//! use yard_stock::services::summarize;
//!
//! let mut yards = YardCatalog::new();
//! yards.insert("North".into(), Yard::new("North", Category::SelfOwned).with_band(Some(10), Some(50)));
//!
//! let first: WeekKey = "2024-01-01".parse().unwrap();
//! let mut history = WeeklyHistory::new();
//! upsert_record(&mut history, first, WeeklyRecord::new("North", 40, first.date()));
//!
//! let report = summarize(&yards, &history, "2024-01-15".parse().unwrap());
//! assert_eq!(report.rows[0].current_stock, Some(40));
//! assert_eq!(report.rows[0].unreported_weeks(), Some(2));
//! ```

// RepositoryError carries a structured context
#![allow(clippy::result_large_err)]

pub mod db;
pub mod models;
pub mod services;

#[cfg(feature = "http-server")]
pub mod http;
