//! HTTP handlers for the REST API.
//!
//! Each handler corresponds to an API endpoint and delegates to the
//! store service layer for business logic.

use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    Json,
};

use super::dto::{
    HealthResponse, RecordsResponse, ReportQuery, StockReport, StockSubmission,
    SubmitStockRequest, TrendsQuery, TrendsResponse, UpsertYardRequest, WeekRecordsResponse,
    YardListResponse,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::models::{WeekKey, Yard};

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

fn parse_week(raw: &str) -> Result<WeekKey, AppError> {
    raw.parse::<WeekKey>()
        .map_err(|e| AppError::BadRequest(e.to_string()))
}

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
///
/// Health check endpoint to verify the service is running and the store is reachable.
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let store_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => format!("error: {}", e),
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        store: store_status,
    }))
}

// =============================================================================
// Yards
// =============================================================================

/// GET /v1/yards
pub async fn list_yards(State(state): State<AppState>) -> HandlerResult<YardListResponse> {
    let yards = db_services::list_yards(state.repository.as_ref()).await?;
    let total = yards.len();
    Ok(Json(YardListResponse { yards, total }))
}

/// GET /v1/yards/{name}
pub async fn get_yard(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> HandlerResult<Yard> {
    let yard = db_services::get_yard(state.repository.as_ref(), &name).await?;
    Ok(Json(yard))
}

/// PUT /v1/yards/{name}
///
/// Create or replace a yard. The category must be one of the known labels.
pub async fn put_yard(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(request): Json<UpsertYardRequest>,
) -> HandlerResult<Yard> {
    let yard = request
        .into_yard(name)
        .map_err(|e| AppError::BadRequest(e.to_string()))?;
    db_services::save_yard(state.repository.as_ref(), &yard).await?;
    Ok(Json(yard))
}

/// DELETE /v1/yards/{name}
///
/// Records of the yard are kept.
pub async fn delete_yard(
    State(state): State<AppState>,
    Path(name): Path<String>,
) -> Result<StatusCode, AppError> {
    db_services::delete_yard(state.repository.as_ref(), &name).await?;
    Ok(StatusCode::NO_CONTENT)
}

// =============================================================================
// Weekly Records
// =============================================================================

/// GET /v1/records
pub async fn list_records(State(state): State<AppState>) -> HandlerResult<RecordsResponse> {
    let weeks = db_services::list_weekly_records(state.repository.as_ref()).await?;
    let total_records = weeks.values().map(Vec::len).sum();
    Ok(Json(RecordsResponse {
        weeks,
        total_records,
    }))
}

/// GET /v1/weeks/{week}/records
///
/// `week` may be any day of the week; it is normalised to its Monday.
pub async fn get_week_records(
    State(state): State<AppState>,
    Path(week): Path<String>,
) -> HandlerResult<WeekRecordsResponse> {
    let week = parse_week(&week)?;
    let records = db_services::get_week_records(state.repository.as_ref(), week).await?;
    Ok(Json(WeekRecordsResponse { week, records }))
}

/// POST /v1/records
///
/// Submit a stock count. Responds 201 for a new record and 200 when an
/// earlier submission for the same yard and week was replaced.
pub async fn submit_stock(
    State(state): State<AppState>,
    Json(request): Json<SubmitStockRequest>,
) -> Result<(StatusCode, Json<StockSubmission>), AppError> {
    let submission = db_services::submit_stock(
        state.repository.as_ref(),
        &request.yard,
        request.stock,
        request.date,
        state.today(),
    )
    .await?;

    let status = if submission.replaced {
        StatusCode::OK
    } else {
        StatusCode::CREATED
    };
    Ok((status, Json(submission)))
}

// =============================================================================
// Derived Data
// =============================================================================

/// GET /v1/report?week=YYYY-MM-DD
///
/// Stock report as of the given week, or the current week.
pub async fn get_report(
    State(state): State<AppState>,
    Query(query): Query<ReportQuery>,
) -> HandlerResult<StockReport> {
    let week = match query.week.as_deref() {
        Some(raw) => parse_week(raw)?,
        None => WeekKey::containing(state.today()).ok_or_else(|| {
            AppError::BadRequest(format!("No week contains {}", state.today()))
        })?,
    };
    let report = db_services::build_stock_report(state.repository.as_ref(), week).await;
    Ok(Json(report))
}

/// GET /v1/trends?category=..|yard=..
pub async fn get_trends(
    State(state): State<AppState>,
    Query(query): Query<TrendsQuery>,
) -> HandlerResult<TrendsResponse> {
    let filter = query.into_filter().map_err(AppError::BadRequest)?;
    let points = db_services::build_trend(state.repository.as_ref(), &filter).await;
    Ok(Json(TrendsResponse { filter, points }))
}
