//! Execution Recorder API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::ApiResponse;
use shared::models::{ExecutionBatch, ExecutionCreate, ExecutionReassign, ExecutionRecord};

use crate::api::{ApiResult, internal};
use crate::auth::CurrentEmployee;
use crate::db::executions;
use crate::ledger;
use crate::state::AppState;
use crate::utils::time::{self, format_date};

#[derive(Debug, Deserialize)]
pub struct DateQuery {
    pub date: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// POST /api/executions
pub async fn record(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Json(payload): Json<ExecutionCreate>,
) -> ApiResult<ExecutionRecord> {
    let record = ledger::record(&state, &current, &payload).await?;
    Ok(Json(record))
}

/// POST /api/executions/batch (all or nothing)
pub async fn record_batch(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Json(payload): Json<ExecutionBatch>,
) -> ApiResult<Vec<ExecutionRecord>> {
    let records = ledger::record_batch(&state, &current, &payload.items).await?;
    Ok(Json(records))
}

/// GET /api/executions?date=YYYY-MM-DD
///
/// Every employee's records for the day (default today).
pub async fn list_for_date(
    State(state): State<AppState>,
    _current: CurrentEmployee,
    Query(query): Query<DateQuery>,
) -> ApiResult<Vec<ExecutionRecord>> {
    let date = format_date(time::date_or_today(query.date.as_deref(), state.tz)?);
    let records = executions::list_by_date(&state.pool, &date)
        .await
        .map_err(internal)?;
    Ok(Json(records))
}

/// GET /api/executions/mine?from=&to=
///
/// The caller's records; both bounds default to today.
pub async fn list_mine(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Vec<ExecutionRecord>> {
    let to = time::date_or_today(query.to.as_deref(), state.tz)?;
    let from = match query.from.as_deref() {
        Some(f) if !f.trim().is_empty() => time::parse_date(f)?,
        _ => to,
    };
    let records = executions::list_for_employee(
        &state.pool,
        current.id(),
        &format_date(from),
        &format_date(to),
    )
    .await
    .map_err(internal)?;
    Ok(Json(records))
}

/// DELETE /api/executions/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    ledger::delete(&state, &current, id).await?;
    Ok(Json(ApiResponse::ok()))
}

/// PUT /api/executions/{id}/assignment
pub async fn reassign(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Path(id): Path<i64>,
    Json(payload): Json<ExecutionReassign>,
) -> ApiResult<ExecutionRecord> {
    let record = ledger::reassign(&state, &current, id, &payload).await?;
    Ok(Json(record))
}
