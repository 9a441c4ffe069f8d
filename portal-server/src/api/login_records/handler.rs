//! Login Audit API Handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::ApiResponse;
use shared::error::{AppError, ErrorCode};
use shared::models::LoginRecord;

use crate::api::{ApiResult, internal};
use crate::auth::CurrentEmployee;
use crate::db::login_records;
use crate::security_log;
use crate::state::AppState;
use crate::utils::time;

#[derive(Debug, Deserialize)]
pub struct RangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

/// GET /api/login-records?from=YYYY-MM-DD&to=YYYY-MM-DD
///
/// Whole days in the clinic time zone, newest first. Both bounds default to
/// today.
pub async fn list(
    State(state): State<AppState>,
    Query(query): Query<RangeQuery>,
) -> ApiResult<Vec<LoginRecord>> {
    let to = time::date_or_today(query.to.as_deref(), state.tz)?;
    let from = match query.from.as_deref() {
        Some(f) if !f.trim().is_empty() => time::parse_date(f)?,
        _ => to,
    };
    if from > to {
        return Err(AppError::validation("from must not be after to"));
    }

    let records = login_records::list_range(
        &state.pool,
        time::day_start_millis(from, state.tz),
        time::day_end_millis(to, state.tz),
    )
    .await
    .map_err(internal)?;
    Ok(Json(records))
}

/// DELETE /api/login-records/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    let rows = login_records::delete(&state.pool, id)
        .await
        .map_err(internal)?;
    if rows == 0 {
        let err = AppError::new(ErrorCode::LoginRecordNotFound).with_detail("id", id);
        return Err(err);
    }

    security_log!(
        "INFO",
        "login_record_deleted",
        record_id = id,
        by = current.id().to_string()
    );
    Ok(Json(ApiResponse::ok()))
}
