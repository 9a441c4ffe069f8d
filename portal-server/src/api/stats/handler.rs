//! Stats API Handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::{ClinicTotals, EmployeeTotals, StatsWindow};

use crate::api::ApiResult;
use crate::auth::CurrentEmployee;
use crate::state::AppState;
use crate::stats;
use crate::utils::time;

#[derive(Debug, Deserialize)]
pub struct WindowQuery {
    #[serde(default)]
    pub window: StatsWindow,
}

#[derive(Debug, Deserialize)]
pub struct ClinicQuery {
    #[serde(default)]
    pub window: StatsWindow,
    /// Last day of the window, YYYY-MM-DD (default today)
    pub as_of: Option<String>,
}

/// GET /api/stats/me?window=day|week|month
pub async fn my_totals(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Query(query): Query<WindowQuery>,
) -> ApiResult<EmployeeTotals> {
    let totals = stats::my_totals(&state, &current, query.window).await?;
    Ok(Json(totals))
}

/// GET /api/stats/clinic?window=day|week|month&as_of=YYYY-MM-DD
pub async fn clinic_totals(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Query(query): Query<ClinicQuery>,
) -> ApiResult<ClinicTotals> {
    let as_of = time::date_or_today(query.as_of.as_deref(), state.tz)?;
    let totals = stats::all_totals(&state, &current, query.window, as_of).await?;
    Ok(Json(totals))
}
