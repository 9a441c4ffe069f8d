//! Customer roster endpoint

use axum::{
    Json, Router,
    extract::{Query, State},
    routing::get,
};
use serde::Deserialize;
use shared::models::DailyRoster;

use crate::api::ApiResult;
use crate::auth::CurrentEmployee;
use crate::roster;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/api/roster", get(daily_roster))
}

#[derive(Debug, Deserialize)]
pub struct RosterQuery {
    pub date: Option<String>,
    pub q: Option<String>,
}

/// GET /api/roster?date=YYYY-MM-DD&q=term
pub async fn daily_roster(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Query(query): Query<RosterQuery>,
) -> ApiResult<DailyRoster> {
    let roster =
        roster::daily_roster(&state, &current, query.date.as_deref(), query.q.as_deref()).await?;
    Ok(Json(roster))
}
