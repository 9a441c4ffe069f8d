//! Treatment API Handlers
//!
//! Reading the active schedule is open to every employee; changes need the
//! price-edit capability.

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ApiResponse;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{DEFAULT_TREATMENT_CATEGORY, Treatment, TreatmentCreate, TreatmentUpdate};
use shared::util::{now_millis, snowflake_id};

use crate::api::{ApiResult, internal};
use crate::auth::CurrentEmployee;
use crate::db::treatments;
use crate::error::unique_violation_as;
use crate::state::AppState;

/// Fees are optional but must be finite and non-negative when given
fn validate_fee(field: &str, value: Option<f64>) -> AppResult<()> {
    match value {
        Some(v) if !v.is_finite() || v < 0.0 => Err(AppError::validation(format!(
            "{field} must be a non-negative number, got {v}"
        ))
        .with_detail("field", field)),
        _ => Ok(()),
    }
}

fn validate(t: &Treatment) -> AppResult<()> {
    if t.name.trim().is_empty() {
        return Err(AppError::required("name"));
    }
    validate_fee("beautician_fee", t.beautician_fee)?;
    validate_fee("nurse_fee", t.nurse_fee)?;
    validate_fee("consultant_fee", t.consultant_fee)
}

/// GET /api/treatments
pub async fn list_active(State(state): State<AppState>) -> ApiResult<Vec<Treatment>> {
    let list = treatments::list_active(&state.pool)
        .await
        .map_err(internal)?;
    Ok(Json(list))
}

/// GET /api/treatments/all (including soft-deleted)
pub async fn list_all(
    State(state): State<AppState>,
    current: CurrentEmployee,
) -> ApiResult<Vec<Treatment>> {
    current.require_price_editor()?;
    let list = treatments::list_all(&state.pool).await.map_err(internal)?;
    Ok(Json(list))
}

/// POST /api/treatments
pub async fn create(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Json(payload): Json<TreatmentCreate>,
) -> ApiResult<Treatment> {
    current.require_price_editor()?;

    let now = now_millis();
    let treatment = Treatment {
        id: snowflake_id(),
        name: payload.name.trim().to_string(),
        category: payload
            .category
            .as_deref()
            .map(str::trim)
            .filter(|c| !c.is_empty())
            .unwrap_or(DEFAULT_TREATMENT_CATEGORY)
            .to_string(),
        beautician_fee: payload.beautician_fee,
        nurse_fee: payload.nurse_fee,
        consultant_fee: payload.consultant_fee,
        is_active: true,
        created_at: now,
        updated_at: now,
    };
    validate(&treatment)?;

    treatments::insert(&state.pool, &treatment)
        .await
        .map_err(|e| unique_violation_as(e, ErrorCode::TreatmentNameExists))?;

    tracing::info!(
        treatment_id = treatment.id,
        name = %treatment.name,
        by = %current.id(),
        "Treatment created"
    );
    Ok(Json(treatment))
}

/// PUT /api/treatments/{id}
pub async fn update(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Path(id): Path<i64>,
    Json(payload): Json<TreatmentUpdate>,
) -> ApiResult<Treatment> {
    current.require_price_editor()?;

    let mut treatment = treatments::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            AppError::new(ErrorCode::TreatmentNotFound).with_detail("treatment_id", id)
        })?;

    if let Some(name) = payload.name {
        treatment.name = name.trim().to_string();
    }
    if let Some(category) = payload.category {
        treatment.category = category.trim().to_string();
    }
    if let Some(fee) = payload.beautician_fee {
        treatment.beautician_fee = fee;
    }
    if let Some(fee) = payload.nurse_fee {
        treatment.nurse_fee = fee;
    }
    if let Some(fee) = payload.consultant_fee {
        treatment.consultant_fee = fee;
    }
    if let Some(active) = payload.is_active {
        treatment.is_active = active;
    }
    treatment.updated_at = now_millis();
    validate(&treatment)?;

    treatments::update(&state.pool, &treatment)
        .await
        .map_err(|e| unique_violation_as(e, ErrorCode::TreatmentNameExists))?;

    tracing::info!(treatment_id = id, by = %current.id(), "Treatment updated");
    Ok(Json(treatment))
}

/// DELETE /api/treatments/{id} (soft delete)
///
/// Existing execution records keep the treatment name they were written with.
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Path(id): Path<i64>,
) -> ApiResult<ApiResponse<()>> {
    current.require_price_editor()?;

    let rows = treatments::deactivate(&state.pool, id, now_millis())
        .await
        .map_err(internal)?;
    if rows == 0 {
        let err = AppError::new(ErrorCode::TreatmentNotFound).with_detail("treatment_id", id);
        return Err(err);
    }

    tracing::info!(treatment_id = id, by = %current.id(), "Treatment deactivated");
    Ok(Json(ApiResponse::ok()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fees_must_be_finite_and_non_negative() {
        assert!(validate_fee("nurse_fee", None).is_ok());
        assert!(validate_fee("nurse_fee", Some(0.0)).is_ok());
        assert!(validate_fee("nurse_fee", Some(-1.0)).is_err());
        assert!(validate_fee("nurse_fee", Some(f64::NAN)).is_err());
    }
}
