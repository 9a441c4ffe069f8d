//! Employee API Handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::ApiResponse;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    DEFAULT_JOB_TITLE, EditPermissionUpdate, Employee, EmployeeCreate, EmployeeUpdate,
    RoleCategory,
};
use shared::util::now_millis;

use crate::api::{ApiResult, internal};
use crate::auth::CurrentEmployee;
use crate::db::employees;
use crate::error::unique_violation_as;
use crate::security_log;
use crate::state::AppState;

fn non_empty(value: &str, field: &str) -> AppResult<String> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(AppError::required(field));
    }
    Ok(trimmed.to_string())
}

async fn load(state: &AppState, id: &str) -> AppResult<Employee> {
    employees::find_by_id(&state.pool, id)
        .await
        .map_err(internal)?
        .ok_or_else(|| {
            AppError::new(ErrorCode::EmployeeNotFound).with_detail("employee_id", id)
        })
}

/// GET /api/employees
pub async fn list(
    State(state): State<AppState>,
    current: CurrentEmployee,
) -> ApiResult<Vec<Employee>> {
    current.require_record_editor()?;
    let list = employees::list(&state.pool).await.map_err(internal)?;
    Ok(Json(list))
}

/// GET /api/employees/{id}
pub async fn get_by_id(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    Ok(Json(load(&state, &id).await?))
}

/// POST /api/employees
pub async fn create(
    State(state): State<AppState>,
    Json(payload): Json<EmployeeCreate>,
) -> ApiResult<Employee> {
    let employee_id = non_empty(&payload.employee_id, "employee_id")?;
    let name = non_empty(&payload.name, "name")?;
    let job_title = payload
        .job_title
        .as_deref()
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .unwrap_or(DEFAULT_JOB_TITLE)
        .to_string();

    let now = now_millis();
    let employee = Employee {
        role_category: RoleCategory::classify(&job_title),
        employee_id,
        name,
        job_title,
        nickname: None,
        shortname: None,
        nickname_set_at: None,
        role: payload.role.unwrap_or_default(),
        can_edit_records: payload.can_edit_records.unwrap_or(false),
        created_at: now,
        updated_at: now,
    };

    employees::create(&state.pool, &employee)
        .await
        .map_err(|e| unique_violation_as(e, ErrorCode::EmployeeIdExists))?;

    tracing::info!(
        employee_id = %employee.employee_id,
        category = %employee.role_category,
        "Employee created"
    );
    Ok(Json(employee))
}

/// PUT /api/employees/{id}
///
/// A changed job title re-derives the stored role category.
pub async fn update(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<EmployeeUpdate>,
) -> ApiResult<Employee> {
    let mut employee = load(&state, &id).await?;

    if let Some(name) = payload.name.as_deref() {
        employee.name = non_empty(name, "name")?;
    }
    if let Some(title) = payload.job_title.as_deref() {
        employee.job_title = non_empty(title, "job_title")?;
        employee.role_category = RoleCategory::classify(&employee.job_title);
    }
    if let Some(role) = payload.role {
        employee.role = role;
    }
    if let Some(flag) = payload.can_edit_records {
        employee.can_edit_records = flag;
    }
    employee.updated_at = now_millis();

    employees::update_profile(&state.pool, &employee)
        .await
        .map_err(internal)?;

    tracing::info!(employee_id = %employee.employee_id, "Employee updated");
    Ok(Json(employee))
}

/// PUT /api/employees/{id}/edit-permission
pub async fn set_edit_permission(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Path(id): Path<String>,
    Json(payload): Json<EditPermissionUpdate>,
) -> ApiResult<Employee> {
    let mut employee = load(&state, &id).await?;
    let now = now_millis();
    employees::set_edit_permission(&state.pool, &id, payload.can_edit_records, now)
        .await
        .map_err(internal)?;

    employee.can_edit_records = payload.can_edit_records;
    employee.updated_at = now;
    security_log!(
        "INFO",
        "edit_permission_changed",
        employee_id = id,
        can_edit_records = payload.can_edit_records,
        by = current.id().to_string()
    );
    Ok(Json(employee))
}

/// DELETE /api/employees/{id}
pub async fn delete(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Path(id): Path<String>,
) -> ApiResult<ApiResponse<()>> {
    let employee = load(&state, &id).await?;
    if state.access.is_administrator(&employee) {
        return Err(AppError::new(ErrorCode::CannotDeleteAdmin));
    }

    employees::delete(&state.pool, &id)
        .await
        .map_err(internal)?;

    security_log!(
        "INFO",
        "employee_deleted",
        employee_id = id,
        by = current.id().to_string()
    );
    Ok(Json(ApiResponse::ok()))
}

/// POST /api/employees/{id}/reset-nickname
///
/// The employee goes through nickname setup again on next login.
pub async fn reset_nickname(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Path(id): Path<String>,
) -> ApiResult<Employee> {
    let mut employee = load(&state, &id).await?;
    let now = now_millis();
    employees::clear_login_identity(&state.pool, &id, now)
        .await
        .map_err(internal)?;

    employee.nickname = None;
    employee.shortname = None;
    employee.nickname_set_at = None;
    employee.updated_at = now;
    security_log!(
        "INFO",
        "nickname_reset",
        employee_id = id,
        by = current.id().to_string()
    );
    Ok(Json(employee))
}
