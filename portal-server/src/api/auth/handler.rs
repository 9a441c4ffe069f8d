//! Auth API Handlers

use axum::{Json, extract::State};
use chrono::Utc;
use shared::ApiResponse;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::Employee;
use shared::session::{
    IdentifyOutcome, IdentifyRequest, NicknameChange, RememberedEmployee, SessionSnapshot,
    SetupRequest, VerifyRequest,
};

use crate::api::ApiResult;
use crate::auth::CurrentEmployee;
use crate::login::{self, LoginFlow, PgDirectory};
use crate::security_log;
use crate::state::AppState;

/// Token, capabilities and optional remembered ID for a completed login
fn issue_session(
    state: &AppState,
    employee: Employee,
    remember_me: bool,
) -> AppResult<SessionSnapshot> {
    let issued = state
        .jwt
        .create_token(&employee.employee_id, &employee.name)
        .map_err(|e| {
            tracing::error!("Token generation failed: {e}");
            AppError::new(ErrorCode::InternalError)
        })?;
    let employee_id = employee.employee_id.clone();
    let remembered = remember_me.then(|| RememberedEmployee::new(employee_id, Utc::now()));

    Ok(SessionSnapshot {
        token: issued.token,
        expires_at: issued.expires_at,
        capabilities: state.access.capabilities(&employee),
        employee,
        remembered,
    })
}

/// POST /api/auth/identify
pub async fn identify(
    State(state): State<AppState>,
    Json(req): Json<IdentifyRequest>,
) -> ApiResult<IdentifyOutcome> {
    let directory = PgDirectory::new(&state.pool);
    let mut flow = LoginFlow::new(&directory);
    let outcome = flow
        .identify(&req.employee_id)
        .await?
        .outcome()
        .ok_or_else(|| AppError::internal("Login flow has no second step"))?;
    Ok(Json(outcome))
}

/// POST /api/auth/setup (first login)
pub async fn setup(
    State(state): State<AppState>,
    Json(req): Json<SetupRequest>,
) -> ApiResult<SessionSnapshot> {
    let directory = PgDirectory::new(&state.pool);
    let mut flow = LoginFlow::new(&directory);
    flow.identify(&req.employee_id).await?;
    let employee = flow.setup_nickname(&req.nickname, &req.shortname).await?;
    Ok(Json(issue_session(&state, employee, req.remember_me)?))
}

/// POST /api/auth/verify (returning user)
pub async fn verify(
    State(state): State<AppState>,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<SessionSnapshot> {
    let directory = PgDirectory::new(&state.pool);
    let mut flow = LoginFlow::new(&directory);
    flow.identify(&req.employee_id).await?;
    let employee = flow.verify_nickname(&req.nickname).await?;
    Ok(Json(issue_session(&state, employee, req.remember_me)?))
}

/// GET /api/auth/session
///
/// Fresh employee row and capabilities, with a renewed token.
pub async fn session(
    State(state): State<AppState>,
    current: CurrentEmployee,
) -> ApiResult<SessionSnapshot> {
    Ok(Json(issue_session(&state, current.employee, false)?))
}

/// POST /api/auth/logout
pub async fn logout(current: CurrentEmployee) -> ApiResult<ApiResponse<()>> {
    security_log!("INFO", "logout", employee_id = current.id().to_string());
    Ok(Json(ApiResponse::ok()))
}

/// PUT /api/auth/nickname
pub async fn change_nickname(
    State(state): State<AppState>,
    current: CurrentEmployee,
    Json(req): Json<NicknameChange>,
) -> ApiResult<Employee> {
    let directory = PgDirectory::new(&state.pool);
    let employee =
        login::change_nickname(&directory, state.nickname_policy, &current.employee, &req).await?;
    Ok(Json(employee))
}
