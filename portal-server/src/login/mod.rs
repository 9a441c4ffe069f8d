//! Login sequence
//!
//! ```text
//! IdentifyEmployee ─┬─> SetupNickname  ──┐
//!                   └─> VerifyNickname ──┴─> Complete
//! ```
//!
//! `back()` from either middle state returns to `IdentifyEmployee`. Every
//! transition into `Complete` appends exactly one login record; failures
//! leave the state untouched and write nothing.
//!
//! Storage goes through [`EmployeeDirectory`] so the flow can run against
//! PostgreSQL ([`PgDirectory`]) or an in-memory directory in tests.

mod pg;

pub use pg::PgDirectory;

use shared::error::{AppError, ErrorCode};
use shared::models::{Employee, LoginRecord, normalize_nickname, normalize_shortname};
use shared::session::{IdentifyOutcome, NicknameChange};
use shared::util::{now_millis, snowflake_id};

use crate::config::NicknamePolicy;
use crate::error::ServiceResult;
use crate::security_log;

/// Storage operations the login flow needs
#[allow(async_fn_in_trait)]
pub trait EmployeeDirectory {
    async fn find_employee(&self, employee_id: &str) -> ServiceResult<Option<Employee>>;

    /// Employee ID currently holding `shortname`
    async fn shortname_holder(&self, shortname: &str) -> ServiceResult<Option<String>>;

    /// Persist nickname + shortname, returning the updated employee
    async fn save_login_identity(
        &self,
        employee_id: &str,
        nickname: &str,
        shortname: &str,
        now: i64,
    ) -> ServiceResult<Employee>;

    async fn append_login(&self, record: &LoginRecord) -> ServiceResult<()>;
}

#[derive(Debug, Clone)]
pub enum LoginState {
    IdentifyEmployee,
    SetupNickname {
        employee: Box<Employee>,
        suggested_nickname: String,
        suggested_shortname: String,
    },
    VerifyNickname {
        employee: Box<Employee>,
    },
    Complete {
        employee: Box<Employee>,
    },
}

impl LoginState {
    /// Client-facing description of the next step after identification
    pub fn outcome(&self) -> Option<IdentifyOutcome> {
        match self {
            LoginState::SetupNickname {
                employee,
                suggested_nickname,
                suggested_shortname,
            } => Some(IdentifyOutcome::SetupNickname {
                employee_id: employee.employee_id.clone(),
                name: employee.name.clone(),
                suggested_nickname: suggested_nickname.clone(),
                suggested_shortname: suggested_shortname.clone(),
            }),
            LoginState::VerifyNickname { employee } => Some(IdentifyOutcome::VerifyNickname {
                employee_id: employee.employee_id.clone(),
                name: employee.name.clone(),
            }),
            LoginState::IdentifyEmployee | LoginState::Complete { .. } => None,
        }
    }
}

pub struct LoginFlow<'a, D> {
    directory: &'a D,
    state: LoginState,
}

impl<'a, D: EmployeeDirectory> LoginFlow<'a, D> {
    pub fn new(directory: &'a D) -> Self {
        Self {
            directory,
            state: LoginState::IdentifyEmployee,
        }
    }

    pub fn state(&self) -> &LoginState {
        &self.state
    }

    /// Look up the employee and pick the next step
    pub async fn identify(&mut self, employee_id: &str) -> ServiceResult<&LoginState> {
        let employee_id = employee_id.trim();
        if employee_id.is_empty() {
            return Err(AppError::required("employee_id").into());
        }

        let employee = self
            .directory
            .find_employee(employee_id)
            .await?
            .ok_or_else(|| {
                security_log!(
                    "WARN",
                    "login_unknown_employee",
                    employee_id = employee_id.to_string()
                );
                AppError::new(ErrorCode::EmployeeNotFound).with_detail("employee_id", employee_id)
            })?;

        self.state = if employee.has_login_identity() {
            LoginState::VerifyNickname {
                employee: Box::new(employee),
            }
        } else {
            LoginState::SetupNickname {
                suggested_nickname: employee.suggested_nickname(),
                suggested_shortname: employee.suggested_shortname(),
                employee: Box::new(employee),
            }
        };
        Ok(&self.state)
    }

    /// First login: choose nickname and shortname
    pub async fn setup_nickname(
        &mut self,
        nickname: &str,
        shortname: &str,
    ) -> ServiceResult<Employee> {
        let employee_id = match &self.state {
            LoginState::SetupNickname { employee, .. } => employee.employee_id.clone(),
            LoginState::VerifyNickname { .. } => {
                return Err(AppError::new(ErrorCode::NicknameAlreadySet).into());
            }
            _ => return Err(out_of_order("setup_nickname")),
        };

        let nickname = normalize_nickname(nickname)?;
        let shortname = normalize_shortname(shortname)?;
        ensure_shortname_available(self.directory, &shortname, &employee_id).await?;

        let now = now_millis();
        let employee = self
            .directory
            .save_login_identity(&employee_id, &nickname, &shortname, now)
            .await?;
        self.complete(employee, now).await
    }

    /// Returning user: exact, case-sensitive nickname match
    ///
    /// Input is trimmed like it was at setup; inner whitespace and case must
    /// match the stored nickname.
    pub async fn verify_nickname(&mut self, nickname: &str) -> ServiceResult<Employee> {
        let employee = match &self.state {
            LoginState::VerifyNickname { employee } => employee.as_ref().clone(),
            LoginState::SetupNickname { .. } => {
                return Err(AppError::new(ErrorCode::NicknameNotSet).into());
            }
            _ => return Err(out_of_order("verify_nickname")),
        };

        if employee.nickname.as_deref() != Some(nickname.trim()) {
            security_log!(
                "WARN",
                "nickname_mismatch",
                employee_id = employee.employee_id.clone()
            );
            return Err(AppError::new(ErrorCode::NicknameMismatch).into());
        }

        self.complete(employee, now_millis()).await
    }

    /// Return to the identify step, discarding the looked-up employee
    pub fn back(&mut self) {
        if matches!(
            self.state,
            LoginState::SetupNickname { .. } | LoginState::VerifyNickname { .. }
        ) {
            self.state = LoginState::IdentifyEmployee;
        }
    }

    /// Authenticated employee once the flow is complete
    pub fn into_employee(self) -> Option<Employee> {
        match self.state {
            LoginState::Complete { employee } => Some(*employee),
            _ => None,
        }
    }

    async fn complete(&mut self, employee: Employee, now: i64) -> ServiceResult<Employee> {
        let record = LoginRecord {
            id: snowflake_id(),
            employee_id: employee.employee_id.clone(),
            employee_name: employee.name.clone(),
            login_at: now,
        };
        self.directory.append_login(&record).await?;
        security_log!(
            "INFO",
            "login_success",
            employee_id = employee.employee_id.clone()
        );

        self.state = LoginState::Complete {
            employee: Box::new(employee.clone()),
        };
        Ok(employee)
    }
}

fn out_of_order(step: &str) -> crate::error::ServiceError {
    AppError::with_message(
        ErrorCode::InvalidRequest,
        format!("{step} is not valid in the current login step"),
    )
    .into()
}

/// Shortname held by a different employee is rejected; holding it yourself is fine
pub async fn ensure_shortname_available<D: EmployeeDirectory>(
    directory: &D,
    shortname: &str,
    employee_id: &str,
) -> ServiceResult<()> {
    match directory.shortname_holder(shortname).await? {
        Some(holder) if holder != employee_id => Err(AppError::new(ErrorCode::ShortnameTaken)
            .with_detail("shortname", shortname)
            .into()),
        _ => Ok(()),
    }
}

/// Self-service nickname change, subject to the configured policy
pub async fn change_nickname<D: EmployeeDirectory>(
    directory: &D,
    policy: NicknamePolicy,
    employee: &Employee,
    change: &NicknameChange,
) -> ServiceResult<Employee> {
    if policy == NicknamePolicy::Locked {
        return Err(AppError::new(ErrorCode::NicknameLocked).into());
    }
    let nickname = normalize_nickname(&change.nickname)?;
    let shortname = normalize_shortname(&change.shortname)?;
    ensure_shortname_available(directory, &shortname, &employee.employee_id).await?;

    let updated = directory
        .save_login_identity(&employee.employee_id, &nickname, &shortname, now_millis())
        .await?;
    tracing::info!(employee_id = %employee.employee_id, "Nickname changed");
    Ok(updated)
}
