//! PostgreSQL-backed employee directory

use shared::error::{AppError, ErrorCode};
use shared::models::{Employee, LoginRecord};
use sqlx::PgPool;

use super::EmployeeDirectory;
use crate::db::{employees, login_records};
use crate::error::{ServiceResult, unique_violation_as};

pub struct PgDirectory<'a> {
    pool: &'a PgPool,
}

impl<'a> PgDirectory<'a> {
    pub fn new(pool: &'a PgPool) -> Self {
        Self { pool }
    }
}

impl EmployeeDirectory for PgDirectory<'_> {
    async fn find_employee(&self, employee_id: &str) -> ServiceResult<Option<Employee>> {
        Ok(employees::find_by_id(self.pool, employee_id).await?)
    }

    async fn shortname_holder(&self, shortname: &str) -> ServiceResult<Option<String>> {
        Ok(employees::shortname_holder(self.pool, shortname).await?)
    }

    async fn save_login_identity(
        &self,
        employee_id: &str,
        nickname: &str,
        shortname: &str,
        now: i64,
    ) -> ServiceResult<Employee> {
        // The unique index catches a shortname claimed between check and write
        employees::set_login_identity(self.pool, employee_id, nickname, shortname, now)
            .await
            .map_err(|e| unique_violation_as(e, ErrorCode::ShortnameTaken))?
            .ok_or_else(|| AppError::new(ErrorCode::EmployeeNotFound).into())
    }

    async fn append_login(&self, record: &LoginRecord) -> ServiceResult<()> {
        Ok(login_records::insert(self.pool, record).await?)
    }
}
