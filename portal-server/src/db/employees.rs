//! Employee queries

use shared::models::{Employee, EmployeeRole, RoleCategory};
use sqlx::PgPool;

const COLUMNS: &str = "employee_id, name, job_title, role_category, nickname, shortname, \
     nickname_set_at, role, can_edit_records, created_at, updated_at";

pub async fn find_by_id(pool: &PgPool, employee_id: &str) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM employees WHERE employee_id = $1"
    ))
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

pub async fn list(pool: &PgPool) -> Result<Vec<Employee>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM employees ORDER BY employee_id"
    ))
    .fetch_all(pool)
    .await
}

/// Employee ID currently holding `shortname`, if any
pub async fn shortname_holder(
    pool: &PgPool,
    shortname: &str,
) -> Result<Option<String>, sqlx::Error> {
    sqlx::query_scalar("SELECT employee_id FROM employees WHERE shortname = $1")
        .bind(shortname)
        .fetch_optional(pool)
        .await
}

pub async fn create(pool: &PgPool, e: &Employee) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO employees (employee_id, name, job_title, role_category, role, \
         can_edit_records, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8)",
    )
    .bind(&e.employee_id)
    .bind(&e.name)
    .bind(&e.job_title)
    .bind(e.role_category.as_str())
    .bind(e.role.as_str())
    .bind(e.can_edit_records)
    .bind(e.created_at)
    .bind(e.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Write profile fields (name, title, derived category, role, edit flag)
pub async fn update_profile(pool: &PgPool, e: &Employee) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE employees SET name = $1, job_title = $2, role_category = $3, role = $4, \
         can_edit_records = $5, updated_at = $6 WHERE employee_id = $7",
    )
    .bind(&e.name)
    .bind(&e.job_title)
    .bind(e.role_category.as_str())
    .bind(e.role.as_str())
    .bind(e.can_edit_records)
    .bind(e.updated_at)
    .bind(&e.employee_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}

pub async fn set_edit_permission(
    pool: &PgPool,
    employee_id: &str,
    can_edit_records: bool,
    now: i64,
) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE employees SET can_edit_records = $1, updated_at = $2 WHERE employee_id = $3",
    )
    .bind(can_edit_records)
    .bind(now)
    .bind(employee_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}

pub async fn delete(pool: &PgPool, employee_id: &str) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM employees WHERE employee_id = $1")
        .bind(employee_id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows)
}

/// Store nickname + shortname and return the updated row
pub async fn set_login_identity(
    pool: &PgPool,
    employee_id: &str,
    nickname: &str,
    shortname: &str,
    now: i64,
) -> Result<Option<Employee>, sqlx::Error> {
    sqlx::query_as(&format!(
        "UPDATE employees SET nickname = $1, shortname = $2, nickname_set_at = $3, updated_at = $3 \
         WHERE employee_id = $4 RETURNING {COLUMNS}"
    ))
    .bind(nickname)
    .bind(shortname)
    .bind(now)
    .bind(employee_id)
    .fetch_optional(pool)
    .await
}

/// Clear nickname + shortname so the next login goes through setup
pub async fn clear_login_identity(
    pool: &PgPool,
    employee_id: &str,
    now: i64,
) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE employees SET nickname = NULL, shortname = NULL, nickname_set_at = NULL, \
         updated_at = $1 WHERE employee_id = $2",
    )
    .bind(now)
    .bind(employee_id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}

/// Insert the reserved administrator account if it is missing
pub async fn ensure_admin(pool: &PgPool, admin_employee_id: &str) -> Result<(), sqlx::Error> {
    let now = shared::util::now_millis();
    let inserted = sqlx::query(
        "INSERT INTO employees (employee_id, name, job_title, role_category, role, \
         can_edit_records, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, TRUE, $6, $6)
         ON CONFLICT (employee_id) DO NOTHING",
    )
    .bind(admin_employee_id)
    .bind("管理員")
    .bind("管理員")
    .bind(RoleCategory::Consultant.as_str())
    .bind(EmployeeRole::Admin.as_str())
    .bind(now)
    .execute(pool)
    .await?
    .rows_affected();
    if inserted > 0 {
        tracing::info!(employee_id = %admin_employee_id, "Seeded administrator account");
    }
    Ok(())
}
