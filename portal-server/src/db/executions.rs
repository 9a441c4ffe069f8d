//! Execution ledger queries

use shared::models::ExecutionRecord;
use sqlx::{PgExecutor, PgPool};

const COLUMNS: &str = "id, appointment_id, customer_name, service_date, service_time, \
     treatment_hint, treatment_name, employee_id, employee_name, employee_shortname, \
     role_category, unit_fee, created_at, updated_at";

/// Insert one record (pool or transaction)
pub async fn insert<'e, E>(exec: E, r: &ExecutionRecord) -> Result<(), sqlx::Error>
where
    E: PgExecutor<'e>,
{
    sqlx::query(
        "INSERT INTO execution_records (id, appointment_id, customer_name, service_date, \
         service_time, treatment_hint, treatment_name, employee_id, employee_name, \
         employee_shortname, role_category, unit_fee, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)",
    )
    .bind(r.id)
    .bind(&r.appointment_id)
    .bind(&r.customer_name)
    .bind(&r.service_date)
    .bind(&r.service_time)
    .bind(&r.treatment_hint)
    .bind(&r.treatment_name)
    .bind(&r.employee_id)
    .bind(&r.employee_name)
    .bind(&r.employee_shortname)
    .bind(r.role_category.as_str())
    .bind(r.unit_fee)
    .bind(r.created_at)
    .bind(r.updated_at)
    .execute(exec)
    .await?;
    Ok(())
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<ExecutionRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM execution_records WHERE id = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM execution_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows)
}

/// Overwrite employee identity, treatment and fee after a reassignment
pub async fn update_assignment(pool: &PgPool, r: &ExecutionRecord) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE execution_records SET employee_id = $1, employee_name = $2, \
         employee_shortname = $3, role_category = $4, treatment_name = $5, unit_fee = $6, \
         updated_at = $7 WHERE id = $8",
    )
    .bind(&r.employee_id)
    .bind(&r.employee_name)
    .bind(&r.employee_shortname)
    .bind(r.role_category.as_str())
    .bind(&r.treatment_name)
    .bind(r.unit_fee)
    .bind(r.updated_at)
    .bind(r.id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}

/// Every employee's records for one service date
pub async fn list_by_date(pool: &PgPool, date: &str) -> Result<Vec<ExecutionRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM execution_records WHERE service_date = $1 ORDER BY created_at"
    ))
    .bind(date)
    .fetch_all(pool)
    .await
}

/// One employee's records with `from <= service_date <= to`
pub async fn list_for_employee(
    pool: &PgPool,
    employee_id: &str,
    from: &str,
    to: &str,
) -> Result<Vec<ExecutionRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM execution_records \
         WHERE employee_id = $1 AND service_date >= $2 AND service_date <= $3 \
         ORDER BY service_date DESC, created_at DESC"
    ))
    .bind(employee_id)
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}

/// All records with `from <= service_date <= to`
pub async fn list_range(
    pool: &PgPool,
    from: &str,
    to: &str,
) -> Result<Vec<ExecutionRecord>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM execution_records \
         WHERE service_date >= $1 AND service_date <= $2 ORDER BY service_date, created_at"
    ))
    .bind(from)
    .bind(to)
    .fetch_all(pool)
    .await
}
