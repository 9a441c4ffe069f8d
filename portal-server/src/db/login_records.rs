//! Login audit queries

use shared::models::LoginRecord;
use sqlx::PgPool;

pub async fn insert(pool: &PgPool, record: &LoginRecord) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO login_records (id, employee_id, employee_name, login_at) VALUES ($1, $2, $3, $4)",
    )
    .bind(record.id)
    .bind(&record.employee_id)
    .bind(&record.employee_name)
    .bind(record.login_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Records with `start <= login_at < end`, newest first
pub async fn list_range(
    pool: &PgPool,
    start: i64,
    end: i64,
) -> Result<Vec<LoginRecord>, sqlx::Error> {
    sqlx::query_as(
        "SELECT id, employee_id, employee_name, login_at FROM login_records \
         WHERE login_at >= $1 AND login_at < $2 ORDER BY login_at DESC",
    )
    .bind(start)
    .bind(end)
    .fetch_all(pool)
    .await
}

pub async fn delete(pool: &PgPool, id: i64) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query("DELETE FROM login_records WHERE id = $1")
        .bind(id)
        .execute(pool)
        .await?
        .rows_affected();
    Ok(rows)
}
