//! Treatment (fee schedule) queries

use shared::models::Treatment;
use sqlx::PgPool;

const COLUMNS: &str =
    "id, name, category, beautician_fee, nurse_fee, consultant_fee, is_active, created_at, updated_at";

/// Active entries ordered by category then name
pub async fn list_active(pool: &PgPool) -> Result<Vec<Treatment>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM treatments WHERE is_active ORDER BY category, name"
    ))
    .fetch_all(pool)
    .await
}

/// Every entry including soft-deleted ones
pub async fn list_all(pool: &PgPool) -> Result<Vec<Treatment>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM treatments ORDER BY is_active DESC, category, name"
    ))
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: i64) -> Result<Option<Treatment>, sqlx::Error> {
    sqlx::query_as(&format!("SELECT {COLUMNS} FROM treatments WHERE id = $1"))
        .bind(id)
        .fetch_optional(pool)
        .await
}

pub async fn find_active(pool: &PgPool, id: i64) -> Result<Option<Treatment>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM treatments WHERE id = $1 AND is_active"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}

pub async fn insert(pool: &PgPool, t: &Treatment) -> Result<(), sqlx::Error> {
    sqlx::query(
        "INSERT INTO treatments (id, name, category, beautician_fee, nurse_fee, consultant_fee, \
         is_active, created_at, updated_at)
         VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9)",
    )
    .bind(t.id)
    .bind(&t.name)
    .bind(&t.category)
    .bind(t.beautician_fee)
    .bind(t.nurse_fee)
    .bind(t.consultant_fee)
    .bind(t.is_active)
    .bind(t.created_at)
    .bind(t.updated_at)
    .execute(pool)
    .await?;
    Ok(())
}

/// Overwrite every mutable column from `t`
pub async fn update(pool: &PgPool, t: &Treatment) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE treatments SET name = $1, category = $2, beautician_fee = $3, nurse_fee = $4, \
         consultant_fee = $5, is_active = $6, updated_at = $7 WHERE id = $8",
    )
    .bind(&t.name)
    .bind(&t.category)
    .bind(t.beautician_fee)
    .bind(t.nurse_fee)
    .bind(t.consultant_fee)
    .bind(t.is_active)
    .bind(t.updated_at)
    .bind(t.id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}

/// Soft delete
pub async fn deactivate(pool: &PgPool, id: i64, now: i64) -> Result<u64, sqlx::Error> {
    let rows = sqlx::query(
        "UPDATE treatments SET is_active = FALSE, updated_at = $1 WHERE id = $2 AND is_active",
    )
    .bind(now)
    .bind(id)
    .execute(pool)
    .await?
    .rows_affected();
    Ok(rows)
}
