//! Appointment feed queries (read-only, booking system database)

use shared::models::Appointment;
use sqlx::PgPool;

const COLUMNS: &str = "id::text AS id, appointment_date::text AS appointment_date, customer_name, \
     time_24h, treatment_item, consultant, assistant, physician, status, notes";

/// Appointments of one day ordered by time
pub async fn list_by_date(pool: &PgPool, date: &str) -> Result<Vec<Appointment>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE appointment_date::text = $1 \
         ORDER BY time_24h NULLS LAST, customer_name"
    ))
    .bind(date)
    .fetch_all(pool)
    .await
}

pub async fn find_by_id(pool: &PgPool, id: &str) -> Result<Option<Appointment>, sqlx::Error> {
    sqlx::query_as(&format!(
        "SELECT {COLUMNS} FROM appointments WHERE id::text = $1"
    ))
    .bind(id)
    .fetch_optional(pool)
    .await
}
