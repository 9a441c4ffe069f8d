//! Login Record Model

use serde::{Deserialize, Serialize};

/// One successful login. Append-only; administrators may delete rows.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct LoginRecord {
    pub id: i64,
    pub employee_id: String,
    pub employee_name: String,
    pub login_at: i64,
}
