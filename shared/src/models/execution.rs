//! Execution Record Model
//!
//! One row per treatment performed by an employee, on a customer or as part
//! of the employee's daily tally. Treatment name, employee identity and fee
//! are copied at write time.

use serde::{Deserialize, Serialize};

use super::employee::RoleCategory;

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct ExecutionRecord {
    pub id: i64,
    pub appointment_id: Option<String>,
    /// None for daily-tally rows
    pub customer_name: Option<String>,
    /// YYYY-MM-DD
    pub service_date: String,
    pub service_time: Option<String>,
    pub treatment_hint: Option<String>,
    pub treatment_name: String,
    pub employee_id: String,
    pub employee_name: String,
    pub employee_shortname: Option<String>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub role_category: RoleCategory,
    pub unit_fee: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

/// Record one execution
///
/// Either `appointment_id` links a feed appointment (customer, date, time and
/// hint are copied from it), or `customer_name` + `service_date` describe a
/// walk-in customer. Without both it is a daily-tally entry: treatment and
/// date only.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExecutionCreate {
    pub appointment_id: Option<String>,
    pub customer_name: Option<String>,
    pub service_date: Option<String>,
    pub service_time: Option<String>,
    pub treatment_hint: Option<String>,
    pub treatment_id: i64,
    /// Times performed (default 1); each unit becomes its own row
    pub quantity: Option<u32>,
}

/// Record several executions at once (all or nothing)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionBatch {
    pub items: Vec<ExecutionCreate>,
}

/// Move a record to another employee and/or treatment
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ExecutionReassign {
    pub employee_id: String,
    pub treatment_id: i64,
}
