//! Stats Models

use serde::{Deserialize, Serialize};

use super::execution::ExecutionRecord;

/// Reporting window ending on a given day (inclusive on both ends)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StatsWindow {
    #[default]
    Day,
    Week,
    Month,
}

/// Personal totals for a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeTotals {
    pub employee_id: String,
    pub window: StatsWindow,
    pub from: String,
    pub to: String,
    pub total_fee: f64,
    pub count: i64,
    pub records: Vec<ExecutionRecord>,
}

/// One line of the clinic-wide ranking
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RankedEmployee {
    pub employee_id: String,
    pub employee_name: String,
    pub total_fee: f64,
    pub count: i64,
    pub share_percent: f64,
}

/// Clinic-wide totals for a window
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClinicTotals {
    pub window: StatsWindow,
    pub from: String,
    pub to: String,
    pub grand_total: f64,
    pub ranking: Vec<RankedEmployee>,
}
