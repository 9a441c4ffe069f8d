//! Customer roster view models

use serde::{Deserialize, Serialize};

use super::appointment::Appointment;

/// Who already recorded what for a roster entry
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExecutionMark {
    pub record_id: i64,
    pub treatment_name: String,
    pub shortname: String,
    /// Recorded by the caller
    pub is_mine: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RosterEntry {
    #[serde(flatten)]
    pub appointment: Appointment,
    pub marks: Vec<ExecutionMark>,
}

/// One day of booked customers plus the caller's running total
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DailyRoster {
    pub date: String,
    pub customers: Vec<RosterEntry>,
    pub my_total: f64,
    pub my_count: i64,
}
