//! Appointment Model
//!
//! Rows of the external booking system's feed. Read-only.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Appointment {
    pub id: String,
    /// YYYY-MM-DD
    pub appointment_date: String,
    pub customer_name: String,
    /// HH:MM
    pub time_24h: Option<String>,
    /// Free-text treatment hint from the booking
    pub treatment_item: Option<String>,
    pub consultant: Option<String>,
    pub assistant: Option<String>,
    pub physician: Option<String>,
    pub status: Option<String>,
    pub notes: Option<String>,
}

impl Appointment {
    /// Case-insensitive match on customer name or treatment hint
    pub fn matches(&self, needle_lower: &str) -> bool {
        self.customer_name.to_lowercase().contains(needle_lower)
            || self
                .treatment_item
                .as_deref()
                .is_some_and(|t| t.to_lowercase().contains(needle_lower))
    }
}
