//! Session snapshot and login step payloads
//!
//! The browser client persists [`SessionSnapshot`] after a completed login
//! and [`RememberedEmployee`] when the user opts into "remember me".

use chrono::{DateTime, Months, Utc};
use serde::{Deserialize, Serialize};

use crate::models::{Capabilities, Employee};

/// Remembered employee ID, valid for one calendar month
///
/// Only pre-fills the ID field on the next visit; the nickname check still
/// applies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RememberedEmployee {
    pub employee_id: String,
    /// ISO-8601 in storage
    pub expires_at: DateTime<Utc>,
}

impl RememberedEmployee {
    pub fn new(employee_id: impl Into<String>, now: DateTime<Utc>) -> Self {
        Self {
            employee_id: employee_id.into(),
            expires_at: now
                .checked_add_months(Months::new(1))
                .unwrap_or(DateTime::<Utc>::MAX_UTC),
        }
    }

    pub fn is_valid_at(&self, now: DateTime<Utc>) -> bool {
        now < self.expires_at
    }

    /// Employee ID to pre-fill, or `None` when the entry has expired
    pub fn restore(self, now: DateTime<Utc>) -> Option<String> {
        self.is_valid_at(now).then_some(self.employee_id)
    }
}

/// Everything the client keeps for an authenticated session
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SessionSnapshot {
    pub token: String,
    /// Token expiry (Unix millis)
    pub expires_at: i64,
    pub employee: Employee,
    pub capabilities: Capabilities,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub remembered: Option<RememberedEmployee>,
}

/// Identify step request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IdentifyRequest {
    pub employee_id: String,
}

/// Where the login flow goes after the employee is identified
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "next", rename_all = "snake_case")]
pub enum IdentifyOutcome {
    /// First login: choose nickname and shortname
    SetupNickname {
        employee_id: String,
        name: String,
        suggested_nickname: String,
        suggested_shortname: String,
    },
    /// Returning user: enter nickname
    VerifyNickname { employee_id: String, name: String },
}

/// First-login setup request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SetupRequest {
    pub employee_id: String,
    pub nickname: String,
    pub shortname: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Returning-user verification request
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct VerifyRequest {
    pub employee_id: String,
    pub nickname: String,
    #[serde(default)]
    pub remember_me: bool,
}

/// Self-service nickname change
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NicknameChange {
    pub nickname: String,
    pub shortname: String,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn remembered_id_expires_after_one_calendar_month() {
        let now = Utc.with_ymd_and_hms(2025, 1, 31, 9, 0, 0).unwrap();
        let remembered = RememberedEmployee::new("E7", now);
        // Jan 31 + 1 month clamps to the end of February
        assert_eq!(
            remembered.expires_at,
            Utc.with_ymd_and_hms(2025, 2, 28, 9, 0, 0).unwrap()
        );
        assert!(remembered.is_valid_at(now));
        assert!(!remembered.is_valid_at(remembered.expires_at));
    }

    #[test]
    fn expired_entry_is_discarded() {
        let now = Utc.with_ymd_and_hms(2025, 3, 1, 0, 0, 0).unwrap();
        let remembered = RememberedEmployee::new("E7", now);
        assert_eq!(remembered.clone().restore(now), Some("E7".to_string()));
        let later = Utc.with_ymd_and_hms(2025, 4, 2, 0, 0, 0).unwrap();
        assert_eq!(remembered.restore(later), None);
    }

    #[test]
    fn remembered_expiry_is_stored_as_iso8601() {
        let now = Utc.with_ymd_and_hms(2025, 5, 10, 8, 30, 0).unwrap();
        let json = serde_json::to_value(RememberedEmployee::new("E1", now)).unwrap();
        assert_eq!(json["expires_at"], "2025-06-10T08:30:00Z");
    }

    #[test]
    fn identify_outcome_is_tagged() {
        let outcome = IdentifyOutcome::VerifyNickname {
            employee_id: "E1".into(),
            name: "王小明".into(),
        };
        let json = serde_json::to_value(&outcome).unwrap();
        assert_eq!(json["next"], "verify_nickname");
    }
}
