//! Employee Model

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::{AppError, AppResult, ErrorCode};

/// Nicknames are exactly this many characters (longer input is truncated)
pub const NICKNAME_LEN: usize = 2;
/// Shortnames are 1..=3 characters
pub const SHORTNAME_MAX_LEN: usize = 3;

/// Job title used when none is given on creation
pub const DEFAULT_JOB_TITLE: &str = "諮詢師";

const NURSE_TERMS: &[&str] = &["護理師", "nurse"];
const BEAUTICIAN_TERMS: &[&str] = &["美容師", "beautician"];

/// Which of the three fee columns applies to an employee
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RoleCategory {
    Consultant,
    Nurse,
    Beautician,
}

impl RoleCategory {
    /// Classify a free-text job title.
    ///
    /// Nurse terms are checked before beautician terms; anything matching
    /// neither (clerical titles included) is billed as a consultant.
    pub fn classify(job_title: &str) -> Self {
        let title = job_title.to_lowercase();
        if NURSE_TERMS.iter().any(|t| title.contains(t)) {
            Self::Nurse
        } else if BEAUTICIAN_TERMS.iter().any(|t| title.contains(t)) {
            Self::Beautician
        } else {
            Self::Consultant
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Consultant => "consultant",
            Self::Nurse => "nurse",
            Self::Beautician => "beautician",
        }
    }
}

impl fmt::Display for RoleCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RoleCategory {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "consultant" => Ok(Self::Consultant),
            "nurse" => Ok(Self::Nurse),
            "beautician" => Ok(Self::Beautician),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl TryFrom<String> for RoleCategory {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Authorization tier stored on the employee row
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EmployeeRole {
    #[default]
    User,
    Admin,
    SeniorSupervisor,
}

impl EmployeeRole {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::User => "user",
            Self::Admin => "admin",
            Self::SeniorSupervisor => "senior_supervisor",
        }
    }
}

impl FromStr for EmployeeRole {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "user" => Ok(Self::User),
            "admin" => Ok(Self::Admin),
            "senior_supervisor" => Ok(Self::SeniorSupervisor),
            other => Err(UnknownVariant(other.to_string())),
        }
    }
}

impl TryFrom<String> for EmployeeRole {
    type Error = UnknownVariant;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

/// Stored enum text that matches no variant
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown variant: {0}")]
pub struct UnknownVariant(pub String);

/// Employee entity
///
/// The nickname is a login secret and is never serialized back to clients.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Employee {
    pub employee_id: String,
    pub name: String,
    pub job_title: String,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub role_category: RoleCategory,
    #[serde(skip_serializing, default)]
    pub nickname: Option<String>,
    pub shortname: Option<String>,
    pub nickname_set_at: Option<i64>,
    #[cfg_attr(feature = "db", sqlx(try_from = "String"))]
    pub role: EmployeeRole,
    pub can_edit_records: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Employee {
    /// Both nickname and shortname are set (returning user)
    pub fn has_login_identity(&self) -> bool {
        let set = |v: &Option<String>| v.as_deref().is_some_and(|s| !s.is_empty());
        set(&self.nickname) && set(&self.shortname)
    }

    /// Suggested nickname for first login: first two characters of the name
    pub fn suggested_nickname(&self) -> String {
        crate::util::take_chars(&self.name, NICKNAME_LEN)
    }

    /// Suggested shortname for first login: last character of the name
    pub fn suggested_shortname(&self) -> String {
        crate::util::last_char(&self.name)
    }

    /// Label used on execution marks
    pub fn mark_label(&self) -> String {
        match self.shortname.as_deref() {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => fallback_mark_label(&self.name),
        }
    }
}

/// Mark label for records without a stored shortname: short names are used
/// whole, longer ones are reduced to their last character.
pub fn fallback_mark_label(name: &str) -> String {
    if name.chars().count() <= 2 {
        name.to_string()
    } else {
        crate::util::last_char(name)
    }
}

/// Trim and truncate a nickname; empty input is rejected.
pub fn normalize_nickname(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(AppError::required("nickname"));
    }
    Ok(crate::util::take_chars(trimmed, NICKNAME_LEN))
}

/// Trim a shortname and check its 1..=3 character bound.
pub fn normalize_shortname(raw: &str) -> AppResult<String> {
    let trimmed = raw.trim();
    let len = trimmed.chars().count();
    if len == 0 || len > SHORTNAME_MAX_LEN {
        return Err(AppError::with_message(
            ErrorCode::ValidationFailed,
            format!("Shortname must be 1-{SHORTNAME_MAX_LEN} characters"),
        )
        .with_detail("field", "shortname"));
    }
    Ok(trimmed.to_string())
}

/// Create employee payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmployeeCreate {
    pub employee_id: String,
    pub name: String,
    pub job_title: Option<String>,
    pub role: Option<EmployeeRole>,
    pub can_edit_records: Option<bool>,
}

/// Update employee payload
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct EmployeeUpdate {
    pub name: Option<String>,
    pub job_title: Option<String>,
    pub role: Option<EmployeeRole>,
    pub can_edit_records: Option<bool>,
}

/// Toggle edit permission payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EditPermissionUpdate {
    pub can_edit_records: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn employee(name: &str) -> Employee {
        Employee {
            employee_id: "E1".into(),
            name: name.into(),
            job_title: "美容師".into(),
            role_category: RoleCategory::Beautician,
            nickname: None,
            shortname: None,
            nickname_set_at: None,
            role: EmployeeRole::User,
            can_edit_records: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    #[test]
    fn nurse_terms_win_regardless_of_case() {
        assert_eq!(RoleCategory::classify("Senior NURSE"), RoleCategory::Nurse);
        assert_eq!(RoleCategory::classify("護理師"), RoleCategory::Nurse);
        assert_eq!(
            RoleCategory::classify("nurse / beautician"),
            RoleCategory::Nurse
        );
        assert_eq!(
            RoleCategory::classify("美容師兼護理師"),
            RoleCategory::Nurse
        );
    }

    #[test]
    fn beautician_and_fallback() {
        assert_eq!(
            RoleCategory::classify("Head Beautician"),
            RoleCategory::Beautician
        );
        assert_eq!(RoleCategory::classify("美容師"), RoleCategory::Beautician);
        assert_eq!(RoleCategory::classify("櫃台行政"), RoleCategory::Consultant);
        assert_eq!(RoleCategory::classify(""), RoleCategory::Consultant);
    }

    #[test]
    fn role_text_parses() {
        assert_eq!(
            "senior_supervisor".parse::<EmployeeRole>(),
            Ok(EmployeeRole::SeniorSupervisor)
        );
        assert!("owner".parse::<EmployeeRole>().is_err());
        assert_eq!(
            RoleCategory::try_from("nurse".to_string()),
            Ok(RoleCategory::Nurse)
        );
    }

    #[test]
    fn suggestions_use_characters_of_name() {
        let e = employee("王小明");
        assert_eq!(e.suggested_nickname(), "王小");
        assert_eq!(e.suggested_shortname(), "明");
    }

    #[test]
    fn login_identity_requires_both_fields() {
        let mut e = employee("王小明");
        assert!(!e.has_login_identity());
        e.nickname = Some("小明".into());
        assert!(!e.has_login_identity());
        e.shortname = Some("".into());
        assert!(!e.has_login_identity());
        e.shortname = Some("明".into());
        assert!(e.has_login_identity());
    }

    #[test]
    fn nickname_is_trimmed_and_truncated() {
        assert_eq!(normalize_nickname("  小明明 ").unwrap(), "小明");
        assert_eq!(
            normalize_nickname("   ").unwrap_err().code,
            ErrorCode::RequiredField
        );
    }

    #[test]
    fn shortname_length_bounds() {
        assert_eq!(normalize_shortname(" 明 ").unwrap(), "明");
        assert_eq!(normalize_shortname("ABC").unwrap(), "ABC");
        assert!(normalize_shortname("").is_err());
        assert!(normalize_shortname("ABCD").is_err());
    }

    #[test]
    fn mark_label_falls_back_to_name() {
        let mut e = employee("王小明");
        assert_eq!(e.mark_label(), "明");
        e.shortname = Some("小王".into());
        assert_eq!(e.mark_label(), "小王");
        assert_eq!(fallback_mark_label("阿美"), "阿美");
    }

    #[test]
    fn nickname_is_not_serialized() {
        let mut e = employee("王小明");
        e.nickname = Some("小明".into());
        let json = serde_json::to_value(&e).unwrap();
        assert!(json.get("nickname").is_none());
        assert_eq!(json["role_category"], "beautician");
    }
}
