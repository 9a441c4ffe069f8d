//! Portal server configuration

use std::str::FromStr;

use chrono_tz::Tz;
use shared::models::DEFAULT_ADMIN_EMPLOYEE_ID;

use crate::BoxError;

/// Whether employees may change their own nickname after first login
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NicknamePolicy {
    /// Set once at first login; only an administrator can reset it
    #[default]
    Locked,
    /// Employees may change nickname and shortname themselves
    Changeable,
}

impl FromStr for NicknamePolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "locked" => Ok(Self::Locked),
            "changeable" => Ok(Self::Changeable),
            other => Err(format!(
                "NICKNAME_POLICY must be 'locked' or 'changeable', got '{other}'"
            )),
        }
    }
}

/// Portal server configuration
#[derive(Debug, Clone)]
pub struct Config {
    /// PostgreSQL connection URL (portal tables)
    pub database_url: String,
    /// PostgreSQL connection URL of the booking system feed
    pub appointment_database_url: String,
    /// HTTP port
    pub http_port: u16,
    /// Environment: development | staging | production
    pub environment: String,
    /// JWT secret for employee sessions
    pub jwt_secret: String,
    pub jwt_expiry_hours: i64,
    /// Reserved administrator account
    pub admin_employee_id: String,
    pub nickname_policy: NicknamePolicy,
    /// Time zone that defines "today" for rosters and stats
    pub clinic_timezone: Tz,
    /// Log filter (falls back to RUST_LOG, then the built-in default)
    pub log_level: Option<String>,
    /// Directory for daily-rolling log files
    pub log_dir: Option<String>,
    pub db_max_connections: u32,
}

impl Config {
    /// Require a secret env var: must be set and non-empty in non-development environments.
    fn require_secret(name: &str, environment: &str) -> Result<String, BoxError> {
        let val = match std::env::var(name) {
            Ok(v) => v,
            Err(_) => {
                if environment != "development" {
                    return Err(format!("{name} must be set in {environment} environment").into());
                }
                format!("dev-{name}-not-for-production")
            }
        };
        if val.is_empty() && environment != "development" {
            return Err(format!("{name} must not be empty in {environment} environment").into());
        }
        Ok(val)
    }

    fn parsed<T: FromStr>(name: &str, default: T) -> T {
        std::env::var(name)
            .ok()
            .and_then(|v| v.parse().ok())
            .unwrap_or(default)
    }

    /// Load configuration from environment variables
    pub fn from_env() -> Result<Self, BoxError> {
        let environment = std::env::var("ENVIRONMENT").unwrap_or_else(|_| "development".into());
        let database_url = std::env::var("DATABASE_URL").map_err(|_| "DATABASE_URL must be set")?;

        let nickname_policy = match std::env::var("NICKNAME_POLICY") {
            Ok(v) if !v.is_empty() => v.parse::<NicknamePolicy>()?,
            _ => NicknamePolicy::default(),
        };

        let tz_name = std::env::var("CLINIC_TIMEZONE").unwrap_or_else(|_| "Asia/Taipei".into());
        let clinic_timezone: Tz = tz_name
            .parse()
            .map_err(|_| format!("CLINIC_TIMEZONE '{tz_name}' is not a known time zone"))?;

        Ok(Self {
            appointment_database_url: std::env::var("APPOINTMENT_DATABASE_URL")
                .ok()
                .filter(|s| !s.is_empty())
                .unwrap_or_else(|| database_url.clone()),
            database_url,
            http_port: Self::parsed("HTTP_PORT", 8080),
            environment: environment.clone(),
            jwt_secret: Self::require_secret("JWT_SECRET", &environment)?,
            jwt_expiry_hours: Self::parsed("JWT_EXPIRY_HOURS", 12),
            admin_employee_id: std::env::var("ADMIN_EMPLOYEE_ID")
                .ok()
                .filter(|s| !s.trim().is_empty())
                .unwrap_or_else(|| DEFAULT_ADMIN_EMPLOYEE_ID.into()),
            nickname_policy,
            clinic_timezone,
            log_level: std::env::var("LOG_LEVEL").ok().filter(|s| !s.is_empty()),
            log_dir: std::env::var("LOG_DIR").ok().filter(|s| !s.is_empty()),
            db_max_connections: Self::parsed("DB_MAX_CONNECTIONS", 5),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn nickname_policy_parses_case_insensitively() {
        assert_eq!(
            "Locked".parse::<NicknamePolicy>(),
            Ok(NicknamePolicy::Locked)
        );
        assert_eq!(
            " changeable ".parse::<NicknamePolicy>(),
            Ok(NicknamePolicy::Changeable)
        );
        assert!("sometimes".parse::<NicknamePolicy>().is_err());
    }

    #[test]
    fn require_secret_allows_placeholder_in_development() {
        let name = "PORTAL_TEST_SECRET_THAT_IS_NEVER_SET";
        let dev = Config::require_secret(name, "development").unwrap();
        assert!(dev.starts_with("dev-"));
        assert!(Config::require_secret(name, "production").is_err());
    }
}
