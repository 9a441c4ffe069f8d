//! Authentication and authorization
//!
//! - [`token`]: JWT issue/validate
//! - [`middleware`]: bearer-token middleware that loads the employee
//! - [`CurrentEmployee`]: per-request identity with resolved capabilities

pub mod middleware;
pub mod token;

use axum::extract::FromRequestParts;
use http::request::Parts;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{Capabilities, Employee};

use crate::security_log;

pub use middleware::{require_admin, require_auth};
pub use token::{Claims, IssuedToken, JwtError, JwtService};

/// Authenticated employee for the current request
///
/// Built by [`require_auth`] from a fresh employee row, so permission changes
/// take effect on the next request.
#[derive(Debug, Clone)]
pub struct CurrentEmployee {
    pub employee: Employee,
    pub capabilities: Capabilities,
    /// Token expiry (Unix millis)
    pub token_expires_at: i64,
}

impl CurrentEmployee {
    pub fn id(&self) -> &str {
        &self.employee.employee_id
    }

    pub fn require_admin(&self) -> AppResult<()> {
        self.gate(
            self.capabilities.is_admin,
            ErrorCode::AdminRequired,
            "admin",
        )
    }

    pub fn require_record_editor(&self) -> AppResult<()> {
        self.gate(
            self.capabilities.can_edit_records,
            ErrorCode::PermissionDenied,
            "edit_records",
        )
    }

    pub fn require_price_editor(&self) -> AppResult<()> {
        self.gate(
            self.capabilities.can_edit_prices,
            ErrorCode::PermissionDenied,
            "edit_prices",
        )
    }

    pub fn require_clinic_stats(&self) -> AppResult<()> {
        self.gate(
            self.capabilities.can_view_clinic_stats,
            ErrorCode::SupervisorRequired,
            "clinic_stats",
        )
    }

    /// The reserved administrator account has no fee-earning views
    pub fn require_fee_earner(&self) -> AppResult<()> {
        self.gate(
            self.capabilities.earns_fees,
            ErrorCode::PermissionDenied,
            "fee_earner",
        )
    }

    /// Owner of a record, or anyone with edit permission
    pub fn can_modify_record(&self, owner_id: &str) -> bool {
        self.id() == owner_id || self.capabilities.can_edit_records
    }

    fn gate(&self, allowed: bool, code: ErrorCode, capability: &'static str) -> AppResult<()> {
        if allowed {
            return Ok(());
        }
        security_log!(
            "WARN",
            "permission_denied",
            employee_id = self.id().to_string(),
            required = capability
        );
        Err(AppError::new(code))
    }
}

impl<S> FromRequestParts<S> for CurrentEmployee
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<CurrentEmployee>()
            .cloned()
            .ok_or_else(AppError::unauthorized)
    }
}
