//! Unified error codes for the staff portal
//!
//! Error codes are organized by category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Employee errors
//! - 4xxx: Treatment errors
//! - 5xxx: Ledger errors
//! - 6xxx: Login audit errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// Serialized as a bare `u16` so the browser client can switch on it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// Caller is not authenticated
    NotAuthenticated = 1001,
    /// Nickname does not match the stored one
    NicknameMismatch = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Employee has not set up a nickname yet
    NicknameNotSet = 1005,
    /// Employee already has a nickname
    NicknameAlreadySet = 1006,
    /// Nickname changes are disabled by policy
    NicknameLocked = 1007,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Senior supervisor or administrator required
    SupervisorRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,
    /// Cannot delete admin user
    CannotDeleteAdmin = 2005,

    // ==================== 3xxx: Employee ====================
    /// Employee not found
    EmployeeNotFound = 3001,
    /// Employee ID already exists
    EmployeeIdExists = 3002,
    /// Shortname is held by another employee
    ShortnameTaken = 3003,

    // ==================== 4xxx: Treatment ====================
    /// Treatment not found (or inactive)
    TreatmentNotFound = 4001,
    /// An active treatment with this name already exists
    TreatmentNameExists = 4002,

    // ==================== 5xxx: Ledger ====================
    /// Execution record not found
    ExecutionRecordNotFound = 5001,
    /// Batch contains no items
    BatchEmpty = 5002,
    /// Appointment not found in the booking feed
    AppointmentNotFound = 5101,

    // ==================== 6xxx: Login audit ====================
    /// Login record not found
    LoginRecordNotFound = 6001,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Configuration error
    ConfigError = 9005,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "Not logged in",
            ErrorCode::NicknameMismatch => "Nickname does not match",
            ErrorCode::TokenExpired => "Session has expired",
            ErrorCode::TokenInvalid => "Session token is invalid",
            ErrorCode::NicknameNotSet => "Nickname has not been set up yet",
            ErrorCode::NicknameAlreadySet => "Nickname has already been set up",
            ErrorCode::NicknameLocked => "Nickname changes are disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::SupervisorRequired => "Senior supervisor or administrator required",
            ErrorCode::AdminRequired => "Administrator role is required",
            ErrorCode::CannotDeleteAdmin => "Cannot delete administrator",

            // Employee
            ErrorCode::EmployeeNotFound => "Employee not found",
            ErrorCode::EmployeeIdExists => "Employee ID already exists",
            ErrorCode::ShortnameTaken => "Shortname is already used by another employee",

            // Treatment
            ErrorCode::TreatmentNotFound => "Treatment not found",
            ErrorCode::TreatmentNameExists => "An active treatment with this name already exists",

            // Ledger
            ErrorCode::ExecutionRecordNotFound => "Execution record not found",
            ErrorCode::BatchEmpty => "No treatments selected",
            ErrorCode::AppointmentNotFound => "Appointment not found",

            // Login audit
            ErrorCode::LoginRecordNotFound => "Login record not found",

            // System
            ErrorCode::InternalError => "Operation failed, please try again",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::NicknameMismatch),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::NicknameNotSet),
            1006 => Ok(ErrorCode::NicknameAlreadySet),
            1007 => Ok(ErrorCode::NicknameLocked),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::SupervisorRequired),
            2003 => Ok(ErrorCode::AdminRequired),
            2005 => Ok(ErrorCode::CannotDeleteAdmin),

            // Employee
            3001 => Ok(ErrorCode::EmployeeNotFound),
            3002 => Ok(ErrorCode::EmployeeIdExists),
            3003 => Ok(ErrorCode::ShortnameTaken),

            // Treatment
            4001 => Ok(ErrorCode::TreatmentNotFound),
            4002 => Ok(ErrorCode::TreatmentNameExists),

            // Ledger
            5001 => Ok(ErrorCode::ExecutionRecordNotFound),
            5002 => Ok(ErrorCode::BatchEmpty),
            5101 => Ok(ErrorCode::AppointmentNotFound),

            // Login audit
            6001 => Ok(ErrorCode::LoginRecordNotFound),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9005 => Ok(ErrorCode::ConfigError),

            _ => Err(InvalidErrorCode(value)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}
