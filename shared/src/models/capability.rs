//! Capability predicates
//!
//! Every permission decision in the portal goes through [`AccessPolicy`].
//! The reserved administrator account is configured by employee ID.

use serde::{Deserialize, Serialize};

use super::employee::{Employee, EmployeeRole};

/// Reserved administrator employee ID used when none is configured
pub const DEFAULT_ADMIN_EMPLOYEE_ID: &str = "admin";

/// Resolves capabilities for employees against the reserved admin account
#[derive(Debug, Clone)]
pub struct AccessPolicy {
    admin_employee_id: String,
}

impl Default for AccessPolicy {
    fn default() -> Self {
        Self::new(DEFAULT_ADMIN_EMPLOYEE_ID)
    }
}

impl AccessPolicy {
    pub fn new(admin_employee_id: impl Into<String>) -> Self {
        Self {
            admin_employee_id: admin_employee_id.into(),
        }
    }

    pub fn admin_employee_id(&self) -> &str {
        &self.admin_employee_id
    }

    /// The reserved account, or any employee with the admin role
    pub fn is_administrator(&self, e: &Employee) -> bool {
        self.is_pure_administrator(e) || e.role == EmployeeRole::Admin
    }

    /// The reserved account only; it never earns fees
    pub fn is_pure_administrator(&self, e: &Employee) -> bool {
        e.employee_id == self.admin_employee_id
    }

    pub fn is_senior_supervisor(&self, e: &Employee) -> bool {
        e.role == EmployeeRole::SeniorSupervisor
    }

    pub fn can_edit_execution_records(&self, e: &Employee) -> bool {
        self.is_administrator(e) || self.is_senior_supervisor(e) || e.can_edit_records
    }

    pub fn can_edit_prices(&self, e: &Employee) -> bool {
        self.is_administrator(e) || self.is_senior_supervisor(e)
    }

    pub fn capabilities(&self, e: &Employee) -> Capabilities {
        let is_pure_admin = self.is_pure_administrator(e);
        Capabilities {
            is_admin: self.is_administrator(e),
            is_pure_admin,
            is_senior_supervisor: self.is_senior_supervisor(e),
            can_edit_records: self.can_edit_execution_records(e),
            can_edit_prices: self.can_edit_prices(e),
            can_view_clinic_stats: self.is_administrator(e) || self.is_senior_supervisor(e),
            earns_fees: !is_pure_admin,
        }
    }
}

/// Resolved capability set, sent to the client with the session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capabilities {
    pub is_admin: bool,
    pub is_pure_admin: bool,
    pub is_senior_supervisor: bool,
    pub can_edit_records: bool,
    pub can_edit_prices: bool,
    pub can_view_clinic_stats: bool,
    /// Can record executions, has personal stats, appears in rankings
    pub earns_fees: bool,
}
