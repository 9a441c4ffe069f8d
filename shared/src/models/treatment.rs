//! Treatment Model (fee schedule)

use serde::{Deserialize, Serialize};

use super::employee::RoleCategory;

/// Treatment price entry
///
/// Each treatment carries one fee per role category. Fees are nullable in
/// storage; resolution treats missing or non-finite values as 0.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Treatment {
    pub id: i64,
    pub name: String,
    pub category: String,
    pub beautician_fee: Option<f64>,
    pub nurse_fee: Option<f64>,
    pub consultant_fee: Option<f64>,
    pub is_active: bool,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Treatment {
    /// Fee paid to an employee of the given category. Never fails.
    pub fn fee_for(&self, category: RoleCategory) -> f64 {
        let raw = match category {
            RoleCategory::Nurse => self.nurse_fee,
            RoleCategory::Beautician => self.beautician_fee,
            RoleCategory::Consultant => self.consultant_fee,
        };
        raw.filter(|v| v.is_finite()).unwrap_or(0.0)
    }

    /// Fee for a free-text job title
    pub fn price_for(&self, job_title: &str) -> f64 {
        self.fee_for(RoleCategory::classify(job_title))
    }
}

/// Create treatment payload
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TreatmentCreate {
    pub name: String,
    pub category: Option<String>,
    pub beautician_fee: Option<f64>,
    pub nurse_fee: Option<f64>,
    pub consultant_fee: Option<f64>,
}

/// Update treatment payload
///
/// Fee fields use a double option so a client can clear a price with `null`.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct TreatmentUpdate {
    pub name: Option<String>,
    pub category: Option<String>,
    #[serde(default, deserialize_with = "double_option")]
    pub beautician_fee: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub nurse_fee: Option<Option<f64>>,
    #[serde(default, deserialize_with = "double_option")]
    pub consultant_fee: Option<Option<f64>>,
    pub is_active: Option<bool>,
}

fn double_option<'de, D>(deserializer: D) -> Result<Option<Option<f64>>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    Option::<f64>::deserialize(deserializer).map(Some)
}

/// Category used when a treatment is created without one
pub const DEFAULT_TREATMENT_CATEGORY: &str = "一般";
