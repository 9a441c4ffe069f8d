//! Application state for portal-server

use std::sync::Arc;

use chrono::NaiveDate;
use chrono_tz::Tz;
use shared::models::AccessPolicy;
use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;

use crate::BoxError;
use crate::auth::JwtService;
use crate::config::{Config, NicknamePolicy};
use crate::db::employees;
use crate::utils::time;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Portal tables (employees, treatments, ledger, login records)
    pub pool: PgPool,
    /// Booking system feed (read-only `appointments` table)
    pub feed_pool: PgPool,
    pub jwt: Arc<JwtService>,
    pub access: AccessPolicy,
    pub nickname_policy: NicknamePolicy,
    /// Clinic time zone
    pub tz: Tz,
}

impl AppState {
    /// Connect both pools, run migrations and make sure the reserved
    /// administrator account exists.
    pub async fn new(config: &Config) -> Result<Self, BoxError> {
        let pool = PgPoolOptions::new()
            .max_connections(config.db_max_connections)
            .connect(&config.database_url)
            .await?;
        tracing::info!("Connected to PostgreSQL");

        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");

        let feed_pool = if config.appointment_database_url == config.database_url {
            pool.clone()
        } else {
            let feed = PgPoolOptions::new()
                .max_connections(config.db_max_connections)
                .connect(&config.appointment_database_url)
                .await?;
            tracing::info!("Connected to appointment feed database");
            feed
        };

        let state = Self::from_parts(pool, feed_pool, config);
        employees::ensure_admin(&state.pool, state.access.admin_employee_id()).await?;
        Ok(state)
    }

    /// Assemble state from existing pools (no migrations, no seeding)
    pub fn from_parts(pool: PgPool, feed_pool: PgPool, config: &Config) -> Self {
        Self {
            pool,
            feed_pool,
            jwt: Arc::new(JwtService::new(&config.jwt_secret, config.jwt_expiry_hours)),
            access: AccessPolicy::new(config.admin_employee_id.clone()),
            nickname_policy: config.nickname_policy,
            tz: config.clinic_timezone,
        }
    }

    /// Today in the clinic time zone
    pub fn today(&self) -> NaiveDate {
        time::today(self.tz)
    }
}
