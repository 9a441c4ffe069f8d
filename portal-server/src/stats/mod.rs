//! Stats aggregator
//!
//! Reads the ledger over a window ending on a given day, today in the clinic
//! time zone unless asked otherwise (both ends inclusive). Money is summed as
//! `Decimal` and reported as `f64` rounded to two decimals.

use std::collections::HashMap;

use chrono::{Days, Months, NaiveDate};
use rust_decimal::prelude::*;
use shared::models::{ClinicTotals, EmployeeTotals, ExecutionRecord, RankedEmployee, StatsWindow};

use crate::auth::CurrentEmployee;
use crate::db::executions;
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::utils::time::format_date;

const DECIMAL_PLACES: u32 = 2;

pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_else(|| {
        tracing::error!(value = ?value, "Non-finite fee in ledger, counting as zero");
        Decimal::ZERO
    })
}

pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// `[from, to]` for a window ending on `end`
pub fn window_range(window: StatsWindow, end: NaiveDate) -> (NaiveDate, NaiveDate) {
    let from = match window {
        StatsWindow::Day => Some(end),
        StatsWindow::Week => end.checked_sub_days(Days::new(7)),
        StatsWindow::Month => end.checked_sub_months(Months::new(1)),
    };
    (from.unwrap_or(NaiveDate::MIN), end)
}

/// Total fee and record count
pub fn sum_records(records: &[ExecutionRecord]) -> (Decimal, i64) {
    let total = records.iter().map(|r| to_decimal(r.unit_fee)).sum();
    (total, records.len() as i64)
}

/// Per-employee totals ranked by total descending, ties by employee ID
///
/// Records of `excluded` (the reserved admin account) are left out. Shares
/// are 0 for everyone when the grand total is 0.
pub fn rank(records: &[ExecutionRecord], excluded: &str) -> (f64, Vec<RankedEmployee>) {
    let mut by_employee: HashMap<&str, (&str, Decimal, i64)> = HashMap::new();
    for r in records.iter().filter(|r| r.employee_id != excluded) {
        let entry = by_employee
            .entry(r.employee_id.as_str())
            .or_insert((r.employee_name.as_str(), Decimal::ZERO, 0));
        entry.1 += to_decimal(r.unit_fee);
        entry.2 += 1;
    }

    let grand_total: Decimal = by_employee.values().map(|(_, total, _)| *total).sum();

    let mut ranking: Vec<(&str, &str, Decimal, i64)> = by_employee
        .into_iter()
        .map(|(id, (name, total, count))| (id, name, total, count))
        .collect();
    ranking.sort_by(|a, b| b.2.cmp(&a.2).then_with(|| a.0.cmp(b.0)));

    let ranking = ranking
        .into_iter()
        .map(|(id, name, total, count)| RankedEmployee {
            employee_id: id.to_string(),
            employee_name: name.to_string(),
            total_fee: to_f64(total),
            count,
            share_percent: if grand_total.is_zero() {
                0.0
            } else {
                to_f64(total * Decimal::ONE_HUNDRED / grand_total)
            },
        })
        .collect();

    (to_f64(grand_total), ranking)
}

/// The caller's own totals and records
pub async fn my_totals(
    state: &AppState,
    actor: &CurrentEmployee,
    window: StatsWindow,
) -> ServiceResult<EmployeeTotals> {
    actor.require_fee_earner()?;
    let (from, to) = window_range(window, state.today());
    let (from, to) = (format_date(from), format_date(to));

    let records = executions::list_for_employee(&state.pool, actor.id(), &from, &to).await?;
    let (total, count) = sum_records(&records);

    Ok(EmployeeTotals {
        employee_id: actor.id().to_string(),
        window,
        from,
        to,
        total_fee: to_f64(total),
        count,
        records,
    })
}

/// Clinic-wide ranking for the window ending on `as_of`
///
/// Administrators and senior supervisors only.
pub async fn all_totals(
    state: &AppState,
    actor: &CurrentEmployee,
    window: StatsWindow,
    as_of: NaiveDate,
) -> ServiceResult<ClinicTotals> {
    actor.require_clinic_stats()?;
    let (from, to) = window_range(window, as_of);
    let (from, to) = (format_date(from), format_date(to));

    let records = executions::list_range(&state.pool, &from, &to).await?;
    let excluded = state.access.admin_employee_id();
    Ok(clinic_totals(window, from, to, &records, excluded))
}

/// Shape ranked records into the clinic report for `[from, to]`
pub fn clinic_totals(
    window: StatsWindow,
    from: String,
    to: String,
    records: &[ExecutionRecord],
    excluded: &str,
) -> ClinicTotals {
    let (grand_total, ranking) = rank(records, excluded);
    ClinicTotals {
        window,
        from,
        to,
        grand_total,
        ranking,
    }
}
