//! Customer roster
//!
//! The day's appointments from the booking feed, annotated with who already
//! recorded which treatment, plus the caller's running total.

use rust_decimal::Decimal;
use shared::models::{
    Appointment, DailyRoster, ExecutionMark, ExecutionRecord, RosterEntry, fallback_mark_label,
};

use crate::auth::CurrentEmployee;
use crate::db::{appointments, executions};
use crate::error::ServiceResult;
use crate::state::AppState;
use crate::stats::{to_decimal, to_f64};
use crate::utils::time::{self, format_date};

/// Does `record` belong to `appointment`?
///
/// Linked records match by appointment ID; unlinked ones fall back to the
/// customer name. Daily-tally rows have neither and never match.
fn belongs_to(record: &ExecutionRecord, appointment: &Appointment) -> bool {
    match (record.appointment_id.as_deref(), record.customer_name.as_deref()) {
        (Some(id), _) => id == appointment.id,
        (None, Some(name)) => name == appointment.customer_name,
        (None, None) => false,
    }
}

fn mark(record: &ExecutionRecord, me: &str) -> ExecutionMark {
    let shortname = match record.employee_shortname.as_deref() {
        Some(s) if !s.is_empty() => s.to_string(),
        _ => fallback_mark_label(&record.employee_name),
    };
    ExecutionMark {
        record_id: record.id,
        treatment_name: record.treatment_name.clone(),
        shortname,
        is_mine: record.employee_id == me,
    }
}

/// Assemble the roster; `query` filters by customer name or treatment hint
pub fn build_roster(
    date: String,
    appointments: Vec<Appointment>,
    records: &[ExecutionRecord],
    me: &str,
    query: Option<&str>,
) -> DailyRoster {
    let needle = query
        .map(|q| q.trim().to_lowercase())
        .filter(|q| !q.is_empty());

    let customers = appointments
        .into_iter()
        .filter(|a| needle.as_deref().is_none_or(|n| a.matches(n)))
        .map(|appointment| {
            let marks = records
                .iter()
                .filter(|r| belongs_to(r, &appointment))
                .map(|r| mark(r, me))
                .collect();
            RosterEntry { appointment, marks }
        })
        .collect();

    let mine: Vec<_> = records.iter().filter(|r| r.employee_id == me).collect();
    let my_total: Decimal = mine.iter().map(|r| to_decimal(r.unit_fee)).sum();

    DailyRoster {
        date,
        customers,
        my_total: to_f64(my_total),
        my_count: mine.len() as i64,
    }
}

/// Roster for `date` (default today)
pub async fn daily_roster(
    state: &AppState,
    actor: &CurrentEmployee,
    date: Option<&str>,
    query: Option<&str>,
) -> ServiceResult<DailyRoster> {
    let date = format_date(time::date_or_today(date, state.tz)?);
    let appointments = appointments::list_by_date(&state.feed_pool, &date).await?;
    let records = executions::list_by_date(&state.pool, &date).await?;
    let roster = build_roster(date, appointments, &records, actor.id(), query);
    Ok(roster)
}
