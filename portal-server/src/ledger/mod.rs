//! Execution recorder
//!
//! Writes the daily operation ledger. Fees are resolved from the fee
//! schedule at write time and copied into the row together with the
//! employee's identity, so later price or profile changes never alter
//! existing records. Reassignment is the one path that recomputes them.

use std::collections::HashSet;

use chrono::NaiveDate;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::models::{
    Appointment, Employee, ExecutionCreate, ExecutionReassign, ExecutionRecord, Treatment,
};
use shared::util::{now_millis, snowflake_id};

use crate::auth::CurrentEmployee;
use crate::db::{appointments, employees, executions, treatments};
use crate::error::{ServiceError, ServiceResult};
use crate::security_log;
use crate::state::AppState;
use crate::utils::time;

/// Upper bound for `quantity` on one item
pub const MAX_QUANTITY: u32 = 99;

/// Customer side of a new record
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceTarget {
    pub appointment_id: Option<String>,
    /// None for a daily-tally entry
    pub customer_name: Option<String>,
    pub service_date: String,
    pub service_time: Option<String>,
    pub treatment_hint: Option<String>,
}

/// Customer details from the linked appointment, or from the walk-in fields
///
/// Without an appointment or a customer name the item is a daily-tally
/// entry dated `service_date` (default `today`).
pub fn resolve_target(
    item: &ExecutionCreate,
    appointment: Option<&Appointment>,
    today: NaiveDate,
) -> AppResult<ServiceTarget> {
    if let Some(appt) = appointment {
        return Ok(ServiceTarget {
            appointment_id: Some(appt.id.clone()),
            customer_name: Some(appt.customer_name.clone()),
            service_date: appt.appointment_date.clone(),
            service_time: appt.time_24h.clone(),
            treatment_hint: appt.treatment_item.clone(),
        });
    }

    let service_date = match item.service_date.as_deref().map(str::trim) {
        Some(d) if !d.is_empty() => time::parse_date(d)?,
        _ => today,
    };

    Ok(ServiceTarget {
        appointment_id: None,
        customer_name: non_blank(&item.customer_name),
        service_date: time::format_date(service_date),
        service_time: non_blank(&item.service_time),
        treatment_hint: non_blank(&item.treatment_hint),
    })
}

fn non_blank(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(String::from)
}

/// Units requested by `item` (default 1)
pub fn quantity_of(item: &ExecutionCreate) -> AppResult<u32> {
    match item.quantity.unwrap_or(1) {
        q @ 1..=MAX_QUANTITY => Ok(q),
        q => {
            let msg = format!("quantity must be between 1 and {MAX_QUANTITY}");
            Err(AppError::validation(msg).with_detail("quantity", q))
        }
    }
}

/// New ledger row for `actor` performing `treatment`
pub fn build_record(
    target: ServiceTarget,
    treatment: &Treatment,
    actor: &Employee,
    now: i64,
) -> ExecutionRecord {
    ExecutionRecord {
        id: snowflake_id(),
        appointment_id: target.appointment_id,
        customer_name: target.customer_name,
        service_date: target.service_date,
        service_time: target.service_time,
        treatment_hint: target.treatment_hint,
        treatment_name: treatment.name.clone(),
        employee_id: actor.employee_id.clone(),
        employee_name: actor.name.clone(),
        employee_shortname: actor.shortname.clone(),
        role_category: actor.role_category,
        unit_fee: treatment.fee_for(actor.role_category),
        created_at: now,
        updated_at: now,
    }
}

/// One row per unit, each with its own ID
pub fn expand(record: ExecutionRecord, quantity: u32) -> Vec<ExecutionRecord> {
    let mut rows = Vec::with_capacity(quantity as usize);
    rows.push(record);
    while rows.len() < quantity as usize {
        let copy = ExecutionRecord {
            id: snowflake_id(),
            ..rows[0].clone()
        };
        rows.push(copy);
    }
    assign_unique_ids(&mut rows);
    rows
}

/// Re-roll IDs that collide within one write
fn assign_unique_ids(records: &mut [ExecutionRecord]) {
    let mut seen = HashSet::with_capacity(records.len());
    for record in records.iter_mut() {
        while !seen.insert(record.id) {
            record.id = snowflake_id();
        }
    }
}

/// Overwrite employee identity, treatment and fee from the new assignment
pub fn apply_reassignment(
    record: &mut ExecutionRecord,
    employee: &Employee,
    treatment: &Treatment,
    now: i64,
) {
    record.employee_id = employee.employee_id.clone();
    record.employee_name = employee.name.clone();
    record.employee_shortname = employee.shortname.clone();
    record.role_category = employee.role_category;
    record.treatment_name = treatment.name.clone();
    record.unit_fee = treatment.fee_for(employee.role_category);
    record.updated_at = now;
}

async fn prepare(
    state: &AppState,
    actor: &Employee,
    item: &ExecutionCreate,
    now: i64,
) -> ServiceResult<Vec<ExecutionRecord>> {
    let quantity = quantity_of(item)?;
    let treatment = treatments::find_active(&state.pool, item.treatment_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::TreatmentNotFound)
                .with_detail("treatment_id", item.treatment_id)
        })?;

    let appointment_id = item
        .appointment_id
        .as_deref()
        .map(str::trim)
        .filter(|s| !s.is_empty());
    let appointment = match appointment_id {
        Some(id) => Some(
            appointments::find_by_id(&state.feed_pool, id)
                .await?
                .ok_or_else(|| {
                    AppError::new(ErrorCode::AppointmentNotFound).with_detail("appointment_id", id)
                })?,
        ),
        None => None,
    };

    let target = resolve_target(item, appointment.as_ref(), state.today())?;
    let record = build_record(target, &treatment, actor, now);
    Ok(expand(record, quantity))
}

/// Record one execution for the caller
///
/// Quantities above one go through [`record_batch`].
pub async fn record(
    state: &AppState,
    actor: &CurrentEmployee,
    item: &ExecutionCreate,
) -> ServiceResult<ExecutionRecord> {
    actor.require_fee_earner()?;
    let quantity = quantity_of(item)?;
    if quantity != 1 {
        let err = AppError::validation("Use the batch endpoint to record a quantity")
            .with_detail("quantity", quantity);
        return Err(err.into());
    }
    let record = prepare(state, &actor.employee, item, now_millis())
        .await?
        .pop()
        .ok_or_else(|| AppError::internal("Nothing to record"))?;
    executions::insert(&state.pool, &record).await?;

    tracing::info!(
        record_id = record.id,
        employee_id = %record.employee_id,
        treatment = %record.treatment_name,
        unit_fee = record.unit_fee,
        "Execution recorded"
    );
    Ok(record)
}

/// Record several executions in one transaction
///
/// Every item is validated before anything is written; the first invalid
/// item fails the batch with its position in `details.index`. An item with
/// `quantity` n is written as n rows.
pub async fn record_batch(
    state: &AppState,
    actor: &CurrentEmployee,
    items: &[ExecutionCreate],
) -> ServiceResult<Vec<ExecutionRecord>> {
    actor.require_fee_earner()?;
    if items.is_empty() {
        return Err(AppError::new(ErrorCode::BatchEmpty).into());
    }

    let now = now_millis();
    let mut records = Vec::with_capacity(items.len());
    for (index, item) in items.iter().enumerate() {
        let rows = prepare(state, &actor.employee, item, now)
            .await
            .map_err(|e| with_index(e, index))?;
        records.extend(rows);
    }
    assign_unique_ids(&mut records);

    let mut tx = state.pool.begin().await?;
    for record in &records {
        executions::insert(&mut *tx, record).await?;
    }
    tx.commit().await?;

    tracing::info!(
        employee_id = %actor.id(),
        items = items.len(),
        count = records.len(),
        "Execution batch recorded"
    );
    Ok(records)
}

fn with_index(e: ServiceError, index: usize) -> ServiceError {
    match e {
        ServiceError::App(err) => ServiceError::App(err.with_detail("index", index)),
        other => other,
    }
}

/// Delete a record: its owner or anyone with edit permission
pub async fn delete(
    state: &AppState,
    actor: &CurrentEmployee,
    record_id: i64,
) -> ServiceResult<()> {
    let record = find(state, record_id).await?;
    if !actor.can_modify_record(&record.employee_id) {
        security_log!(
            "WARN",
            "record_delete_denied",
            employee_id = actor.id().to_string(),
            record_id = record_id
        );
        let msg = "Only the owner or an editor can delete this record";
        return Err(AppError::permission_denied(msg).into());
    }

    executions::delete(&state.pool, record_id).await?;
    tracing::info!(record_id, by = %actor.id(), "Execution record deleted");
    Ok(())
}

/// Move a record to another employee and/or treatment (editors only)
pub async fn reassign(
    state: &AppState,
    actor: &CurrentEmployee,
    record_id: i64,
    req: &ExecutionReassign,
) -> ServiceResult<ExecutionRecord> {
    actor.require_record_editor()?;
    let mut record = find(state, record_id).await?;

    let employee = employees::find_by_id(&state.pool, req.employee_id.trim())
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::EmployeeNotFound)
                .with_detail("employee_id", req.employee_id.as_str())
        })?;
    if state.access.is_pure_administrator(&employee) {
        let msg = "Records cannot be assigned to the administrator account";
        return Err(AppError::validation(msg).into());
    }
    let treatment = treatments::find_active(&state.pool, req.treatment_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::TreatmentNotFound)
                .with_detail("treatment_id", req.treatment_id)
        })?;

    let previous_fee = record.unit_fee;
    apply_reassignment(&mut record, &employee, &treatment, now_millis());
    executions::update_assignment(&state.pool, &record).await?;

    tracing::info!(
        record_id,
        by = %actor.id(),
        employee_id = %record.employee_id,
        previous_fee,
        unit_fee = record.unit_fee,
        "Execution record reassigned"
    );
    Ok(record)
}

async fn find(state: &AppState, record_id: i64) -> ServiceResult<ExecutionRecord> {
    executions::find_by_id(&state.pool, record_id)
        .await?
        .ok_or_else(|| {
            AppError::new(ErrorCode::ExecutionRecordNotFound)
                .with_detail("record_id", record_id)
                .into()
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::models::{EmployeeRole, RoleCategory};

    fn employee(id: &str, name: &str, title: &str) -> Employee {
        Employee {
            employee_id: id.into(),
            name: name.into(),
            job_title: title.into(),
            role_category: RoleCategory::classify(title),
            nickname: Some("暱稱".into()),
            shortname: Some(shared::util::last_char(name)),
            nickname_set_at: Some(1),
            role: EmployeeRole::User,
            can_edit_records: false,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn botox() -> Treatment {
        Treatment {
            id: 10,
            name: "Botox".into(),
            category: "Injection".into(),
            beautician_fee: Some(800.0),
            nurse_fee: Some(1000.0),
            consultant_fee: Some(600.0),
            is_active: true,
            created_at: 0,
            updated_at: 0,
        }
    }

    fn appointment() -> Appointment {
        Appointment {
            id: "A-1".into(),
            appointment_date: "2025-06-01".into(),
            customer_name: "林小姐".into(),
            time_24h: Some("14:30".into()),
            treatment_item: Some("肉毒".into()),
            consultant: None,
            assistant: None,
            physician: None,
            status: None,
            notes: None,
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2025, 6, 1).unwrap()
    }

    fn linked() -> ExecutionCreate {
        ExecutionCreate {
            appointment_id: Some("A-1".into()),
            treatment_id: 10,
            ..Default::default()
        }
    }

    #[test]
    fn beautician_records_beautician_fee() {
        let target = resolve_target(&linked(), Some(&appointment()), today()).unwrap();
        let record = build_record(target, &botox(), &employee("E1", "陳美美", "美容師"), 42);

        assert_eq!(record.unit_fee, 800.0);
        assert_eq!(record.treatment_name, "Botox");
        assert_eq!(record.customer_name.as_deref(), Some("林小姐"));
        assert_eq!(record.service_date, "2025-06-01");
        assert_eq!(record.service_time.as_deref(), Some("14:30"));
        assert_eq!(record.treatment_hint.as_deref(), Some("肉毒"));
        assert_eq!(record.appointment_id.as_deref(), Some("A-1"));
        assert_eq!(record.employee_shortname.as_deref(), Some("美"));
        assert_eq!(record.role_category, RoleCategory::Beautician);
        assert_eq!(record.created_at, 42);
    }

    #[test]
    fn daily_tally_needs_no_customer() {
        let item = ExecutionCreate {
            service_date: Some("2025-05-30".into()),
            treatment_id: 10,
            ..Default::default()
        };
        let target = resolve_target(&item, None, today()).unwrap();
        assert_eq!(target.customer_name, None);
        assert_eq!(target.appointment_id, None);
        assert_eq!(target.service_date, "2025-05-30");

        let blank = ExecutionCreate {
            customer_name: Some("  ".into()),
            treatment_id: 10,
            ..Default::default()
        };
        let target = resolve_target(&blank, None, today()).unwrap();
        assert_eq!(target.customer_name, None);
        assert_eq!(target.service_date, "2025-06-01");
    }

    #[test]
    fn walk_in_defaults_to_today() {
        let item = ExecutionCreate {
            customer_name: Some(" 王先生 ".into()),
            service_time: Some("".into()),
            treatment_id: 10,
            ..Default::default()
        };
        let target = resolve_target(&item, None, today()).unwrap();
        assert_eq!(target.customer_name.as_deref(), Some("王先生"));
        assert_eq!(target.service_date, "2025-06-01");
        assert_eq!(target.service_time, None);
        assert_eq!(target.appointment_id, None);
    }

    #[test]
    fn walk_in_rejects_bad_date() {
        let item = ExecutionCreate {
            customer_name: Some("王先生".into()),
            service_date: Some("June 1".into()),
            treatment_id: 10,
            ..Default::default()
        };
        assert_eq!(
            resolve_target(&item, None, today()).unwrap_err().code,
            ErrorCode::ValidationFailed
        );
    }

    #[test]
    fn quantity_defaults_to_one_and_is_bounded() {
        let mut item = linked();
        assert_eq!(quantity_of(&item).unwrap(), 1);

        item.quantity = Some(3);
        assert_eq!(quantity_of(&item).unwrap(), 3);

        for bad in [0, MAX_QUANTITY + 1] {
            item.quantity = Some(bad);
            let err = quantity_of(&item).unwrap_err();
            assert_eq!(err.code, ErrorCode::ValidationFailed);
            assert_eq!(err.details.unwrap()["quantity"], bad);
        }
    }

    #[test]
    fn quantity_expands_into_separate_rows() {
        let item = ExecutionCreate {
            treatment_id: 10,
            ..Default::default()
        };
        let nurse = employee("E1", "張護理", "護理師");
        let target = resolve_target(&item, None, today()).unwrap();
        let record = build_record(target, &botox(), &nurse, 7);
        let first_id = record.id;

        let rows = expand(record, MAX_QUANTITY);
        assert_eq!(rows.len(), MAX_QUANTITY as usize);
        assert_eq!(rows[0].id, first_id);

        let ids: HashSet<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), rows.len());
        for row in &rows {
            assert_eq!(row.unit_fee, 1000.0);
            assert_eq!(row.created_at, 7);
            assert_eq!(row.customer_name, None);
        }
    }

    #[test]
    fn colliding_ids_are_rerolled() {
        let target = resolve_target(&linked(), Some(&appointment()), today()).unwrap();
        let record = build_record(target, &botox(), &employee("E1", "陳美美", "美容師"), 1);
        let mut rows = vec![record.clone(), record.clone(), record];

        assign_unique_ids(&mut rows);
        let ids: HashSet<i64> = rows.iter().map(|r| r.id).collect();
        assert_eq!(ids.len(), 3);
    }

    #[test]
    fn reassignment_recomputes_fee_from_new_employee() {
        let target = resolve_target(&linked(), Some(&appointment()), today()).unwrap();
        let mut record = build_record(target, &botox(), &employee("EA", "陳美美", "美容師"), 1);
        assert_eq!(record.unit_fee, 800.0);

        let nurse = employee("EB", "張護理", "護理師");
        apply_reassignment(&mut record, &nurse, &botox(), 99);

        assert_eq!(record.unit_fee, 1000.0);
        assert_eq!(record.employee_id, "EB");
        assert_eq!(record.employee_name, "張護理");
        assert_eq!(record.employee_shortname.as_deref(), Some("理"));
        assert_eq!(record.role_category, RoleCategory::Nurse);
        assert_eq!(record.updated_at, 99);
        assert_eq!(record.created_at, 1);
        assert_eq!(record.customer_name.as_deref(), Some("林小姐"));
    }

    #[test]
    fn reassignment_never_keeps_old_fee() {
        let walk_in = ExecutionCreate {
            customer_name: Some("王先生".into()),
            treatment_id: 10,
            ..Default::default()
        };
        let target = resolve_target(&walk_in, None, today()).unwrap();
        let mut record = build_record(target, &botox(), &employee("EA", "陳美美", "美容師"), 1);
        let unpriced = Treatment {
            id: 11,
            name: "Consult".into(),
            nurse_fee: None,
            ..botox()
        };
        let nurse = employee("EB", "張護理", "護理師");
        apply_reassignment(&mut record, &nurse, &unpriced, 2);
        assert_eq!(record.unit_fee, 0.0);
        assert_eq!(record.treatment_name, "Consult");
    }

    #[test]
    fn batch_errors_carry_item_index() {
        let err = with_index(AppError::new(ErrorCode::TreatmentNotFound).into(), 3);
        let app: AppError = err.into();
        assert_eq!(app.code, ErrorCode::TreatmentNotFound);
        assert_eq!(app.details.unwrap()["index"], 3);
    }
}
