// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! API handler functions for planning and read-only operations.
//!
//! Handlers authorize the actor, validate and parse the request,
//! orchestrate the engine (prefetch reads, one allocation pass, one
//! bulk write), persist exactly one audit event per state change, and
//! translate every failure into the API error contract.

use std::collections::BTreeMap;
use time::Date;
use time::format_description::FormatItem;
use time::macros::format_description;
use tracing::{info, warn};

use fleet_cert::{
    Allocator, CapacityDirectory, PlanOutcome, PlanSummary, period_capacity_summary,
    summarize_plan,
};
use fleet_cert_audit::{Action, AuditEvent, Cause, PlanSnapshot};
use fleet_cert_domain::{
    CertCategory, CertificationDue, GracePeriodTable, PilotId, RosterCalendar,
};
use fleet_cert_persistence::{PersistenceError, SqlitePersistence};

use crate::auth::{AuthenticatedActor, AuthorizationService};
use crate::error::{ApiError, translate_core_error, translate_persistence_error};
use crate::request_response::{
    CapacityResponse, ClearPlansResponse, DueCertificationInfo, DueCertificationsResponse,
    GeneratePlanRequest, GeneratePlanResponse, PeriodPlansResponse, PeriodSummaryResponse,
    PilotPlansResponse, PlanEntryInfo, RecordCertificationRequest, RecordCertificationResponse,
    SetCapacityRequest, SkippedInfo,
};

/// Wire format for all request date fields.
const DATE_FORMAT: &[FormatItem<'static>] = format_description!("[year]-[month]-[day]");

/// Maximum accepted planning horizon.
const MAX_HORIZON_MONTHS: u32 = 36;

/// Injected planning configuration: the grace period table and the
/// roster calendar a run plans against.
#[derive(Debug, Clone, Default)]
pub struct PlanningConfig {
    /// Grace period configuration.
    pub grace_periods: GracePeriodTable,
    /// The roster period calendar.
    pub calendar: RosterCalendar,
}

/// Parses an ISO 8601 date field from a request.
fn parse_date_field(value: &str, field: &str) -> Result<Date, ApiError> {
    Date::parse(value, DATE_FORMAT).map_err(|err| ApiError::InvalidInput {
        field: field.to_string(),
        message: format!("Failed to parse date '{value}': {err}"),
    })
}

/// Validates a planning horizon before the run starts.
fn validate_horizon(horizon_months: u32) -> Result<(), ApiError> {
    if horizon_months == 0 || horizon_months > MAX_HORIZON_MONTHS {
        return Err(ApiError::InvalidInput {
            field: String::from("horizon_months"),
            message: format!(
                "Invalid horizon: {horizon_months}. Must be between 1 and {MAX_HORIZON_MONTHS}"
            ),
        });
    }
    Ok(())
}

/// Resolves the run's reference date from an optional request field.
fn resolve_as_of(as_of: Option<&str>) -> Result<Date, ApiError> {
    match as_of {
        Some(value) => parse_date_field(value, "as_of"),
        None => Ok(time::OffsetDateTime::now_utc().date()),
    }
}

/// Adds calendar months to a date, clamping the day to the target
/// month's length.
fn months_after(date: Date, months: u32) -> Result<Date, ApiError> {
    let months: i32 = i32::try_from(months).map_err(|_| ApiError::InvalidInput {
        field: String::from("horizon_months"),
        message: format!("Horizon out of range: {months}"),
    })?;
    let total: i32 = date.year() * 12 + i32::from(u8::from(date.month())) - 1 + months;
    let year: i32 = total.div_euclid(12);
    let month_number: u8 = u8::try_from(total.rem_euclid(12) + 1).map_err(|_| {
        ApiError::Internal {
            message: String::from("month arithmetic out of range"),
        }
    })?;
    let month: time::Month = time::Month::try_from(month_number).map_err(|err| {
        ApiError::Internal {
            message: format!("month arithmetic out of range: {err}"),
        }
    })?;
    let day: u8 = date.day().min(time::util::days_in_year_month(year, month));
    Date::from_calendar_date(year, month, day).map_err(|err| ApiError::Internal {
        message: format!("computing horizon cutoff: {err}"),
    })
}

/// Runs a planning pass and persists its output.
///
/// This function:
/// - Verifies the actor is authorized
/// - Rejects invalid input (horizon, dates) before the loop begins
/// - Prefetches due certifications and capacity exactly once
/// - Runs the allocator over the (optionally filtered) input
/// - Bulk-persists the emitted entries in one atomic write
/// - Persists exactly one audit event for the run
///
/// # Arguments
///
/// * `persistence` - The persistence gateway
/// * `config` - Injected grace period and calendar configuration
/// * `request` - The planning request
/// * `actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if:
/// - The actor is not authorized
/// - The horizon or a date field is invalid
/// - The bulk write is rejected (`PlanNotCommitted`, carrying every
///   attempted entry; nothing is committed)
pub fn generate_plan(
    persistence: &mut SqlitePersistence,
    config: &PlanningConfig,
    request: &GeneratePlanRequest,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<GeneratePlanResponse, ApiError> {
    AuthorizationService::authorize_generate_plan(actor)?;
    validate_horizon(request.horizon_months)?;
    let as_of: Date = resolve_as_of(request.as_of.as_deref())?;
    let cutoff: Date = months_after(as_of, request.horizon_months)?;

    info!(
        actor_id = %actor.id,
        horizon_months = request.horizon_months,
        %as_of,
        %cutoff,
        "Starting planning run"
    );

    // Both read interfaces are called once, before the loop.
    let mut due: Vec<CertificationDue> = persistence
        .due_certifications(cutoff)
        .map_err(|err| translate_persistence_error(&err))?;
    let capacities: CapacityDirectory = persistence
        .capacity_directory()
        .map_err(|err| translate_persistence_error(&err))?;

    if let Some(label) = request.category_filter.as_deref() {
        let category: CertCategory = CertCategory::parse(label);
        due.retain(|cert| cert.category == category);
    }
    if let Some(value) = request.pilot_filter.as_deref() {
        let pilot: PilotId = PilotId::new(value);
        if pilot.is_empty() {
            return Err(ApiError::InvalidInput {
                field: String::from("pilot_filter"),
                message: String::from("Pilot filter must not be empty"),
            });
        }
        due.retain(|cert| cert.pilot == pilot);
    }

    let allocator: Allocator = Allocator::new(
        config.grace_periods.clone(),
        config.calendar.clone(),
        as_of,
    );
    let outcome: PlanOutcome = allocator
        .generate_plan(&due, &capacities)
        .map_err(translate_core_error)?;

    for label in &outcome.unconfigured_categories {
        warn!(
            category = %label,
            "No grace period configured; planned with a zero-day window"
        );
    }

    let before_count: usize = persistence
        .plan_count()
        .map_err(|err| translate_persistence_error(&err))?;

    if let Err(err) = persistence.bulk_insert_plans(&outcome.entries) {
        return Err(ApiError::PlanNotCommitted {
            attempted: outcome.entries.iter().map(PlanEntryInfo::from).collect(),
            message: err.to_string(),
        });
    }

    let event: AuditEvent = AuditEvent::new(
        actor.to_audit_actor(),
        cause,
        Action::new(
            String::from("GeneratePlan"),
            Some(format!(
                "horizon_months={}, planned={}, skipped={}",
                request.horizon_months,
                outcome.entries.len(),
                outcome.skipped.len()
            )),
        ),
        PlanSnapshot::new(before_count, 0, String::from("before planning run")),
        PlanSnapshot::new(
            before_count + outcome.entries.len(),
            outcome.skipped.len(),
            String::from("after planning run"),
        ),
    );
    let event_id: i64 = persistence
        .persist_audit_event(&event)
        .map_err(|err| translate_persistence_error(&err))?;

    let summary: PlanSummary = summarize_plan(&outcome.entries);
    info!(
        event_id,
        planned = outcome.entries.len(),
        skipped = outcome.skipped.len(),
        "Planning run committed"
    );

    Ok(GeneratePlanResponse {
        total_plans: summary.total_plans,
        total_skipped: outcome.skipped.len(),
        by_category: summary.by_category,
        by_roster_period: summary.by_roster_period,
        skipped: outcome.skipped.iter().map(SkippedInfo::from).collect(),
        unconfigured_categories: outcome.unconfigured_categories,
        event_id,
    })
}

/// Deletes every plan entry, so a full plan can be regenerated.
///
/// Destructive; Admin only.
///
/// # Arguments
///
/// * `persistence` - The persistence gateway
/// * `actor` - The authenticated actor performing this action
/// * `cause` - The cause or reason for this action
///
/// # Errors
///
/// Returns an error if the actor is not an Admin or the delete fails.
pub fn clear_plans(
    persistence: &mut SqlitePersistence,
    actor: &AuthenticatedActor,
    cause: Cause,
) -> Result<ClearPlansResponse, ApiError> {
    AuthorizationService::authorize_clear_plans(actor)?;

    let before_count: usize = persistence
        .plan_count()
        .map_err(|err| translate_persistence_error(&err))?;
    let deleted_count: usize = persistence
        .clear_all_plans()
        .map_err(|err| translate_persistence_error(&err))?;

    let event: AuditEvent = AuditEvent::new(
        actor.to_audit_actor(),
        cause,
        Action::new(
            String::from("ClearPlans"),
            Some(format!("deleted={deleted_count}")),
        ),
        PlanSnapshot::new(before_count, 0, String::from("before clear")),
        PlanSnapshot::empty(String::from("after clear")),
    );
    let event_id: i64 = persistence
        .persist_audit_event(&event)
        .map_err(|err| translate_persistence_error(&err))?;

    info!(event_id, deleted_count, "Cleared plan population");

    Ok(ClearPlansResponse {
        deleted_count,
        event_id,
    })
}

/// Records a certification due for renewal.
///
/// # Arguments
///
/// * `persistence` - The persistence gateway
/// * `request` - The certification to record
/// * `actor` - The authenticated actor performing this action
///
/// # Errors
///
/// Returns an error if the actor is not authorized, a field is invalid,
/// or an identical certification is already recorded.
pub fn record_certification(
    persistence: &mut SqlitePersistence,
    request: &RecordCertificationRequest,
    actor: &AuthenticatedActor,
) -> Result<RecordCertificationResponse, ApiError> {
    AuthorizationService::authorize_record_certification(actor)?;

    let pilot: PilotId = PilotId::new(&request.pilot_id);
    if pilot.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("pilot_id"),
            message: String::from("Pilot id must not be empty"),
        });
    }
    let category: CertCategory = CertCategory::parse(&request.category);
    let expiry_date: Date = parse_date_field(&request.expiry_date, "expiry_date")?;

    let due: CertificationDue = CertificationDue::new(pilot, category, expiry_date);
    let certification_id: i64 =
        persistence
            .record_certification(&due)
            .map_err(|err| match &err {
                PersistenceError::DatabaseError(message)
                    if message.contains("UNIQUE constraint failed") =>
                {
                    ApiError::DomainRuleViolation {
                        rule: String::from("unique_certification"),
                        message: format!(
                            "Certification '{}' for pilot {} expiring {} is already recorded",
                            due.category, due.pilot, due.expiry_date
                        ),
                    }
                }
                _ => translate_persistence_error(&err),
            })?;

    Ok(RecordCertificationResponse {
        certification_id,
        pilot_id: due.pilot.value().to_string(),
        category: due.category.as_str().to_string(),
    })
}

/// Lists certifications due within a horizon.
///
/// # Arguments
///
/// * `persistence` - The persistence gateway
/// * `horizon_months` - Horizon in months
/// * `as_of` - Optional reference date (defaults to the current UTC
///   date)
///
/// # Errors
///
/// Returns an error if the horizon or date is invalid or the query
/// fails.
pub fn list_due_certifications(
    persistence: &SqlitePersistence,
    horizon_months: u32,
    as_of: Option<&str>,
) -> Result<DueCertificationsResponse, ApiError> {
    validate_horizon(horizon_months)?;
    let as_of: Date = resolve_as_of(as_of)?;
    let cutoff: Date = months_after(as_of, horizon_months)?;

    let due: Vec<CertificationDue> = persistence
        .due_certifications(cutoff)
        .map_err(|err| translate_persistence_error(&err))?;

    Ok(DueCertificationsResponse {
        cutoff: cutoff.to_string(),
        certifications: due
            .iter()
            .map(|cert| DueCertificationInfo {
                pilot_id: cert.pilot.value().to_string(),
                category: cert.category.as_str().to_string(),
                expiry_date: cert.expiry_date.to_string(),
            })
            .collect(),
    })
}

/// Sets the renewal capacity for a period/category pair.
///
/// Admin only.
///
/// # Arguments
///
/// * `persistence` - The persistence gateway
/// * `request` - The capacity to configure
/// * `actor` - The authenticated actor performing this action
///
/// # Errors
///
/// Returns an error if the actor is not an Admin, the period code is
/// empty, or the write fails.
pub fn set_capacity(
    persistence: &mut SqlitePersistence,
    request: &SetCapacityRequest,
    actor: &AuthenticatedActor,
) -> Result<CapacityResponse, ApiError> {
    AuthorizationService::authorize_set_capacity(actor)?;

    if request.roster_period.trim().is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("roster_period"),
            message: String::from("Roster period code must not be empty"),
        });
    }
    let category: CertCategory = CertCategory::parse(&request.category);
    persistence
        .set_capacity(&request.roster_period, &category, request.max_count)
        .map_err(|err| translate_persistence_error(&err))?;

    get_capacity(persistence, &request.roster_period)
}

/// Returns the configured capacity for a roster period.
///
/// A period with no configured capacity reports an empty map.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn get_capacity(
    persistence: &SqlitePersistence,
    period_code: &str,
) -> Result<CapacityResponse, ApiError> {
    let capacity = persistence
        .capacity_for_period(period_code)
        .map_err(|err| translate_persistence_error(&err))?;

    let by_category: BTreeMap<String, u32> = capacity
        .iter()
        .map(|(category, max_count)| (category.as_str().to_string(), *max_count))
        .collect();

    Ok(CapacityResponse {
        roster_period: period_code.to_string(),
        by_category,
    })
}

/// Returns the capacity utilization summary for a roster period.
///
/// # Errors
///
/// Returns an error if a query fails.
pub fn period_summary(
    persistence: &SqlitePersistence,
    period_code: &str,
) -> Result<PeriodSummaryResponse, ApiError> {
    let plans = persistence
        .plans_for_period(period_code)
        .map_err(|err| translate_persistence_error(&err))?;
    let capacity = persistence
        .capacity_for_period(period_code)
        .map_err(|err| translate_persistence_error(&err))?;

    Ok(PeriodSummaryResponse {
        summary: period_capacity_summary(period_code, &plans, &capacity),
    })
}

/// Returns the plan entries assigned to a roster period.
///
/// # Errors
///
/// Returns an error if the query fails.
pub fn period_plans(
    persistence: &SqlitePersistence,
    period_code: &str,
) -> Result<PeriodPlansResponse, ApiError> {
    let plans = persistence
        .plans_for_period(period_code)
        .map_err(|err| translate_persistence_error(&err))?;

    Ok(PeriodPlansResponse {
        roster_period: period_code.to_string(),
        plans: plans.iter().map(PlanEntryInfo::from).collect(),
    })
}

/// Returns one pilot's plan entries.
///
/// # Errors
///
/// Returns an error if the pilot id is empty or the query fails.
pub fn pilot_plans(
    persistence: &SqlitePersistence,
    pilot_id: &str,
) -> Result<PilotPlansResponse, ApiError> {
    let pilot: PilotId = PilotId::new(pilot_id);
    if pilot.is_empty() {
        return Err(ApiError::InvalidInput {
            field: String::from("pilot_id"),
            message: String::from("Pilot id must not be empty"),
        });
    }

    let plans = persistence
        .plans_for_pilot(&pilot)
        .map_err(|err| translate_persistence_error(&err))?;

    Ok(PilotPlansResponse {
        pilot_id: pilot.value().to_string(),
        plans: plans.iter().map(PlanEntryInfo::from).collect(),
    })
}
