// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Request and response types for the API boundary.
//!
//! All dates cross the boundary as ISO 8601 strings; parsing and
//! validation happen in the handlers before any engine code runs.

use fleet_cert::{PeriodCapacitySummary, SkippedCertification};
use fleet_cert_domain::RenewalPlanEntry;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Request to run a planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePlanRequest {
    /// Horizon in months; certifications expiring within it are planned.
    pub horizon_months: u32,
    /// The date the run plans from. Defaults to the current UTC date.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub as_of: Option<String>,
    /// Restrict the run to one certification category.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub category_filter: Option<String>,
    /// Restrict the run to one pilot.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pilot_filter: Option<String>,
}

/// A plan entry as it crosses the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanEntryInfo {
    /// The pilot's employee identifier.
    pub pilot_id: String,
    /// The certification category label.
    pub category: String,
    /// Original expiry date.
    pub expiry_date: String,
    /// Planned renewal date.
    pub planned_date: String,
    /// Assigned roster period code.
    pub roster_period: String,
    /// Renewal window start.
    pub window_start: String,
    /// Renewal window end.
    pub window_end: String,
    /// Lifecycle status.
    pub status: String,
    /// Urgency score in 0-10.
    pub priority: u8,
}

impl From<&RenewalPlanEntry> for PlanEntryInfo {
    fn from(entry: &RenewalPlanEntry) -> Self {
        Self {
            pilot_id: entry.pilot.value().to_string(),
            category: entry.category.as_str().to_string(),
            expiry_date: entry.expiry_date.to_string(),
            planned_date: entry.planned_date.to_string(),
            roster_period: entry.roster_period.clone(),
            window_start: entry.window_start.to_string(),
            window_end: entry.window_end.to_string(),
            status: entry.status.as_str().to_string(),
            priority: entry.priority,
        }
    }
}

/// A skipped certification as it crosses the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedInfo {
    /// The pilot's employee identifier.
    pub pilot_id: String,
    /// The certification category label.
    pub category: String,
    /// The certification expiry date.
    pub expiry_date: String,
    /// Structured reason code.
    pub reason: String,
}

impl From<&SkippedCertification> for SkippedInfo {
    fn from(skipped: &SkippedCertification) -> Self {
        Self {
            pilot_id: skipped.certification.pilot.value().to_string(),
            category: skipped.certification.category.as_str().to_string(),
            expiry_date: skipped.certification.expiry_date.to_string(),
            reason: skipped.reason.as_str().to_string(),
        }
    }
}

/// Response for a completed planning pass.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GeneratePlanResponse {
    /// Number of plan entries persisted.
    pub total_plans: usize,
    /// Number of certifications skipped.
    pub total_skipped: usize,
    /// Entry counts keyed by category label.
    pub by_category: BTreeMap<String, usize>,
    /// Entry counts keyed by roster period code.
    pub by_roster_period: BTreeMap<String, usize>,
    /// Certifications that could not be planned, with reasons.
    pub skipped: Vec<SkippedInfo>,
    /// Categories encountered without a grace period entry.
    pub unconfigured_categories: Vec<String>,
    /// The persisted audit event id for this run.
    pub event_id: i64,
}

/// Response for a destructive clear of all plans.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ClearPlansResponse {
    /// Number of entries deleted.
    pub deleted_count: usize,
    /// The persisted audit event id for this operation.
    pub event_id: i64,
}

/// Request to record a certification due for renewal.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCertificationRequest {
    /// The pilot's employee identifier.
    pub pilot_id: String,
    /// The certification category label.
    pub category: String,
    /// The expiry date (ISO 8601).
    pub expiry_date: String,
}

/// Response for a recorded certification.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RecordCertificationResponse {
    /// The stored certification id.
    pub certification_id: i64,
    /// The normalized pilot id.
    pub pilot_id: String,
    /// The canonical category label.
    pub category: String,
}

/// Response listing due certifications within a horizon.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueCertificationsResponse {
    /// The cutoff date the horizon resolved to.
    pub cutoff: String,
    /// Due certifications, ordered by expiry then pilot.
    pub certifications: Vec<DueCertificationInfo>,
}

/// A due certification as it crosses the API boundary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DueCertificationInfo {
    /// The pilot's employee identifier.
    pub pilot_id: String,
    /// The certification category label.
    pub category: String,
    /// The expiry date.
    pub expiry_date: String,
}

/// Request to set roster capacity for a period/category pair.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SetCapacityRequest {
    /// The roster period code.
    pub roster_period: String,
    /// The certification category label.
    pub category: String,
    /// Maximum renewals for the pair.
    pub max_count: u32,
}

/// Response with a period's configured capacity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CapacityResponse {
    /// The roster period code.
    pub roster_period: String,
    /// Capacity keyed by category label.
    pub by_category: BTreeMap<String, u32>,
}

/// Response with a period's capacity utilization summary.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodSummaryResponse {
    /// The aggregated summary.
    pub summary: PeriodCapacitySummary,
}

/// Response listing one pilot's plan entries.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PilotPlansResponse {
    /// The normalized pilot id.
    pub pilot_id: String,
    /// The pilot's plan entries, ordered by planned date.
    pub plans: Vec<PlanEntryInfo>,
}

/// Response listing plan entries for a roster period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PeriodPlansResponse {
    /// The roster period code.
    pub roster_period: String,
    /// The period's plan entries, ordered by planned date then pilot.
    pub plans: Vec<PlanEntryInfo>,
}
