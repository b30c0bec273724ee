// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

#![deny(
    clippy::pedantic,
    clippy::cargo,
    clippy::nursery,
    clippy::style,
    clippy::correctness,
    clippy::all,
    clippy::suspicious,
    clippy::complexity,
    clippy::perf,
    clippy::unwrap_used,
    clippy::expect_used
)]

mod auth;
mod error;
mod export;
mod handlers;
mod request_response;

#[cfg(test)]
mod tests;

pub use auth::{AuthenticatedActor, AuthorizationService, Role, authenticate_stub};
pub use error::{
    ApiError, AuthError, translate_core_error, translate_domain_error,
    translate_persistence_error,
};
pub use export::{ExportError, export_plans_csv};
pub use handlers::{
    PlanningConfig, clear_plans, generate_plan, get_capacity, list_due_certifications,
    period_plans, period_summary, pilot_plans, record_certification, set_capacity,
};
pub use request_response::{
    CapacityResponse, ClearPlansResponse, DueCertificationInfo, DueCertificationsResponse,
    GeneratePlanRequest, GeneratePlanResponse, PeriodPlansResponse, PeriodSummaryResponse,
    PilotPlansResponse, PlanEntryInfo, RecordCertificationRequest, RecordCertificationResponse,
    SetCapacityRequest, SkippedInfo,
};
