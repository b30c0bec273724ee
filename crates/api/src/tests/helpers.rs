// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::auth::{AuthenticatedActor, Role};
use crate::handlers::{PlanningConfig, record_certification, set_capacity};
use crate::request_response::{
    GeneratePlanRequest, RecordCertificationRequest, SetCapacityRequest,
};
use fleet_cert_audit::Cause;
use fleet_cert_persistence::SqlitePersistence;

/// Fixed reference date for deterministic runs.
pub const AS_OF: &str = "2025-11-01";

pub fn admin() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("ops-1"), Role::Admin)
}

pub fn planner() -> AuthenticatedActor {
    AuthenticatedActor::new(String::from("planner-1"), Role::Planner)
}

pub fn make_cause() -> Cause {
    Cause::new(String::from("req-1"), String::from("Test planning request"))
}

pub fn make_persistence() -> SqlitePersistence {
    SqlitePersistence::new_in_memory().expect("Failed to create in-memory persistence")
}

pub fn make_config() -> PlanningConfig {
    PlanningConfig::default()
}

pub fn plan_request(horizon_months: u32) -> GeneratePlanRequest {
    GeneratePlanRequest {
        horizon_months,
        as_of: Some(String::from(AS_OF)),
        category_filter: None,
        pilot_filter: None,
    }
}

pub fn seed_certification(
    persistence: &mut SqlitePersistence,
    pilot_id: &str,
    category: &str,
    expiry_date: &str,
) {
    record_certification(
        persistence,
        &RecordCertificationRequest {
            pilot_id: pilot_id.to_string(),
            category: category.to_string(),
            expiry_date: expiry_date.to_string(),
        },
        &admin(),
    )
    .expect("Failed to seed certification");
}

pub fn seed_capacity(
    persistence: &mut SqlitePersistence,
    roster_period: &str,
    category: &str,
    max_count: u32,
) {
    set_capacity(
        persistence,
        &SetCapacityRequest {
            roster_period: roster_period.to_string(),
            category: category.to_string(),
            max_count,
        },
        &admin(),
    )
    .expect("Failed to seed capacity");
}
