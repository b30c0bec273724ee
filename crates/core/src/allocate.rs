// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! The renewal planning allocator.
//!
//! For each due certification the allocator computes the feasible
//! renewal window, enumerates the roster periods overlapping it, scores
//! each candidate by current relative load, assigns the least-loaded
//! period, and clamps the planned date into the window.
//!
//! ## Invariants
//!
//! - Certifications are processed in input order; input order is the
//!   tie-break when several certifications compete for the same
//!   least-loaded period
//! - Every input appears exactly once in either the emitted entries or
//!   the skip log, never both, never neither
//! - A certification with no feasible period is skipped and reported,
//!   never silently dropped; one infeasible certification never aborts
//!   the run
//! - The planned date always satisfies
//!   `window.start <= planned <= window.end`

use crate::error::CoreError;
use crate::state::{AllocationState, CapacityDirectory};
use fleet_cert_domain::{
    CertificationDue, GracePeriodTable, PlanStatus, RenewalPlanEntry, RenewalWindow,
    RosterCalendar, RosterPeriod, compute_renewal_window, priority_score,
};
use serde::{Deserialize, Serialize};
use time::Date;

/// Reason a certification could not be planned.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SkipReason {
    /// No registered roster period overlaps the renewal window.
    NoFeasibleRosterPeriod,
}

impl SkipReason {
    /// Converts this reason to its reason code.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::NoFeasibleRosterPeriod => "no_feasible_roster_period",
        }
    }
}

impl std::fmt::Display for SkipReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A due certification the run could not plan, with the reason.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SkippedCertification {
    /// The certification that was skipped.
    pub certification: CertificationDue,
    /// Why it was skipped.
    pub reason: SkipReason,
}

/// The complete result of one planning run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanOutcome {
    /// Emitted plan entries, in input order.
    pub entries: Vec<RenewalPlanEntry>,
    /// Certifications that could not be planned, in input order.
    pub skipped: Vec<SkippedCertification>,
    /// Labels of categories encountered without a grace period entry.
    ///
    /// These certifications were still planned (with a zero-day
    /// window), but the configuration gap is surfaced so it can be
    /// fixed rather than silently masked.
    pub unconfigured_categories: Vec<String>,
}

/// The renewal planning engine.
///
/// Holds the injected configuration a run needs: the grace period
/// table, the roster calendar, and the date to score urgency against.
/// The allocator itself is stateless across runs; each call to
/// [`Allocator::generate_plan`] owns a fresh [`AllocationState`].
#[derive(Debug, Clone)]
pub struct Allocator {
    grace_periods: GracePeriodTable,
    calendar: RosterCalendar,
    today: Date,
}

impl Allocator {
    /// Creates a new allocator.
    ///
    /// # Arguments
    ///
    /// * `grace_periods` - Grace period configuration
    /// * `calendar` - The roster period calendar
    /// * `today` - The date urgency scores are computed against
    #[must_use]
    pub const fn new(grace_periods: GracePeriodTable, calendar: RosterCalendar, today: Date) -> Self {
        Self {
            grace_periods,
            calendar,
            today,
        }
    }

    /// Runs one planning pass over the due certifications.
    ///
    /// Certifications are processed in input order, single-threaded;
    /// each decision sees the allocation counts left by the previous
    /// one. Callers wanting urgency-first allocation may sort the input
    /// by priority score before calling; the allocator itself never
    /// reorders.
    ///
    /// # Arguments
    ///
    /// * `due_certs` - Due certifications, in the order to process them
    /// * `capacities` - Prefetched per-period capacity limits
    ///
    /// # Returns
    ///
    /// A [`PlanOutcome`] partitioning every input into plan entries and
    /// skips.
    ///
    /// # Errors
    ///
    /// Returns an error only for run-level failures (date arithmetic
    /// overflow, broken entry invariants); per-certification
    /// infeasibility is reported in the outcome's skip log instead.
    pub fn generate_plan(
        &self,
        due_certs: &[CertificationDue],
        capacities: &CapacityDirectory,
    ) -> Result<PlanOutcome, CoreError> {
        let mut state: AllocationState = AllocationState::new();
        let mut entries: Vec<RenewalPlanEntry> = Vec::with_capacity(due_certs.len());
        let mut skipped: Vec<SkippedCertification> = Vec::new();
        let mut unconfigured_categories: Vec<String> = Vec::new();

        for due in due_certs {
            if !self.grace_periods.is_configured(&due.category) {
                let label: &str = due.category.as_str();
                if !unconfigured_categories.iter().any(|c| c == label) {
                    unconfigured_categories.push(label.to_string());
                }
            }

            let window: RenewalWindow =
                compute_renewal_window(due.expiry_date, &due.category, &self.grace_periods)?;

            let candidates: Vec<RosterPeriod> =
                self.calendar.periods_overlapping(window.start, window.end);
            let Some(selected) = select_least_loaded(&candidates, due, &state, capacities) else {
                skipped.push(SkippedCertification {
                    certification: due.clone(),
                    reason: SkipReason::NoFeasibleRosterPeriod,
                });
                continue;
            };

            // The clamp runs unconditionally: the chosen period's start
            // can precede the window or trail the expiry.
            let planned_date: Date = window.clamp(selected.start);

            let entry: RenewalPlanEntry = RenewalPlanEntry::new(
                due.pilot.clone(),
                due.category.clone(),
                due.expiry_date,
                planned_date,
                selected.code.clone(),
                window.start,
                window.end,
                PlanStatus::Planned,
                priority_score(due.expiry_date, self.today),
            )?;

            state.record(&selected.code, &due.category);
            entries.push(entry);
        }

        Ok(PlanOutcome {
            entries,
            skipped,
            unconfigured_categories,
        })
    }
}

/// Relative load of a period/category pair.
///
/// A configured capacity of 0 scores as fully loaded (1.0) rather than
/// dividing by zero, which deprioritizes the period without making it
/// ineligible.
fn load_score(assigned: u32, capacity: u32) -> f64 {
    if capacity == 0 {
        1.0
    } else {
        f64::from(assigned) / f64::from(capacity)
    }
}

/// Selects the candidate with the strictly lowest load score.
///
/// Candidates arrive in chronological order; on ties the earliest
/// period wins, so the first strictly-lower score is the only thing
/// that displaces a selection.
fn select_least_loaded<'a>(
    candidates: &'a [RosterPeriod],
    due: &CertificationDue,
    state: &AllocationState,
    capacities: &CapacityDirectory,
) -> Option<&'a RosterPeriod> {
    let mut best: Option<(&RosterPeriod, f64)> = None;
    for candidate in candidates {
        let assigned: u32 = state.count(&candidate.code, &due.category);
        let capacity: u32 = capacities.capacity(&candidate.code, &due.category);
        let score: f64 = load_score(assigned, capacity);
        match best {
            Some((_, best_score)) if score >= best_score => {}
            _ => best = Some((candidate, score)),
        }
    }
    best.map(|(period, _)| period)
}
