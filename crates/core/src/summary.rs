// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Read-only aggregation over plan entries.

use fleet_cert_domain::{CertCategory, RenewalPlanEntry};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};

/// Totals for one planning run or one stored plan population.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlanSummary {
    /// Total number of plan entries.
    pub total_plans: usize,
    /// Entry counts keyed by category label.
    pub by_category: BTreeMap<String, usize>,
    /// Entry counts keyed by roster period code.
    pub by_roster_period: BTreeMap<String, usize>,
}

/// Summarizes plan entries by category and roster period.
#[must_use]
pub fn summarize_plan(entries: &[RenewalPlanEntry]) -> PlanSummary {
    let mut by_category: BTreeMap<String, usize> = BTreeMap::new();
    let mut by_roster_period: BTreeMap<String, usize> = BTreeMap::new();

    for entry in entries {
        *by_category
            .entry(entry.category.as_str().to_string())
            .or_insert(0) += 1;
        *by_roster_period
            .entry(entry.roster_period.clone())
            .or_insert(0) += 1;
    }

    PlanSummary {
        total_plans: entries.len(),
        by_category,
        by_roster_period,
    }
}

/// Capacity utilization for one category within a period.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryUtilization {
    /// Configured capacity for the category.
    pub capacity: u32,
    /// Entries planned into the category.
    pub planned: usize,
}

/// Capacity utilization summary for one roster period.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PeriodCapacitySummary {
    /// The roster period code.
    pub period_code: String,
    /// Sum of configured capacity across categories.
    pub total_capacity: u32,
    /// Total entries planned into the period.
    pub total_planned: usize,
    /// `total_planned / total_capacity * 100`; 0.0 when no capacity is
    /// configured (a period without capacity reports zero utilization
    /// rather than dividing by zero).
    pub utilization_percentage: f64,
    /// Per-category breakdown.
    pub by_category: BTreeMap<String, CategoryUtilization>,
}

/// Aggregates planned entries against configured capacity for a period.
///
/// # Arguments
///
/// * `period_code` - The roster period to summarize
/// * `entries` - Plan entries (any period; non-matching entries are
///   ignored)
/// * `capacity` - The period's configured per-category capacity
#[must_use]
pub fn period_capacity_summary(
    period_code: &str,
    entries: &[RenewalPlanEntry],
    capacity: &HashMap<CertCategory, u32>,
) -> PeriodCapacitySummary {
    let mut by_category: BTreeMap<String, CategoryUtilization> = BTreeMap::new();
    for (category, max_count) in capacity {
        by_category.insert(
            category.as_str().to_string(),
            CategoryUtilization {
                capacity: *max_count,
                planned: 0,
            },
        );
    }

    let mut total_planned: usize = 0;
    for entry in entries {
        if entry.roster_period != period_code {
            continue;
        }
        total_planned += 1;
        by_category
            .entry(entry.category.as_str().to_string())
            .or_insert(CategoryUtilization {
                capacity: 0,
                planned: 0,
            })
            .planned += 1;
    }

    let total_capacity: u32 = capacity.values().copied().sum();
    let utilization_percentage: f64 = if total_capacity == 0 {
        0.0
    } else {
        let planned: u32 = u32::try_from(total_planned).unwrap_or(u32::MAX);
        f64::from(planned) / f64::from(total_capacity) * 100.0
    };

    PeriodCapacitySummary {
        period_code: period_code.to_string(),
        total_capacity,
        total_planned,
        utilization_percentage,
        by_category,
    }
}
