// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::{PeriodCapacitySummary, PlanSummary, period_capacity_summary, summarize_plan};
use fleet_cert_domain::{CertCategory, PilotId, PlanStatus, RenewalPlanEntry};
use std::collections::HashMap;
use time::macros::date;

fn make_entry(pilot: &str, category: CertCategory, period: &str) -> RenewalPlanEntry {
    RenewalPlanEntry::new(
        PilotId::new(pilot),
        category,
        date!(2026 - 03 - 15),
        date!(2026 - 02 - 10),
        period.to_string(),
        date!(2026 - 01 - 14),
        date!(2026 - 03 - 15),
        PlanStatus::Planned,
        5,
    )
    .unwrap()
}

#[test]
fn test_summarize_counts_by_category_and_period() {
    let entries: Vec<RenewalPlanEntry> = vec![
        make_entry("PX1001", CertCategory::Medical, "RP02/2026"),
        make_entry("PX1002", CertCategory::Medical, "RP03/2026"),
        make_entry("PX1003", CertCategory::LineCheck, "RP02/2026"),
    ];

    let summary: PlanSummary = summarize_plan(&entries);

    assert_eq!(summary.total_plans, 3);
    assert_eq!(summary.by_category.get("Medical"), Some(&2));
    assert_eq!(summary.by_category.get("Line Check"), Some(&1));
    assert_eq!(summary.by_roster_period.get("RP02/2026"), Some(&2));
    assert_eq!(summary.by_roster_period.get("RP03/2026"), Some(&1));
}

#[test]
fn test_summarize_empty_plan() {
    let summary: PlanSummary = summarize_plan(&[]);
    assert_eq!(summary.total_plans, 0);
    assert!(summary.by_category.is_empty());
    assert!(summary.by_roster_period.is_empty());
}

#[test]
fn test_period_summary_utilization() {
    let entries: Vec<RenewalPlanEntry> = vec![
        make_entry("PX1001", CertCategory::Medical, "RP02/2026"),
        make_entry("PX1002", CertCategory::Medical, "RP02/2026"),
        make_entry("PX1003", CertCategory::LineCheck, "RP02/2026"),
        make_entry("PX1004", CertCategory::Medical, "RP03/2026"),
    ];
    let mut capacity: HashMap<CertCategory, u32> = HashMap::new();
    capacity.insert(CertCategory::Medical, 4);
    capacity.insert(CertCategory::LineCheck, 2);

    let summary: PeriodCapacitySummary =
        period_capacity_summary("RP02/2026", &entries, &capacity);

    assert_eq!(summary.total_capacity, 6);
    assert_eq!(summary.total_planned, 3);
    assert!((summary.utilization_percentage - 50.0).abs() < f64::EPSILON);
    assert_eq!(summary.by_category.get("Medical").unwrap().planned, 2);
    assert_eq!(summary.by_category.get("Medical").unwrap().capacity, 4);
    assert_eq!(summary.by_category.get("Line Check").unwrap().planned, 1);
}

#[test]
fn test_period_summary_zero_capacity_reports_zero_utilization() {
    let entries: Vec<RenewalPlanEntry> =
        vec![make_entry("PX1001", CertCategory::Medical, "RP02/2026")];

    let summary: PeriodCapacitySummary =
        period_capacity_summary("RP02/2026", &entries, &HashMap::new());

    assert_eq!(summary.total_capacity, 0);
    assert_eq!(summary.total_planned, 1);
    assert!((summary.utilization_percentage - 0.0).abs() < f64::EPSILON);
    // The planned-but-uncapacitied category still appears.
    assert_eq!(summary.by_category.get("Medical").unwrap().capacity, 0);
    assert_eq!(summary.by_category.get("Medical").unwrap().planned, 1);
}

#[test]
fn test_period_summary_ignores_other_periods() {
    let entries: Vec<RenewalPlanEntry> = vec![
        make_entry("PX1001", CertCategory::Medical, "RP02/2026"),
        make_entry("PX1002", CertCategory::Medical, "RP03/2026"),
    ];
    let mut capacity: HashMap<CertCategory, u32> = HashMap::new();
    capacity.insert(CertCategory::Medical, 10);

    let summary: PeriodCapacitySummary =
        period_capacity_summary("RP03/2026", &entries, &capacity);

    assert_eq!(summary.total_planned, 1);
}
