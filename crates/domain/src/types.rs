// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::error::DomainError;
use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Represents a pilot's employee identifier.
///
/// Pilot ids are the sole identifier for a pilot within the fleet roster.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PilotId {
    /// The identifier value.
    value: String,
}

impl PilotId {
    /// Creates a new `PilotId`.
    ///
    /// Identifiers are normalized to uppercase to ensure case-insensitive
    /// uniqueness.
    ///
    /// # Arguments
    ///
    /// * `value` - The identifier value (will be normalized to uppercase)
    #[must_use]
    pub fn new(value: &str) -> Self {
        Self {
            value: value.trim().to_uppercase(),
        }
    }

    /// Returns the identifier value.
    #[must_use]
    pub fn value(&self) -> &str {
        &self.value
    }

    /// Returns true if the identifier is empty after normalization.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.value.is_empty()
    }
}

impl std::fmt::Display for PilotId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.value)
    }
}

/// Certification categories tracked for fleet pilots.
///
/// The set of known categories is closed; anything outside it is carried as
/// `Other` so an unrecognized category remains visible (and auditable)
/// rather than being silently collapsed into a lookup miss.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum CertCategory {
    /// Simulator proficiency check.
    ProficiencyCheck,
    /// Line check flown under supervision.
    LineCheck,
    /// Aviation medical certificate.
    Medical,
    /// Instrument rating renewal.
    InstrumentRating,
    /// Dangerous goods handling certification.
    DangerousGoods,
    /// Crew resource management training.
    CrewResourceManagement,
    /// Aviation security awareness training.
    SecurityAwareness,
    /// Company identification card.
    IdCard,
    /// Passport, visa, or other travel document.
    TravelDocument,
    /// A category not in the closed set, carried verbatim.
    Other(String),
}

impl CertCategory {
    /// Converts this category to its canonical label.
    #[must_use]
    pub fn as_str(&self) -> &str {
        match self {
            Self::ProficiencyCheck => "Proficiency Check",
            Self::LineCheck => "Line Check",
            Self::Medical => "Medical",
            Self::InstrumentRating => "Instrument Rating",
            Self::DangerousGoods => "Dangerous Goods",
            Self::CrewResourceManagement => "CRM",
            Self::SecurityAwareness => "Security Awareness",
            Self::IdCard => "ID Cards",
            Self::TravelDocument => "Travel Documents",
            Self::Other(label) => label,
        }
    }

    /// Parses a category label.
    ///
    /// Parsing is total: labels outside the closed set become
    /// `CertCategory::Other` with the trimmed original label preserved.
    #[must_use]
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "Proficiency Check" => Self::ProficiencyCheck,
            "Line Check" => Self::LineCheck,
            "Medical" => Self::Medical,
            "Instrument Rating" => Self::InstrumentRating,
            "Dangerous Goods" => Self::DangerousGoods,
            "CRM" => Self::CrewResourceManagement,
            "Security Awareness" => Self::SecurityAwareness,
            "ID Cards" => Self::IdCard,
            "Travel Documents" => Self::TravelDocument,
            other => Self::Other(other.to_string()),
        }
    }

    /// Returns true if this category is in the closed set of known
    /// categories.
    #[must_use]
    pub const fn is_known(&self) -> bool {
        !matches!(self, Self::Other(_))
    }
}

impl std::fmt::Display for CertCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A certification due for renewal.
///
/// Immutable input to a planning run, owned by the certification tracking
/// subsystem.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CertificationDue {
    /// The pilot holding the certification.
    pub pilot: PilotId,
    /// The certification category.
    pub category: CertCategory,
    /// The current expiry date.
    pub expiry_date: time::Date,
}

impl CertificationDue {
    /// Creates a new `CertificationDue`.
    ///
    /// # Arguments
    ///
    /// * `pilot` - The pilot holding the certification
    /// * `category` - The certification category
    /// * `expiry_date` - The current expiry date
    #[must_use]
    pub const fn new(pilot: PilotId, category: CertCategory, expiry_date: time::Date) -> Self {
        Self {
            pilot,
            category,
            expiry_date,
        }
    }
}

/// Lifecycle status of a renewal plan entry.
///
/// A plan entry is created as `Planned` by a planning run; subsequent
/// manual operations move it through the remaining states.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
pub enum PlanStatus {
    /// Created by a planning run, not yet confirmed.
    #[default]
    Planned,
    /// Confirmed by fleet administration.
    Confirmed,
    /// Renewal completed.
    Completed,
    /// Plan cancelled.
    Cancelled,
    /// Plan superseded by a rescheduled entry.
    Rescheduled,
}

impl PlanStatus {
    /// Converts this status to its string representation.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Planned => "planned",
            Self::Confirmed => "confirmed",
            Self::Completed => "completed",
            Self::Cancelled => "cancelled",
            Self::Rescheduled => "rescheduled",
        }
    }

    /// Checks if a transition from this status to another is valid.
    ///
    /// Valid transitions are:
    /// - `Planned` → `Confirmed`, `Cancelled`, `Rescheduled`
    /// - `Confirmed` → `Completed`, `Cancelled`
    /// - `Rescheduled` → `Confirmed`, `Cancelled`
    ///
    /// `Completed` and `Cancelled` are terminal.
    #[must_use]
    pub const fn can_transition_to(&self, target: Self) -> bool {
        matches!(
            (self, target),
            (
                Self::Planned,
                Self::Confirmed | Self::Cancelled | Self::Rescheduled
            ) | (Self::Confirmed, Self::Completed | Self::Cancelled)
                | (Self::Rescheduled, Self::Confirmed | Self::Cancelled)
        )
    }
}

impl FromStr for PlanStatus {
    type Err = DomainError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "planned" => Ok(Self::Planned),
            "confirmed" => Ok(Self::Confirmed),
            "completed" => Ok(Self::Completed),
            "cancelled" => Ok(Self::Cancelled),
            "rescheduled" => Ok(Self::Rescheduled),
            _ => Err(DomainError::InvalidPlanStatus(s.to_string())),
        }
    }
}

impl std::fmt::Display for PlanStatus {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// A planned certification renewal assigned to a roster period.
///
/// The core output entity of a planning run. Construction enforces the
/// renewal-window invariants; an entry that would violate them cannot
/// exist.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RenewalPlanEntry {
    /// The pilot holding the certification.
    pub pilot: PilotId,
    /// The certification category.
    pub category: CertCategory,
    /// The original expiry date.
    pub expiry_date: time::Date,
    /// The planned renewal date, inside the renewal window.
    pub planned_date: time::Date,
    /// The assigned roster period code (e.g. "RP12/2025").
    pub roster_period: String,
    /// Renewal window start.
    pub window_start: time::Date,
    /// Renewal window end (equals the expiry date).
    pub window_end: time::Date,
    /// Lifecycle status.
    pub status: PlanStatus,
    /// Urgency score in 0-10.
    pub priority: u8,
}

impl RenewalPlanEntry {
    /// Maximum valid priority score.
    pub const MAX_PRIORITY: u8 = 10;

    /// Creates a new `RenewalPlanEntry`, enforcing creation invariants.
    ///
    /// # Arguments
    ///
    /// * `pilot` - The pilot holding the certification
    /// * `category` - The certification category
    /// * `expiry_date` - The original expiry date
    /// * `planned_date` - The planned renewal date
    /// * `roster_period` - The assigned roster period code
    /// * `window_start` - Renewal window start
    /// * `window_end` - Renewal window end
    /// * `status` - Lifecycle status
    /// * `priority` - Urgency score in 0-10
    ///
    /// # Errors
    ///
    /// Returns an error if:
    /// - The pilot id is empty
    /// - The planned date lies outside `[window_start, window_end]`
    /// - The planned date lies after the expiry date
    /// - The priority score exceeds 10
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        pilot: PilotId,
        category: CertCategory,
        expiry_date: time::Date,
        planned_date: time::Date,
        roster_period: String,
        window_start: time::Date,
        window_end: time::Date,
        status: PlanStatus,
        priority: u8,
    ) -> Result<Self, DomainError> {
        if pilot.is_empty() {
            return Err(DomainError::InvalidPilotId(String::from(
                "pilot id must not be empty",
            )));
        }
        if planned_date < window_start || planned_date > window_end {
            return Err(DomainError::PlannedDateOutsideWindow {
                planned: planned_date,
                window_start,
                window_end,
            });
        }
        if planned_date > expiry_date {
            return Err(DomainError::PlannedDateAfterExpiry {
                planned: planned_date,
                expiry: expiry_date,
            });
        }
        if priority > Self::MAX_PRIORITY {
            return Err(DomainError::InvalidPriorityScore(priority));
        }
        Ok(Self {
            pilot,
            category,
            expiry_date,
            planned_date,
            roster_period,
            window_start,
            window_end,
            status,
            priority,
        })
    }

    /// Transitions this entry to a new status.
    ///
    /// # Errors
    ///
    /// Returns an error if the transition is not permitted by the status
    /// lifecycle.
    pub fn transition_to(&mut self, target: PlanStatus) -> Result<(), DomainError> {
        if !self.status.can_transition_to(target) {
            return Err(DomainError::InvalidStatusTransition {
                from: self.status,
                to: target,
            });
        }
        self.status = target;
        Ok(())
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use time::macros::date;

    fn make_entry(
        planned: time::Date,
        window_start: time::Date,
        window_end: time::Date,
    ) -> Result<RenewalPlanEntry, DomainError> {
        RenewalPlanEntry::new(
            PilotId::new("PX1234"),
            CertCategory::Medical,
            window_end,
            planned,
            String::from("RP01/2026"),
            window_start,
            window_end,
            PlanStatus::Planned,
            5,
        )
    }

    #[test]
    fn test_pilot_id_normalized_uppercase() {
        let id: PilotId = PilotId::new(" px1234 ");
        assert_eq!(id.value(), "PX1234");
    }

    #[test]
    fn test_category_parse_round_trip() {
        for label in [
            "Proficiency Check",
            "Line Check",
            "Medical",
            "Instrument Rating",
            "Dangerous Goods",
            "CRM",
            "Security Awareness",
            "ID Cards",
            "Travel Documents",
        ] {
            let category: CertCategory = CertCategory::parse(label);
            assert!(category.is_known());
            assert_eq!(category.as_str(), label);
        }
    }

    #[test]
    fn test_category_unknown_preserved_verbatim() {
        let category: CertCategory = CertCategory::parse("Ditching Drill");
        assert_eq!(category, CertCategory::Other(String::from("Ditching Drill")));
        assert!(!category.is_known());
        assert_eq!(category.as_str(), "Ditching Drill");
    }

    #[test]
    fn test_plan_status_round_trip() {
        for status in [
            PlanStatus::Planned,
            PlanStatus::Confirmed,
            PlanStatus::Completed,
            PlanStatus::Cancelled,
            PlanStatus::Rescheduled,
        ] {
            assert_eq!(status.as_str().parse::<PlanStatus>().unwrap(), status);
        }
    }

    #[test]
    fn test_plan_status_invalid_string() {
        let result = "tentative".parse::<PlanStatus>();
        assert_eq!(
            result,
            Err(DomainError::InvalidPlanStatus(String::from("tentative")))
        );
    }

    #[test]
    fn test_terminal_statuses_reject_transitions() {
        for terminal in [PlanStatus::Completed, PlanStatus::Cancelled] {
            for target in [
                PlanStatus::Planned,
                PlanStatus::Confirmed,
                PlanStatus::Completed,
                PlanStatus::Cancelled,
                PlanStatus::Rescheduled,
            ] {
                assert!(!terminal.can_transition_to(target));
            }
        }
    }

    #[test]
    fn test_planned_entry_transitions() {
        assert!(PlanStatus::Planned.can_transition_to(PlanStatus::Confirmed));
        assert!(PlanStatus::Planned.can_transition_to(PlanStatus::Cancelled));
        assert!(PlanStatus::Planned.can_transition_to(PlanStatus::Rescheduled));
        assert!(!PlanStatus::Planned.can_transition_to(PlanStatus::Completed));
        assert!(PlanStatus::Confirmed.can_transition_to(PlanStatus::Completed));
    }

    #[test]
    fn test_entry_creation_inside_window() {
        let entry = make_entry(date!(2026 - 01 - 20), date!(2026 - 01 - 10), date!(2026 - 02 - 10));
        assert!(entry.is_ok());
    }

    #[test]
    fn test_entry_creation_rejects_date_before_window() {
        let entry = make_entry(date!(2026 - 01 - 05), date!(2026 - 01 - 10), date!(2026 - 02 - 10));
        assert!(matches!(
            entry,
            Err(DomainError::PlannedDateOutsideWindow { .. })
        ));
    }

    #[test]
    fn test_entry_creation_rejects_date_after_window() {
        let entry = make_entry(date!(2026 - 02 - 11), date!(2026 - 01 - 10), date!(2026 - 02 - 10));
        assert!(matches!(
            entry,
            Err(DomainError::PlannedDateOutsideWindow { .. })
        ));
    }

    #[test]
    fn test_entry_creation_rejects_empty_pilot() {
        let entry = RenewalPlanEntry::new(
            PilotId::new("  "),
            CertCategory::Medical,
            date!(2026 - 02 - 10),
            date!(2026 - 01 - 20),
            String::from("RP01/2026"),
            date!(2026 - 01 - 10),
            date!(2026 - 02 - 10),
            PlanStatus::Planned,
            5,
        );
        assert!(matches!(entry, Err(DomainError::InvalidPilotId(_))));
    }

    #[test]
    fn test_entry_transition_updates_status() {
        let mut entry = make_entry(
            date!(2026 - 01 - 20),
            date!(2026 - 01 - 10),
            date!(2026 - 02 - 10),
        )
        .unwrap();
        entry.transition_to(PlanStatus::Confirmed).unwrap();
        assert_eq!(entry.status, PlanStatus::Confirmed);

        let result = entry.transition_to(PlanStatus::Rescheduled);
        assert_eq!(
            result,
            Err(DomainError::InvalidStatusTransition {
                from: PlanStatus::Confirmed,
                to: PlanStatus::Rescheduled,
            })
        );
    }
}
