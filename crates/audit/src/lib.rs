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
    clippy::all
)]

//! Audit types for the Fleet Certification System.
//!
//! Every planning run and every destructive plan operation must produce
//! exactly one audit event. Events are immutable once created and capture
//! who acted, why, what was done, and the plan population before and
//! after.

/// Represents the entity performing an action.
///
/// An actor is any identifiable entity that initiates a plan change:
/// an operator, a scheduled job, or the system itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Actor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The type of actor (e.g., "admin", "planner", "scheduler").
    pub actor_type: String,
}

impl Actor {
    /// Creates a new Actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `actor_type` - The type of actor
    #[must_use]
    pub const fn new(id: String, actor_type: String) -> Self {
        Self { id, actor_type }
    }
}

/// Represents the reason or trigger for an action.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Cause {
    /// A unique identifier for this cause (e.g., request ID).
    pub id: String,
    /// A description of the cause.
    pub description: String,
}

impl Cause {
    /// Creates a new Cause.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this cause
    /// * `description` - A description of what triggered this action
    #[must_use]
    pub const fn new(id: String, description: String) -> Self {
        Self { id, description }
    }
}

/// Represents the specific action performed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Action {
    /// The name of the action (e.g., "`GeneratePlan`", "`ClearPlans`").
    pub name: String,
    /// Optional additional details about the action.
    pub details: Option<String>,
}

impl Action {
    /// Creates a new Action.
    ///
    /// # Arguments
    ///
    /// * `name` - The name of the action
    /// * `details` - Optional additional details
    #[must_use]
    pub const fn new(name: String, details: Option<String>) -> Self {
        Self { name, details }
    }
}

/// A snapshot of the plan population at a point in time.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanSnapshot {
    /// Number of persisted plan entries.
    pub entry_count: usize,
    /// Number of certifications skipped by the most recent run.
    pub skip_count: usize,
    /// A short description of the snapshot context.
    pub description: String,
}

impl PlanSnapshot {
    /// Creates a new `PlanSnapshot`.
    ///
    /// # Arguments
    ///
    /// * `entry_count` - Number of persisted plan entries
    /// * `skip_count` - Number of skipped certifications
    /// * `description` - A short description of the snapshot context
    #[must_use]
    pub const fn new(entry_count: usize, skip_count: usize, description: String) -> Self {
        Self {
            entry_count,
            skip_count,
            description,
        }
    }

    /// Creates an empty snapshot (no plans, no skips).
    #[must_use]
    pub const fn empty(description: String) -> Self {
        Self::new(0, 0, description)
    }
}

/// An immutable audit event recording one plan operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuditEvent {
    /// The persisted event id, `None` until stored.
    pub event_id: Option<i64>,
    /// The actor who initiated this operation.
    pub actor: Actor,
    /// The cause or reason for this operation.
    pub cause: Cause,
    /// The action that was performed.
    pub action: Action,
    /// The plan population before the operation.
    pub before: PlanSnapshot,
    /// The plan population after the operation.
    pub after: PlanSnapshot,
}

impl AuditEvent {
    /// Creates a new `AuditEvent`.
    ///
    /// Once created, an audit event is immutable; only the persistence
    /// layer assigns `event_id` when storing it.
    ///
    /// # Arguments
    ///
    /// * `actor` - The actor who initiated the operation
    /// * `cause` - The reason for the operation
    /// * `action` - The action that was performed
    /// * `before` - The plan population before the operation
    /// * `after` - The plan population after the operation
    #[must_use]
    pub const fn new(
        actor: Actor,
        cause: Cause,
        action: Action,
        before: PlanSnapshot,
        after: PlanSnapshot,
    ) -> Self {
        Self {
            event_id: None,
            actor,
            cause,
            action,
            before,
            after,
        }
    }

    /// Returns a copy of this event with a persisted id attached.
    #[must_use]
    pub fn with_event_id(mut self, event_id: i64) -> Self {
        self.event_id = Some(event_id);
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_event() -> AuditEvent {
        AuditEvent::new(
            Actor::new(String::from("ops-1"), String::from("admin")),
            Cause::new(String::from("req-42"), String::from("Quarterly planning")),
            Action::new(String::from("GeneratePlan"), Some(String::from("horizon=6"))),
            PlanSnapshot::empty(String::from("before run")),
            PlanSnapshot::new(12, 1, String::from("after run")),
        )
    }

    #[test]
    fn test_event_captures_all_fields() {
        let event: AuditEvent = make_event();
        assert_eq!(event.actor.id, "ops-1");
        assert_eq!(event.cause.id, "req-42");
        assert_eq!(event.action.name, "GeneratePlan");
        assert_eq!(event.before.entry_count, 0);
        assert_eq!(event.after.entry_count, 12);
        assert_eq!(event.after.skip_count, 1);
    }

    #[test]
    fn test_event_id_unset_until_persisted() {
        let event: AuditEvent = make_event();
        assert_eq!(event.event_id, None);

        let stored: AuditEvent = event.with_event_id(7);
        assert_eq!(stored.event_id, Some(7));
    }

    #[test]
    fn test_events_with_identical_fields_are_equal() {
        assert_eq!(make_event(), make_event());
    }

    #[test]
    fn test_empty_snapshot_has_zero_counts() {
        let snapshot: PlanSnapshot = PlanSnapshot::empty(String::from("initial"));
        assert_eq!(snapshot.entry_count, 0);
        assert_eq!(snapshot.skip_count, 0);
    }
}
