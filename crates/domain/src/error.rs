// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

use crate::types::PlanStatus;

/// Errors that can occur during domain validation and calculation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DomainError {
    /// Pilot identifier is empty or invalid.
    InvalidPilotId(String),
    /// Plan status string is not a recognized status.
    InvalidPlanStatus(String),
    /// Priority score is outside the 0-10 range.
    InvalidPriorityScore(u8),
    /// Roster calendar horizon must cover at least one period.
    InvalidCalendarHorizon {
        /// The invalid period count.
        periods: u32,
    },
    /// A date falls outside the calendar's registered periods.
    DateOutsideCalendar {
        /// The offending date.
        date: time::Date,
        /// First date covered by the calendar.
        first: time::Date,
        /// Last date covered by the calendar.
        last: time::Date,
    },
    /// Date arithmetic overflow.
    DateArithmeticOverflow {
        /// Description of the operation that failed.
        operation: String,
    },
    /// A planned renewal date lies outside its renewal window.
    PlannedDateOutsideWindow {
        /// The planned date.
        planned: time::Date,
        /// Window start (earliest eligible renewal date).
        window_start: time::Date,
        /// Window end (the expiry date).
        window_end: time::Date,
    },
    /// A planned renewal date lies after the certification expiry.
    PlannedDateAfterExpiry {
        /// The planned date.
        planned: time::Date,
        /// The certification expiry date.
        expiry: time::Date,
    },
    /// A plan status transition is not permitted.
    InvalidStatusTransition {
        /// The current status.
        from: PlanStatus,
        /// The requested status.
        to: PlanStatus,
    },
}

impl std::fmt::Display for DomainError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::InvalidPilotId(msg) => write!(f, "Invalid pilot id: {msg}"),
            Self::InvalidPlanStatus(msg) => write!(f, "Invalid plan status: '{msg}'"),
            Self::InvalidPriorityScore(score) => {
                write!(
                    f,
                    "Invalid priority score: {score}. Must be between 0 and 10"
                )
            }
            Self::InvalidCalendarHorizon { periods } => {
                write!(
                    f,
                    "Invalid calendar horizon: {periods} periods. Must be greater than 0"
                )
            }
            Self::DateOutsideCalendar { date, first, last } => {
                write!(
                    f,
                    "Date {date} is outside the roster calendar range {first} to {last}"
                )
            }
            Self::DateArithmeticOverflow { operation } => {
                write!(f, "Date arithmetic overflow while {operation}")
            }
            Self::PlannedDateOutsideWindow {
                planned,
                window_start,
                window_end,
            } => {
                write!(
                    f,
                    "Planned date {planned} is outside the renewal window {window_start} to {window_end}"
                )
            }
            Self::PlannedDateAfterExpiry { planned, expiry } => {
                write!(
                    f,
                    "Planned date {planned} is after the certification expiry {expiry}"
                )
            }
            Self::InvalidStatusTransition { from, to } => {
                write!(
                    f,
                    "Cannot transition plan status from {} to {}",
                    from.as_str(),
                    to.as_str()
                )
            }
        }
    }
}

impl std::error::Error for DomainError {}
