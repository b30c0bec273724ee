// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Error types for the API layer.

use crate::request_response::PlanEntryInfo;
use fleet_cert::CoreError;
use fleet_cert_domain::DomainError;
use fleet_cert_persistence::PersistenceError;

/// Authentication and authorization errors.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AuthError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
}

impl std::fmt::Display for AuthError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
        }
    }
}

impl std::error::Error for AuthError {}

/// API-level errors.
///
/// These are distinct from domain/core errors and represent the API
/// contract.
#[derive(Debug, Clone, PartialEq)]
pub enum ApiError {
    /// Authentication failed.
    AuthenticationFailed {
        /// The reason authentication failed.
        reason: String,
    },
    /// Authorization failed - the actor does not have permission.
    Unauthorized {
        /// The action that was attempted.
        action: String,
        /// The role required for this action.
        required_role: String,
    },
    /// A domain rule was violated.
    DomainRuleViolation {
        /// The rule that was violated.
        rule: String,
        /// A human-readable description of the violation.
        message: String,
    },
    /// Invalid input was provided.
    InvalidInput {
        /// The field that was invalid.
        field: String,
        /// A human-readable description of the error.
        message: String,
    },
    /// A requested resource was not found.
    ResourceNotFound {
        /// The type of resource that was not found.
        resource_type: String,
        /// A human-readable description of what was not found.
        message: String,
    },
    /// A planning run's bulk write was rejected; nothing was committed.
    ///
    /// Carries every attempted entry so the caller can diagnose the
    /// rejection and retry the batch.
    PlanNotCommitted {
        /// The entries the run attempted to persist.
        attempted: Vec<PlanEntryInfo>,
        /// The underlying failure.
        message: String,
    },
    /// An internal error occurred.
    Internal {
        /// A description of the internal error.
        message: String,
    },
}

impl std::fmt::Display for ApiError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::AuthenticationFailed { reason } => {
                write!(f, "Authentication failed: {reason}")
            }
            Self::Unauthorized {
                action,
                required_role,
            } => {
                write!(f, "Unauthorized: '{action}' requires {required_role} role")
            }
            Self::DomainRuleViolation { rule, message } => {
                write!(f, "Domain rule violation ({rule}): {message}")
            }
            Self::InvalidInput { field, message } => {
                write!(f, "Invalid input for field '{field}': {message}")
            }
            Self::ResourceNotFound {
                resource_type,
                message,
            } => {
                write!(f, "{resource_type} not found: {message}")
            }
            Self::PlanNotCommitted { attempted, message } => {
                write!(
                    f,
                    "Planning run not committed ({} entries attempted): {message}",
                    attempted.len()
                )
            }
            Self::Internal { message } => {
                write!(f, "Internal error: {message}")
            }
        }
    }
}

impl std::error::Error for ApiError {}

impl From<AuthError> for ApiError {
    fn from(err: AuthError) -> Self {
        match err {
            AuthError::AuthenticationFailed { reason } => Self::AuthenticationFailed { reason },
            AuthError::Unauthorized {
                action,
                required_role,
            } => Self::Unauthorized {
                action,
                required_role,
            },
        }
    }
}

/// Translates a domain error into an API error.
///
/// This translation is explicit and ensures domain errors are not leaked
/// directly.
#[must_use]
pub fn translate_domain_error(err: DomainError) -> ApiError {
    match err {
        DomainError::InvalidPilotId(msg) => ApiError::InvalidInput {
            field: String::from("pilot_id"),
            message: msg,
        },
        DomainError::InvalidPlanStatus(msg) => ApiError::InvalidInput {
            field: String::from("status"),
            message: format!("Invalid plan status: '{msg}'"),
        },
        DomainError::InvalidPriorityScore(score) => ApiError::InvalidInput {
            field: String::from("priority"),
            message: format!("Invalid priority score: {score}. Must be between 0 and 10"),
        },
        DomainError::InvalidCalendarHorizon { periods } => ApiError::InvalidInput {
            field: String::from("calendar_horizon"),
            message: format!("Invalid calendar horizon: {periods} periods"),
        },
        DomainError::DateOutsideCalendar { date, first, last } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date {date} is outside the roster calendar range {first} to {last}"),
        },
        DomainError::DateArithmeticOverflow { operation } => ApiError::InvalidInput {
            field: String::from("date"),
            message: format!("Date arithmetic overflow while {operation}"),
        },
        DomainError::PlannedDateOutsideWindow {
            planned,
            window_start,
            window_end,
        } => ApiError::DomainRuleViolation {
            rule: String::from("renewal_window"),
            message: format!(
                "Planned date {planned} is outside the renewal window {window_start} to {window_end}"
            ),
        },
        DomainError::PlannedDateAfterExpiry { planned, expiry } => ApiError::DomainRuleViolation {
            rule: String::from("renewal_window"),
            message: format!("Planned date {planned} is after the certification expiry {expiry}"),
        },
        DomainError::InvalidStatusTransition { from, to } => ApiError::DomainRuleViolation {
            rule: String::from("status_lifecycle"),
            message: format!(
                "Cannot transition plan status from {} to {}",
                from.as_str(),
                to.as_str()
            ),
        },
    }
}

/// Translates a core error into an API error.
///
/// This translation is explicit and ensures core errors are not leaked
/// directly.
#[must_use]
pub fn translate_core_error(err: CoreError) -> ApiError {
    match err {
        CoreError::DomainViolation(domain_err) => translate_domain_error(domain_err),
        CoreError::Internal(msg) => ApiError::Internal {
            message: format!("Internal error: {msg}"),
        },
    }
}

/// Maps a persistence failure to an internal API error.
///
/// Bulk-write rejections are handled separately by the planning
/// handler, which has the attempted entries in hand.
#[must_use]
pub fn translate_persistence_error(err: &PersistenceError) -> ApiError {
    ApiError::Internal {
        message: format!("Persistence error: {err}"),
    }
}
