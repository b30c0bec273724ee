// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Authentication and authorization types and services.
//!
//! Real authentication lives outside this system; the API accepts an
//! already-identified actor through `authenticate_stub` and enforces
//! role-based authorization on every operation.

use fleet_cert_audit::Actor;

use crate::error::AuthError;

/// Actor roles for authorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Admin role: full authority, including destructive operations
    /// (clearing the plan population) and capacity configuration.
    Admin,
    /// Planner role: may record certifications, run planning passes,
    /// and read every projection, but may not destroy data or change
    /// capacity configuration.
    Planner,
}

impl Role {
    /// Converts this role to its audit actor type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Admin => "admin",
            Self::Planner => "planner",
        }
    }
}

/// An authenticated actor with an associated role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthenticatedActor {
    /// The unique identifier for this actor.
    pub id: String,
    /// The role assigned to this actor.
    pub role: Role,
}

impl AuthenticatedActor {
    /// Creates a new authenticated actor.
    ///
    /// # Arguments
    ///
    /// * `id` - The unique identifier for this actor
    /// * `role` - The role assigned to this actor
    #[must_use]
    pub const fn new(id: String, role: Role) -> Self {
        Self { id, role }
    }

    /// Converts this authenticated actor into an audit Actor.
    #[must_use]
    pub fn to_audit_actor(&self) -> Actor {
        Actor::new(self.id.clone(), self.role.as_str().to_string())
    }
}

/// Authenticates an actor identified by the caller.
///
/// The surrounding application owns real authentication; this stub only
/// rejects anonymous actors so every audit event has an attributable id.
///
/// # Arguments
///
/// * `actor_id` - The identifier supplied by the caller
/// * `role` - The role the caller claims
///
/// # Errors
///
/// Returns an error if the actor id is empty.
pub fn authenticate_stub(actor_id: String, role: Role) -> Result<AuthenticatedActor, AuthError> {
    if actor_id.is_empty() {
        return Err(AuthError::AuthenticationFailed {
            reason: String::from("Actor ID cannot be empty"),
        });
    }
    Ok(AuthenticatedActor::new(actor_id, role))
}

/// Authorization service for enforcing role-based access control.
pub struct AuthorizationService;

impl AuthorizationService {
    /// Checks if an actor may run a planning pass.
    ///
    /// Both Admin and Planner actors may generate plans.
    ///
    /// # Errors
    ///
    /// This check currently always succeeds for authenticated actors;
    /// it exists so the call sites read uniformly and the policy has
    /// one place to tighten.
    pub const fn authorize_generate_plan(_actor: &AuthenticatedActor) -> Result<(), AuthError> {
        Ok(())
    }

    /// Checks if an actor may clear the entire plan population.
    ///
    /// Only Admin actors may perform destructive operations.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_clear_plans(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Planner => Err(AuthError::Unauthorized {
                action: String::from("clear_plans"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may change roster capacity configuration.
    ///
    /// Only Admin actors may change configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the actor does not have the Admin role.
    pub fn authorize_set_capacity(actor: &AuthenticatedActor) -> Result<(), AuthError> {
        match actor.role {
            Role::Admin => Ok(()),
            Role::Planner => Err(AuthError::Unauthorized {
                action: String::from("set_capacity"),
                required_role: String::from("Admin"),
            }),
        }
    }

    /// Checks if an actor may record a due certification.
    ///
    /// Both Admin and Planner actors may record certifications.
    ///
    /// # Errors
    ///
    /// This check currently always succeeds for authenticated actors.
    pub const fn authorize_record_certification(
        _actor: &AuthenticatedActor,
    ) -> Result<(), AuthError> {
        Ok(())
    }
}
