// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite schema for the Fleet Certification System.
//!
//! Dates are stored as ISO 8601 strings. The unique index on
//! `renewal_plans` enforces the one-active-plan-per-due-certification
//! rule at the storage layer; a violating batch insert fails as a whole.

/// DDL applied on every connection open. All statements are idempotent.
pub const SCHEMA_SQL: &str = "
CREATE TABLE IF NOT EXISTS certifications (
    certification_id INTEGER PRIMARY KEY AUTOINCREMENT,
    pilot_id TEXT NOT NULL,
    category TEXT NOT NULL,
    expiry_date TEXT NOT NULL,
    UNIQUE (pilot_id, category, expiry_date)
);

CREATE TABLE IF NOT EXISTS roster_capacity (
    capacity_id INTEGER PRIMARY KEY AUTOINCREMENT,
    roster_period TEXT NOT NULL,
    category TEXT NOT NULL,
    max_count INTEGER NOT NULL,
    UNIQUE (roster_period, category)
);

CREATE TABLE IF NOT EXISTS renewal_plans (
    plan_id INTEGER PRIMARY KEY AUTOINCREMENT,
    pilot_id TEXT NOT NULL,
    category TEXT NOT NULL,
    expiry_date TEXT NOT NULL,
    planned_date TEXT NOT NULL,
    roster_period TEXT NOT NULL,
    window_start TEXT NOT NULL,
    window_end TEXT NOT NULL,
    status TEXT NOT NULL,
    priority INTEGER NOT NULL,
    UNIQUE (pilot_id, category, expiry_date)
);

CREATE INDEX IF NOT EXISTS idx_renewal_plans_period
    ON renewal_plans (roster_period);

CREATE INDEX IF NOT EXISTS idx_renewal_plans_pilot
    ON renewal_plans (pilot_id);

CREATE TABLE IF NOT EXISTS audit_events (
    event_id INTEGER PRIMARY KEY AUTOINCREMENT,
    actor_id TEXT NOT NULL,
    actor_type TEXT NOT NULL,
    cause_id TEXT NOT NULL,
    cause_description TEXT NOT NULL,
    action_name TEXT NOT NULL,
    action_details TEXT,
    before_snapshot TEXT NOT NULL,
    after_snapshot TEXT NOT NULL
);
";
