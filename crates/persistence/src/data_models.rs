// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! Serialization helpers between storage rows and domain types.

use crate::error::PersistenceError;
use fleet_cert_audit::PlanSnapshot;
use fleet_cert_domain::{CertCategory, PilotId, PlanStatus, RenewalPlanEntry};
use serde::{Deserialize, Serialize};
use std::str::FromStr;
use time::Date;
use time::format_description::FormatItem;
use time::macros::format_description;

/// Storage format for all date columns.
pub(crate) const DATE_FORMAT: &[FormatItem<'static>] =
    format_description!("[year]-[month]-[day]");

/// Formats a date for storage.
pub(crate) fn format_date(date: Date) -> Result<String, PersistenceError> {
    date.format(DATE_FORMAT)
        .map_err(|err| PersistenceError::SerializationError(format!("formatting {date}: {err}")))
}

/// Parses a stored date column.
pub(crate) fn parse_date(value: &str) -> Result<Date, PersistenceError> {
    Date::parse(value, DATE_FORMAT)
        .map_err(|err| PersistenceError::CorruptRecord(format!("date '{value}': {err}")))
}

/// JSON shape of a plan snapshot inside an audit event row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub(crate) struct SnapshotData {
    pub entry_count: usize,
    pub skip_count: usize,
    pub description: String,
}

impl From<&PlanSnapshot> for SnapshotData {
    fn from(snapshot: &PlanSnapshot) -> Self {
        Self {
            entry_count: snapshot.entry_count,
            skip_count: snapshot.skip_count,
            description: snapshot.description.clone(),
        }
    }
}

impl From<SnapshotData> for PlanSnapshot {
    fn from(data: SnapshotData) -> Self {
        Self::new(data.entry_count, data.skip_count, data.description)
    }
}

/// Raw column values of one `renewal_plans` row.
///
/// Columns are read as plain strings inside the rusqlite row closure and
/// converted to domain types afterwards, so conversion errors surface as
/// `PersistenceError` rather than being squeezed through rusqlite's error
/// type.
#[derive(Debug, Clone)]
pub(crate) struct PlanRow {
    pub pilot_id: String,
    pub category: String,
    pub expiry_date: String,
    pub planned_date: String,
    pub roster_period: String,
    pub window_start: String,
    pub window_end: String,
    pub status: String,
    pub priority: i64,
}

impl PlanRow {
    /// Converts a stored row back into a validated domain entry.
    ///
    /// Re-runs the entry creation invariants; a row that no longer
    /// satisfies them is reported as corrupt rather than returned.
    pub(crate) fn into_entry(self) -> Result<RenewalPlanEntry, PersistenceError> {
        let priority: u8 = u8::try_from(self.priority).map_err(|_| {
            PersistenceError::CorruptRecord(format!("priority {} out of range", self.priority))
        })?;
        let status: PlanStatus = PlanStatus::from_str(&self.status)
            .map_err(|err| PersistenceError::CorruptRecord(err.to_string()))?;

        RenewalPlanEntry::new(
            PilotId::new(&self.pilot_id),
            CertCategory::parse(&self.category),
            parse_date(&self.expiry_date)?,
            parse_date(&self.planned_date)?,
            self.roster_period,
            parse_date(&self.window_start)?,
            parse_date(&self.window_end)?,
            status,
            priority,
        )
        .map_err(|err| PersistenceError::CorruptRecord(err.to_string()))
    }
}
