// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! CSV export of persisted plan entries.
//!
//! A read-only flat projection for spreadsheet consumers. One row per
//! plan entry, dates in ISO 8601.

use fleet_cert_domain::RenewalPlanEntry;
use fleet_cert_persistence::SqlitePersistence;
use thiserror::Error;

use crate::error::{ApiError, translate_persistence_error};

/// Column headers of the export, in order.
const EXPORT_HEADERS: &[&str] = &[
    "pilot_id",
    "category",
    "expiry_date",
    "planned_date",
    "roster_period",
    "window_start",
    "window_end",
    "status",
    "priority",
];

/// CSV serialization errors.
#[derive(Debug, Error)]
pub enum ExportError {
    /// The CSV writer rejected a record.
    #[error("CSV serialization failed: {0}")]
    Csv(#[from] csv::Error),

    /// The underlying buffer write failed.
    #[error("CSV writer failed: {0}")]
    Io(#[from] std::io::Error),

    /// The produced bytes were not valid UTF-8.
    #[error("CSV output was not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),
}

/// Exports every persisted plan entry as CSV.
///
/// # Errors
///
/// Returns an error if the query or serialization fails.
pub fn export_plans_csv(persistence: &SqlitePersistence) -> Result<String, ApiError> {
    let plans: Vec<RenewalPlanEntry> = persistence
        .all_plans()
        .map_err(|err| translate_persistence_error(&err))?;

    write_plans_csv(&plans).map_err(|err| ApiError::Internal {
        message: err.to_string(),
    })
}

/// Serializes plan entries into a CSV document.
fn write_plans_csv(entries: &[RenewalPlanEntry]) -> Result<String, ExportError> {
    let mut writer = csv::Writer::from_writer(Vec::new());
    writer.write_record(EXPORT_HEADERS)?;

    for entry in entries {
        let expiry_date: String = entry.expiry_date.to_string();
        let planned_date: String = entry.planned_date.to_string();
        let window_start: String = entry.window_start.to_string();
        let window_end: String = entry.window_end.to_string();
        let priority: String = entry.priority.to_string();
        writer.write_record([
            entry.pilot.value(),
            entry.category.as_str(),
            expiry_date.as_str(),
            planned_date.as_str(),
            entry.roster_period.as_str(),
            window_start.as_str(),
            window_end.as_str(),
            entry.status.as_str(),
            priority.as_str(),
        ])?;
    }

    let bytes: Vec<u8> = writer
        .into_inner()
        .map_err(|err| ExportError::Io(err.into_error()))?;
    Ok(String::from_utf8(bytes)?)
}
