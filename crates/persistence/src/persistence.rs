// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

//! SQLite-backed persistence gateway.
//!
//! The gateway owns the connection and exposes the read and write
//! interfaces the planning engine is built against: due certifications,
//! roster capacity, bulk plan writes, and the audit trail.
//!
//! ## Invariants
//!
//! - A bulk plan write is atomic: either every entry in the batch is
//!   committed or none is
//! - Dates are stored as ISO 8601 strings
//! - Audit events are append-only

use rusqlite::{Connection, Transaction, params};
use std::collections::HashMap;
use tracing::{debug, info};

use fleet_cert::CapacityDirectory;
use fleet_cert_audit::{Action, Actor, AuditEvent, Cause, PlanSnapshot};
use fleet_cert_domain::{CertCategory, CertificationDue, PilotId, RenewalPlanEntry};

use crate::data_models::{PlanRow, SnapshotData, format_date, parse_date};
use crate::error::PersistenceError;
use crate::schema::SCHEMA_SQL;

/// SQLite persistence for certifications, capacity, plans, and audit
/// events.
#[derive(Debug)]
pub struct SqlitePersistence {
    conn: Connection,
}

impl SqlitePersistence {
    /// Creates a persistence layer backed by an in-memory database.
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema setup fails.
    pub fn new_in_memory() -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open_in_memory()
            .map_err(|err| PersistenceError::DatabaseConnectionFailed(err.to_string()))?;
        Self::from_connection(conn)
    }

    /// Creates a persistence layer backed by a database file.
    ///
    /// # Arguments
    ///
    /// * `path` - Path to the `SQLite` database file (created if absent)
    ///
    /// # Errors
    ///
    /// Returns an error if the connection or schema setup fails.
    pub fn new_with_file(path: &str) -> Result<Self, PersistenceError> {
        let conn: Connection = Connection::open(path)
            .map_err(|err| PersistenceError::DatabaseConnectionFailed(err.to_string()))?;
        Self::from_connection(conn)
    }

    fn from_connection(conn: Connection) -> Result<Self, PersistenceError> {
        conn.execute_batch(SCHEMA_SQL)
            .map_err(|err| PersistenceError::InitializationError(err.to_string()))?;
        debug!("Initialized database schema");
        Ok(Self { conn })
    }

    // --- certifications ---------------------------------------------------

    /// Records a certification due for renewal.
    ///
    /// # Errors
    ///
    /// Returns an error if the insert fails (including a duplicate
    /// pilot/category/expiry record).
    pub fn record_certification(
        &mut self,
        due: &CertificationDue,
    ) -> Result<i64, PersistenceError> {
        self.conn.execute(
            "INSERT INTO certifications (pilot_id, category, expiry_date) VALUES (?1, ?2, ?3)",
            params![
                due.pilot.value(),
                due.category.as_str(),
                format_date(due.expiry_date)?,
            ],
        )?;
        let id: i64 = self.conn.last_insert_rowid();
        debug!(
            certification_id = id,
            pilot = %due.pilot,
            category = %due.category,
            "Recorded certification"
        );
        Ok(id)
    }

    /// Returns certifications expiring on or before the cutoff date,
    /// ordered by expiry then pilot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub fn due_certifications(
        &self,
        cutoff: time::Date,
    ) -> Result<Vec<CertificationDue>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT pilot_id, category, expiry_date FROM certifications
             WHERE expiry_date <= ?1
             ORDER BY expiry_date, pilot_id",
        )?;
        let rows: Vec<(String, String, String)> = stmt
            .query_map(params![format_date(cutoff)?], |row| {
                Ok((row.get(0)?, row.get(1)?, row.get(2)?))
            })?
            .collect::<Result<_, _>>()?;

        rows.into_iter()
            .map(|(pilot, category, expiry)| {
                Ok(CertificationDue::new(
                    PilotId::new(&pilot),
                    CertCategory::parse(&category),
                    parse_date(&expiry)?,
                ))
            })
            .collect()
    }

    // --- roster capacity --------------------------------------------------

    /// Sets the renewal capacity for a period/category pair, replacing
    /// any existing value.
    ///
    /// # Errors
    ///
    /// Returns an error if the write fails.
    pub fn set_capacity(
        &mut self,
        period_code: &str,
        category: &CertCategory,
        max_count: u32,
    ) -> Result<(), PersistenceError> {
        self.conn.execute(
            "INSERT INTO roster_capacity (roster_period, category, max_count)
             VALUES (?1, ?2, ?3)
             ON CONFLICT (roster_period, category) DO UPDATE SET max_count = excluded.max_count",
            params![period_code, category.as_str(), max_count],
        )?;
        debug!(period = period_code, category = %category, max_count, "Set capacity");
        Ok(())
    }

    /// Returns the per-category capacity map for a period.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub fn capacity_for_period(
        &self,
        period_code: &str,
    ) -> Result<HashMap<CertCategory, u32>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT category, max_count FROM roster_capacity WHERE roster_period = ?1",
        )?;
        let rows: Vec<(String, i64)> = stmt
            .query_map(params![period_code], |row| Ok((row.get(0)?, row.get(1)?)))?
            .collect::<Result<_, _>>()?;

        let mut capacity: HashMap<CertCategory, u32> = HashMap::new();
        for (category, max_count) in rows {
            let max_count: u32 = u32::try_from(max_count).map_err(|_| {
                PersistenceError::CorruptRecord(format!("capacity {max_count} out of range"))
            })?;
            capacity.insert(CertCategory::parse(&category), max_count);
        }
        Ok(capacity)
    }

    /// Returns every configured period/category capacity as a prefetched
    /// directory for one planning run.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub fn capacity_directory(&self) -> Result<CapacityDirectory, PersistenceError> {
        let mut stmt = self
            .conn
            .prepare("SELECT roster_period, category, max_count FROM roster_capacity")?;
        let rows: Vec<(String, String, i64)> = stmt
            .query_map([], |row| Ok((row.get(0)?, row.get(1)?, row.get(2)?)))?
            .collect::<Result<_, _>>()?;

        let mut directory: CapacityDirectory = CapacityDirectory::new();
        for (period, category, max_count) in rows {
            let max_count: u32 = u32::try_from(max_count).map_err(|_| {
                PersistenceError::CorruptRecord(format!("capacity {max_count} out of range"))
            })?;
            directory.set(&period, CertCategory::parse(&category), max_count);
        }
        Ok(directory)
    }

    // --- renewal plans ----------------------------------------------------

    /// Bulk-inserts a planning run's entries in a single transaction.
    ///
    /// The write is atomic: if any row is rejected (including by the
    /// unique pilot/category/expiry index), the transaction rolls back
    /// and nothing from the batch is committed.
    ///
    /// # Returns
    ///
    /// The number of entries written.
    ///
    /// # Errors
    ///
    /// Returns `BulkWriteRejected` carrying the attempted batch size if
    /// any part of the write fails.
    pub fn bulk_insert_plans(
        &mut self,
        entries: &[RenewalPlanEntry],
    ) -> Result<usize, PersistenceError> {
        let attempted: usize = entries.len();
        let tx: Transaction<'_> = self.conn.transaction()?;

        let result: Result<(), PersistenceError> = insert_plan_rows(&tx, entries);
        match result {
            Ok(()) => {
                tx.commit()
                    .map_err(|err| PersistenceError::BulkWriteRejected {
                        attempted,
                        message: err.to_string(),
                    })?;
                info!(count = attempted, "Bulk-inserted plan entries");
                Ok(attempted)
            }
            Err(err) => {
                // Dropping the transaction rolls it back.
                drop(tx);
                Err(PersistenceError::BulkWriteRejected {
                    attempted,
                    message: err.to_string(),
                })
            }
        }
    }

    /// Deletes every plan entry.
    ///
    /// # Returns
    ///
    /// The number of deleted entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the delete fails.
    pub fn clear_all_plans(&mut self) -> Result<usize, PersistenceError> {
        let deleted: usize = self.conn.execute("DELETE FROM renewal_plans", [])?;
        info!(deleted, "Cleared all plan entries");
        Ok(deleted)
    }

    /// Returns all plan entries for a roster period, ordered by planned
    /// date then pilot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub fn plans_for_period(
        &self,
        period_code: &str,
    ) -> Result<Vec<RenewalPlanEntry>, PersistenceError> {
        self.query_plans(
            "SELECT pilot_id, category, expiry_date, planned_date, roster_period,
                    window_start, window_end, status, priority
             FROM renewal_plans WHERE roster_period = ?1
             ORDER BY planned_date, pilot_id",
            params![period_code],
        )
    }

    /// Returns all plan entries for a pilot, ordered by planned date.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub fn plans_for_pilot(
        &self,
        pilot: &PilotId,
    ) -> Result<Vec<RenewalPlanEntry>, PersistenceError> {
        self.query_plans(
            "SELECT pilot_id, category, expiry_date, planned_date, roster_period,
                    window_start, window_end, status, priority
             FROM renewal_plans WHERE pilot_id = ?1
             ORDER BY planned_date, category",
            params![pilot.value()],
        )
    }

    /// Returns every plan entry, ordered by planned date then pilot.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub fn all_plans(&self) -> Result<Vec<RenewalPlanEntry>, PersistenceError> {
        self.query_plans(
            "SELECT pilot_id, category, expiry_date, planned_date, roster_period,
                    window_start, window_end, status, priority
             FROM renewal_plans
             ORDER BY planned_date, pilot_id",
            params![],
        )
    }

    /// Returns the number of persisted plan entries.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails.
    pub fn plan_count(&self) -> Result<usize, PersistenceError> {
        let count: i64 =
            self.conn
                .query_row("SELECT COUNT(*) FROM renewal_plans", [], |row| row.get(0))?;
        Ok(usize::try_from(count).unwrap_or(0))
    }

    fn query_plans(
        &self,
        sql: &str,
        params: impl rusqlite::Params,
    ) -> Result<Vec<RenewalPlanEntry>, PersistenceError> {
        let mut stmt = self.conn.prepare(sql)?;
        let rows: Vec<PlanRow> = stmt
            .query_map(params, |row| {
                Ok(PlanRow {
                    pilot_id: row.get(0)?,
                    category: row.get(1)?,
                    expiry_date: row.get(2)?,
                    planned_date: row.get(3)?,
                    roster_period: row.get(4)?,
                    window_start: row.get(5)?,
                    window_end: row.get(6)?,
                    status: row.get(7)?,
                    priority: row.get(8)?,
                })
            })?
            .collect::<Result<_, _>>()?;

        rows.into_iter().map(PlanRow::into_entry).collect()
    }

    // --- audit events -----------------------------------------------------

    /// Persists an audit event and returns its assigned id.
    ///
    /// # Errors
    ///
    /// Returns an error if serialization or the insert fails.
    pub fn persist_audit_event(&mut self, event: &AuditEvent) -> Result<i64, PersistenceError> {
        let before: String = serde_json::to_string(&SnapshotData::from(&event.before))?;
        let after: String = serde_json::to_string(&SnapshotData::from(&event.after))?;

        self.conn.execute(
            "INSERT INTO audit_events (actor_id, actor_type, cause_id, cause_description,
                                       action_name, action_details, before_snapshot, after_snapshot)
             VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8)",
            params![
                event.actor.id,
                event.actor.actor_type,
                event.cause.id,
                event.cause.description,
                event.action.name,
                event.action.details,
                before,
                after,
            ],
        )?;
        let event_id: i64 = self.conn.last_insert_rowid();
        info!(event_id, action = %event.action.name, "Persisted audit event");
        Ok(event_id)
    }

    /// Returns the full audit timeline in insertion order.
    ///
    /// # Errors
    ///
    /// Returns an error if the query fails or a row cannot be mapped.
    pub fn audit_timeline(&self) -> Result<Vec<AuditEvent>, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, actor_id, actor_type, cause_id, cause_description,
                    action_name, action_details, before_snapshot, after_snapshot
             FROM audit_events ORDER BY event_id",
        )?;
        let rows: Vec<AuditRow> = stmt
            .query_map([], map_audit_row)?
            .collect::<Result<_, _>>()?;

        rows.into_iter().map(AuditRow::into_event).collect()
    }

    /// Returns a single audit event by id.
    ///
    /// # Errors
    ///
    /// Returns `EventNotFound` if no such event exists.
    pub fn audit_event(&self, event_id: i64) -> Result<AuditEvent, PersistenceError> {
        let mut stmt = self.conn.prepare(
            "SELECT event_id, actor_id, actor_type, cause_id, cause_description,
                    action_name, action_details, before_snapshot, after_snapshot
             FROM audit_events WHERE event_id = ?1",
        )?;
        let mut rows: Vec<AuditRow> = stmt
            .query_map(params![event_id], map_audit_row)?
            .collect::<Result<_, _>>()?;

        match rows.pop() {
            Some(row) => row.into_event(),
            None => Err(PersistenceError::EventNotFound(event_id)),
        }
    }
}

/// Inserts every entry of a batch inside the supplied transaction.
fn insert_plan_rows(
    tx: &Transaction<'_>,
    entries: &[RenewalPlanEntry],
) -> Result<(), PersistenceError> {
    let mut stmt = tx.prepare(
        "INSERT INTO renewal_plans (pilot_id, category, expiry_date, planned_date,
                                    roster_period, window_start, window_end, status, priority)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
    )?;
    for entry in entries {
        stmt.execute(params![
            entry.pilot.value(),
            entry.category.as_str(),
            format_date(entry.expiry_date)?,
            format_date(entry.planned_date)?,
            entry.roster_period,
            format_date(entry.window_start)?,
            format_date(entry.window_end)?,
            entry.status.as_str(),
            entry.priority,
        ])?;
    }
    Ok(())
}

/// Raw column values of one `audit_events` row.
struct AuditRow {
    event_id: i64,
    actor_id: String,
    actor_type: String,
    cause_id: String,
    cause_description: String,
    action_name: String,
    action_details: Option<String>,
    before_snapshot: String,
    after_snapshot: String,
}

fn map_audit_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<AuditRow> {
    Ok(AuditRow {
        event_id: row.get(0)?,
        actor_id: row.get(1)?,
        actor_type: row.get(2)?,
        cause_id: row.get(3)?,
        cause_description: row.get(4)?,
        action_name: row.get(5)?,
        action_details: row.get(6)?,
        before_snapshot: row.get(7)?,
        after_snapshot: row.get(8)?,
    })
}

impl AuditRow {
    fn into_event(self) -> Result<AuditEvent, PersistenceError> {
        let before: SnapshotData = serde_json::from_str(&self.before_snapshot)?;
        let after: SnapshotData = serde_json::from_str(&self.after_snapshot)?;
        Ok(AuditEvent::new(
            Actor::new(self.actor_id, self.actor_type),
            Cause::new(self.cause_id, self.cause_description),
            Action::new(self.action_name, self.action_details),
            PlanSnapshot::from(before),
            PlanSnapshot::from(after),
        )
        .with_event_id(self.event_id))
    }
}
