// Copyright (C) 2026 Fred Clausen
// Use of this source code is governed by an MIT-style
// license that can be found in the LICENSE file or at
// https://opensource.org/licenses/MIT.

/// Errors that can occur during persistence operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PersistenceError {
    /// A database error occurred.
    DatabaseError(String),
    /// Database connection failed.
    DatabaseConnectionFailed(String),
    /// Schema initialization failed.
    InitializationError(String),
    /// Query execution failed.
    QueryFailed(String),
    /// A bulk plan write was rejected; nothing from the batch was
    /// committed.
    BulkWriteRejected {
        /// Number of entries in the rejected batch.
        attempted: usize,
        /// The underlying database error.
        message: String,
    },
    /// The requested audit event was not found.
    EventNotFound(i64),
    /// Serialization/deserialization error.
    SerializationError(String),
    /// A stored value could not be mapped back to a domain type.
    CorruptRecord(String),
    /// The requested resource was not found.
    NotFound(String),
}

impl std::fmt::Display for PersistenceError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::DatabaseError(msg) => write!(f, "Database error: {msg}"),
            Self::DatabaseConnectionFailed(msg) => {
                write!(f, "Database connection failed: {msg}")
            }
            Self::InitializationError(msg) => write!(f, "Initialization error: {msg}"),
            Self::QueryFailed(msg) => write!(f, "Query failed: {msg}"),
            Self::BulkWriteRejected { attempted, message } => {
                write!(
                    f,
                    "Bulk plan write rejected ({attempted} entries, nothing committed): {message}"
                )
            }
            Self::EventNotFound(id) => write!(f, "Audit event not found: {id}"),
            Self::SerializationError(msg) => write!(f, "Serialization error: {msg}"),
            Self::CorruptRecord(msg) => write!(f, "Corrupt record: {msg}"),
            Self::NotFound(msg) => write!(f, "Not found: {msg}"),
        }
    }
}

impl std::error::Error for PersistenceError {}

impl From<rusqlite::Error> for PersistenceError {
    fn from(err: rusqlite::Error) -> Self {
        match err {
            rusqlite::Error::QueryReturnedNoRows => {
                Self::NotFound(String::from("Record not found"))
            }
            _ => Self::DatabaseError(err.to_string()),
        }
    }
}

impl From<serde_json::Error> for PersistenceError {
    fn from(err: serde_json::Error) -> Self {
        Self::SerializationError(err.to_string())
    }
}
