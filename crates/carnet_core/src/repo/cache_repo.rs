//! Cache slot repository contract and SQLite implementation.
//!
//! # Responsibility
//! - Provide the single named slot holding the serialized trip document,
//!   the way browsers back `localStorage` with a key/value table.
//! - Keep SQL details inside the persistence boundary.
//!
//! # Invariants
//! - Construction validates the connection's schema instead of letting a
//!   missing table surface later as a mid-save failure.
//! - Writing an existing key overwrites its value in place.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use rusqlite::{params, Connection, OptionalExtension};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Slot key holding the serialized trip document.
pub const PLANNING_SLOT_KEY: &str = "planningData";

pub type CacheResult<T> = Result<T, CacheError>;

/// Cache persistence error.
#[derive(Debug)]
pub enum CacheError {
    Db(DbError),
    /// Connection has no applied migrations.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Connection is migrated but the slots table is absent.
    MissingSlotsTable,
}

impl Display for CacheError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Db(err) => write!(f, "{err}"),
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "cache connection not initialized: schema version {actual_version}, expected {expected_version}"
            ),
            Self::MissingSlotsTable => write!(f, "cache connection is missing the slots table"),
        }
    }
}

impl Error for CacheError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<DbError> for CacheError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for CacheError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for named cache slots.
pub trait CacheRepository {
    fn read_slot(&self, key: &str) -> CacheResult<Option<String>>;
    fn write_slot(&self, key: &str, value: &str) -> CacheResult<()>;
}

/// SQLite-backed cache slot repository.
pub struct SqliteCacheRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteCacheRepository<'conn> {
    /// Wraps a migrated connection, validating its schema first.
    pub fn try_new(conn: &'conn Connection) -> CacheResult<Self> {
        let actual_version =
            conn.query_row("PRAGMA user_version;", [], |row| row.get::<_, u32>(0))?;
        let expected_version = latest_version();
        if actual_version == 0 {
            return Err(CacheError::UninitializedConnection {
                expected_version,
                actual_version,
            });
        }

        let has_slots: Option<String> = conn
            .query_row(
                "SELECT name FROM sqlite_master WHERE type = 'table' AND name = 'slots';",
                [],
                |row| row.get(0),
            )
            .optional()?;
        if has_slots.is_none() {
            return Err(CacheError::MissingSlotsTable);
        }

        Ok(Self { conn })
    }
}

impl CacheRepository for SqliteCacheRepository<'_> {
    fn read_slot(&self, key: &str) -> CacheResult<Option<String>> {
        let value = self
            .conn
            .query_row("SELECT value FROM slots WHERE key = ?1;", [key], |row| {
                row.get(0)
            })
            .optional()?;
        Ok(value)
    }

    fn write_slot(&self, key: &str, value: &str) -> CacheResult<()> {
        self.conn.execute(
            "INSERT INTO slots (key, value)
             VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET
                value = excluded.value,
                updated_at = (strftime('%s', 'now') * 1000);",
            params![key, value],
        )?;
        Ok(())
    }
}
