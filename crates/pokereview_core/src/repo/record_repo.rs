//! Generic record repository shared by all six catalog entities.
//!
//! # Responsibility
//! - Implement list/get/exists/create/update/delete once for every
//!   [`Record`] type instead of once per entity.
//! - Enforce natural-key uniqueness and foreign-key presence before writes.
//! - Translate SQLite constraint failures into semantic [`RepoError`]s.
//!
//! # Invariants
//! - Write paths call `validate()` before any SQL mutation.
//! - Every entity table has a unique `name_key` column holding
//!   `normalize_key(natural_key)`.
//! - `list` order is id ascending, which is insertion order for store-assigned
//!   ids.

use crate::db::migrations::latest_version;
use crate::db::DbError;
use crate::model::{normalize_key, ModelValidationError, RecordId, UNASSIGNED_ID};
use log::debug;
use rusqlite::types::Value;
use rusqlite::{ffi, params_from_iter, Connection, Params, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};
use std::marker::PhantomData;

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for catalog persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    /// Record failed model validation; nothing was written.
    Validation(ModelValidationError),
    /// Underlying SQLite failure.
    Db(DbError),
    /// Target record, or a record it references, does not exist.
    NotFound { entity: &'static str, id: RecordId },
    /// Natural key already taken by another live record.
    Duplicate { entity: &'static str, key: String },
    /// Mutation blocked by dependent records.
    Conflict {
        entity: &'static str,
        id: RecordId,
        reason: String,
    },
    /// Connection schema is not at the version this binary expects.
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    /// Persisted row cannot be converted into a valid record.
    InvalidData(String),
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound { entity, id } => write!(f, "{entity} not found: {id}"),
            Self::Duplicate { entity, key } => write!(f, "{entity} already exists: `{key}`"),
            Self::Conflict { entity, id, reason } => {
                write!(f, "{entity} {id} cannot be changed: {reason}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "catalog repository requires schema version {expected_version}, got {actual_version}"
            ),
            Self::InvalidData(message) => write!(f, "invalid persisted catalog data: {message}"),
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<ModelValidationError> for RepoError {
    fn from(value: ModelValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Outgoing reference from one record to another.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ForeignKey {
    /// Column on the referencing table.
    pub column: &'static str,
    /// Entity label of the referenced record, used in not-found errors.
    pub entity: &'static str,
    /// Table holding the referenced record.
    pub table: &'static str,
    pub id: RecordId,
}

/// Mapping between a catalog record and its table.
///
/// Implemented next to each entity's repository so SQL naming stays inside the
/// persistence boundary.
pub trait Record: Clone + Sized {
    /// Human-readable entity label (`"category"`, `"review"`, ...).
    const ENTITY: &'static str;
    const TABLE: &'static str;
    /// Data columns, excluding `id` and `name_key`, in `column_values` order.
    const COLUMNS: &'static [&'static str];
    /// Columns that `update` never rewrites.
    const IMMUTABLE_COLUMNS: &'static [&'static str] = &[];

    fn id(&self) -> RecordId;
    fn set_id(&mut self, id: RecordId);
    /// Raw natural key; normalized by the repository.
    fn natural_key(&self) -> &str;
    fn validate(&self) -> Result<(), ModelValidationError>;
    fn column_values(&self) -> Vec<Value>;
    fn foreign_keys(&self) -> Vec<ForeignKey> {
        Vec::new()
    }
    fn from_row(row: &Row<'_>) -> RepoResult<Self>;
}

/// Capability contract every entity repository provides.
pub trait Repository<E: Record> {
    /// All live records in insertion order.
    fn list(&self) -> RepoResult<Vec<E>>;
    fn get(&self, id: RecordId) -> RepoResult<Option<E>>;
    fn exists(&self, id: RecordId) -> RepoResult<bool>;
    /// Looks up a record by normalized natural key.
    fn find_by_key(&self, key: &str) -> RepoResult<Option<E>>;
    fn count(&self) -> RepoResult<u64>;
    /// Inserts a record and returns it with its stored id.
    fn create(&self, record: &E) -> RepoResult<E>;
    /// Fully replaces the record with the same id and returns the stored row.
    fn update(&self, record: &E) -> RepoResult<E>;
    fn delete(&self, record: &E) -> RepoResult<()>;
    /// Deletes all given records in one statement; returns rows removed.
    fn delete_many(&self, records: &[E]) -> RepoResult<usize>;
}

/// SQLite-backed repository for one record type.
pub struct SqliteRepository<'conn, E> {
    conn: &'conn Connection,
    _record: PhantomData<fn() -> E>,
}

impl<'conn, E: Record> SqliteRepository<'conn, E> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - [`RepoError::UninitializedConnection`] when migrations have not run.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self::attach(conn))
    }

    /// Binds to a connection already known to be migrated, such as an open
    /// transaction.
    pub(crate) fn attach(conn: &'conn Connection) -> Self {
        Self {
            conn,
            _record: PhantomData,
        }
    }

    pub(crate) fn conn(&self) -> &'conn Connection {
        self.conn
    }

    fn ensure_references(&self, record: &E, updating: bool) -> RepoResult<()> {
        for key in record.foreign_keys() {
            if updating && E::IMMUTABLE_COLUMNS.contains(&key.column) {
                continue;
            }
            if !row_exists(self.conn, key.table, key.id)? {
                return Err(RepoError::NotFound {
                    entity: key.entity,
                    id: key.id,
                });
            }
        }
        Ok(())
    }

    fn duplicate(record: &E) -> RepoError {
        RepoError::Duplicate {
            entity: E::ENTITY,
            key: record.natural_key().trim_end().to_string(),
        }
    }

    fn map_write_error(err: rusqlite::Error, record: &E, fk_reason: &str) -> RepoError {
        if let rusqlite::Error::SqliteFailure(failure, _) = &err {
            match failure.extended_code {
                ffi::SQLITE_CONSTRAINT_UNIQUE | ffi::SQLITE_CONSTRAINT_PRIMARYKEY => {
                    return Self::duplicate(record);
                }
                ffi::SQLITE_CONSTRAINT_FOREIGNKEY => {
                    return RepoError::Conflict {
                        entity: E::ENTITY,
                        id: record.id(),
                        reason: fk_reason.to_string(),
                    };
                }
                _ => {}
            }
        }
        err.into()
    }
}

impl<E: Record> Repository<E> for SqliteRepository<'_, E> {
    fn list(&self) -> RepoResult<Vec<E>> {
        select_records(self.conn, "ORDER BY r.id ASC", [])
    }

    fn get(&self, id: RecordId) -> RepoResult<Option<E>> {
        select_record(self.conn, "WHERE r.id = ?1", [id])
    }

    fn exists(&self, id: RecordId) -> RepoResult<bool> {
        row_exists(self.conn, E::TABLE, id)
    }

    fn find_by_key(&self, key: &str) -> RepoResult<Option<E>> {
        select_record(self.conn, "WHERE r.name_key = ?1", [normalize_key(key)])
    }

    fn count(&self) -> RepoResult<u64> {
        let count: i64 = self.conn.query_row(
            &format!("SELECT COUNT(*) FROM {};", E::TABLE),
            [],
            |row| row.get(0),
        )?;
        Ok(u64::try_from(count).unwrap_or_default())
    }

    fn create(&self, record: &E) -> RepoResult<E> {
        record.validate()?;
        self.ensure_references(record, false)?;

        let key = normalize_key(record.natural_key());
        if self.find_by_key(&key)?.is_some() {
            return Err(Self::duplicate(record));
        }

        let mut columns = Vec::with_capacity(E::COLUMNS.len() + 2);
        let mut values = Vec::with_capacity(E::COLUMNS.len() + 2);
        if record.id() != UNASSIGNED_ID {
            columns.push("id");
            values.push(Value::Integer(record.id()));
        }
        columns.extend_from_slice(E::COLUMNS);
        values.extend(record.column_values());
        columns.push("name_key");
        values.push(Value::Text(key));

        let sql = format!(
            "INSERT INTO {} ({}) VALUES ({});",
            E::TABLE,
            columns.join(", "),
            placeholders(1, columns.len())
        );
        self.conn
            .execute(&sql, params_from_iter(values))
            .map_err(|err| Self::map_write_error(err, record, "references a missing record"))?;

        let mut stored = record.clone();
        stored.set_id(self.conn.last_insert_rowid());
        debug!(
            "event=record_create module=repo status=ok entity={} id={}",
            E::ENTITY,
            stored.id()
        );
        Ok(stored)
    }

    fn update(&self, record: &E) -> RepoResult<E> {
        record.validate()?;
        let id = record.id();
        if !self.exists(id)? {
            return Err(RepoError::NotFound {
                entity: E::ENTITY,
                id,
            });
        }
        self.ensure_references(record, true)?;

        let key = normalize_key(record.natural_key());
        if let Some(existing) = self.find_by_key(&key)? {
            if existing.id() != id {
                return Err(Self::duplicate(record));
            }
        }

        let mut assignments = Vec::with_capacity(E::COLUMNS.len() + 1);
        let mut values = Vec::with_capacity(E::COLUMNS.len() + 2);
        for (column, value) in E::COLUMNS.iter().zip(record.column_values()) {
            if E::IMMUTABLE_COLUMNS.contains(column) {
                continue;
            }
            values.push(value);
            assignments.push(format!("{column} = ?{}", values.len()));
        }
        values.push(Value::Text(key));
        assignments.push(format!("name_key = ?{}", values.len()));
        values.push(Value::Integer(id));

        let sql = format!(
            "UPDATE {} SET {} WHERE id = ?{};",
            E::TABLE,
            assignments.join(", "),
            values.len()
        );
        let changed = self
            .conn
            .execute(&sql, params_from_iter(values))
            .map_err(|err| Self::map_write_error(err, record, "references a missing record"))?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: E::ENTITY,
                id,
            });
        }

        debug!(
            "event=record_update module=repo status=ok entity={} id={id}",
            E::ENTITY
        );
        self.get(id)?.ok_or(RepoError::NotFound {
            entity: E::ENTITY,
            id,
        })
    }

    fn delete(&self, record: &E) -> RepoResult<()> {
        let changed = self
            .conn
            .execute(
                &format!("DELETE FROM {} WHERE id = ?1;", E::TABLE),
                [record.id()],
            )
            .map_err(|err| {
                Self::map_write_error(err, record, "still referenced by dependent records")
            })?;
        if changed == 0 {
            return Err(RepoError::NotFound {
                entity: E::ENTITY,
                id: record.id(),
            });
        }

        debug!(
            "event=record_delete module=repo status=ok entity={} id={}",
            E::ENTITY,
            record.id()
        );
        Ok(())
    }

    fn delete_many(&self, records: &[E]) -> RepoResult<usize> {
        let Some(first) = records.first() else {
            return Ok(0);
        };

        let ids = records.iter().map(Record::id).collect::<Vec<_>>();
        let sql = format!(
            "DELETE FROM {} WHERE id IN ({});",
            E::TABLE,
            placeholders(1, ids.len())
        );
        let removed = self
            .conn
            .execute(&sql, params_from_iter(ids.iter()))
            .map_err(|err| {
                Self::map_write_error(err, first, "still referenced by dependent records")
            })?;

        debug!(
            "event=record_delete_many module=repo status=ok entity={} requested={} removed={removed}",
            E::ENTITY,
            ids.len()
        );
        Ok(removed)
    }
}

/// Runs `SELECT <record columns> FROM <table> r <clause>` and parses every row.
///
/// `clause` may join other tables; record columns are read through alias `r`.
pub(crate) fn select_records<E: Record, P: Params>(
    conn: &Connection,
    clause: &str,
    params: P,
) -> RepoResult<Vec<E>> {
    let mut stmt = conn.prepare(&format!("{} {clause};", select_sql::<E>()))?;
    let mut rows = stmt.query(params)?;
    let mut records = Vec::new();
    while let Some(row) = rows.next()? {
        records.push(E::from_row(row)?);
    }
    Ok(records)
}

/// Like [`select_records`] but returns only the first row.
pub(crate) fn select_record<E: Record, P: Params>(
    conn: &Connection,
    clause: &str,
    params: P,
) -> RepoResult<Option<E>> {
    let mut stmt = conn.prepare(&format!("{} {clause} LIMIT 1;", select_sql::<E>()))?;
    let mut rows = stmt.query(params)?;
    match rows.next()? {
        Some(row) => Ok(Some(E::from_row(row)?)),
        None => Ok(None),
    }
}

pub(crate) fn row_exists(conn: &Connection, table: &str, id: RecordId) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        &format!("SELECT EXISTS(SELECT 1 FROM {table} WHERE id = ?1);"),
        [id],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn select_sql<E: Record>() -> String {
    let columns = E::COLUMNS
        .iter()
        .map(|column| format!("r.{column} AS {column}"))
        .collect::<Vec<_>>()
        .join(", ");
    format!("SELECT r.id AS id, {columns} FROM {} r", E::TABLE)
}

fn placeholders(first: usize, count: usize) -> String {
    (first..first + count)
        .map(|index| format!("?{index}"))
        .collect::<Vec<_>>()
        .join(", ")
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version: u32 = conn.query_row("PRAGMA user_version;", [], |row| row.get(0))?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }
    Ok(())
}
