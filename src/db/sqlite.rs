// ABOUTME: SQLite query helpers using rusqlite
// ABOUTME: Each call opens the database file, runs one statement, and closes it

use rusqlite::types::{ToSqlOutput, Value, ValueRef};
use rusqlite::{params_from_iter, Connection, OpenFlags, ToSql};
use std::path::{Path, PathBuf};
use thiserror::Error;

use crate::db::count_query;
use crate::models::{QueryResult, SqlValue};

#[derive(Error, Debug)]
pub enum SqliteError {
    #[error("SQLite error: {0}")]
    Sqlite(#[from] rusqlite::Error),
    #[error("Database file not found: {0}")]
    NotFound(PathBuf),
    #[error("Unexpected value for row count: {0:?}")]
    InvalidCount(Option<SqlValue>),
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> rusqlite::Result<ToSqlOutput<'_>> {
        Ok(match self {
            SqlValue::Null => ToSqlOutput::Owned(Value::Null),
            SqlValue::Bool(b) => ToSqlOutput::Owned(Value::Integer(i64::from(*b))),
            SqlValue::Int(v) => ToSqlOutput::Owned(Value::Integer(*v)),
            SqlValue::Float(f) => ToSqlOutput::Owned(Value::Real(*f)),
            SqlValue::Text(s) => ToSqlOutput::Borrowed(ValueRef::Text(s.as_bytes())),
            SqlValue::Bytes(b) => ToSqlOutput::Borrowed(ValueRef::Blob(b)),
        })
    }
}

impl From<ValueRef<'_>> for SqlValue {
    fn from(value: ValueRef<'_>) -> Self {
        match value {
            ValueRef::Null => SqlValue::Null,
            ValueRef::Integer(v) => SqlValue::Int(v),
            ValueRef::Real(f) => SqlValue::Float(f),
            ValueRef::Text(t) => SqlValue::Text(String::from_utf8_lossy(t).into_owned()),
            ValueRef::Blob(b) => SqlValue::Bytes(b.to_vec()),
        }
    }
}

/// A SQLite database file
#[derive(Debug, Clone)]
pub struct SqliteDatabase {
    path: PathBuf,
}

impl SqliteDatabase {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Open a connection, creating the file if it does not exist yet
    fn open(&self) -> Result<Connection, SqliteError> {
        let flags = OpenFlags::SQLITE_OPEN_READ_WRITE
            | OpenFlags::SQLITE_OPEN_CREATE
            | OpenFlags::SQLITE_OPEN_URI
            | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        Connection::open_with_flags(&self.path, flags).map_err(|e| {
            log::error!("Error opening {}: {}", self.path.display(), e);
            e.into()
        })
    }

    /// Open without creating, so listing tables never leaves an empty file behind
    fn open_existing(&self) -> Result<Connection, SqliteError> {
        if !self.path.exists() {
            return Err(SqliteError::NotFound(self.path.clone()));
        }
        self.open()
    }

    /// Run a query and return every row
    pub fn query_database(&self, query: &str) -> Result<QueryResult, SqliteError> {
        log::debug!("sqlite query on {}: {}", self.path.display(), query);
        let conn = self.open()?;
        run_query(&conn, query).map_err(|e| {
            log::error!("Error executing query: {}", e);
            e.into()
        })
    }

    /// Execute an INSERT, UPDATE or DELETE and return the number of affected rows
    pub fn execute_non_query(
        &self,
        statement: &str,
        params: &[SqlValue],
    ) -> Result<usize, SqliteError> {
        log::debug!("sqlite execute on {}: {}", self.path.display(), statement);
        let conn = self.open()?;
        conn.execute(statement, params_from_iter(params.iter()))
            .map_err(|e| {
                log::error!("Error executing non-query: {}", e);
                e.into()
            })
    }

    /// First column of the first row, or `None` when the query returns no rows
    pub fn execute_scalar(
        &self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<Option<SqlValue>, SqliteError> {
        log::debug!("sqlite scalar on {}: {}", self.path.display(), query);
        let conn = self.open()?;
        match conn.query_row(query, params_from_iter(params.iter()), |row| {
            Ok(SqlValue::from(row.get_ref(0)?))
        }) {
            Ok(value) => Ok(Some(value)),
            Err(rusqlite::Error::QueryReturnedNoRows) => Ok(None),
            Err(e) => {
                log::error!("Error executing scalar: {}", e);
                Err(e.into())
            }
        }
    }

    /// Names of all tables in the database
    pub fn table_names(&self) -> Result<Vec<String>, SqliteError> {
        let conn = self.open_existing()?;
        let mut stmt =
            conn.prepare("SELECT name FROM sqlite_master WHERE type = 'table' ORDER BY name")?;
        let names = stmt
            .query_map([], |row| row.get::<_, String>(0))?
            .collect::<Result<Vec<_>, _>>()?;
        Ok(names)
    }

    pub fn table_exists(&self, table_name: &str) -> Result<bool, SqliteError> {
        Ok(self.table_names()?.iter().any(|name| name == table_name))
    }

    /// Row count of a table, or of the rows a SELECT statement returns
    pub fn row_count(&self, table_or_query: &str) -> Result<i64, SqliteError> {
        let result = self.execute_scalar(&count_query(table_or_query), &[])?;
        match result.as_ref().and_then(SqlValue::as_i64) {
            Some(count) => Ok(count),
            None => Err(SqliteError::InvalidCount(result)),
        }
    }
}

fn run_query(conn: &Connection, query: &str) -> Result<QueryResult, rusqlite::Error> {
    let mut stmt = conn.prepare(query)?;
    let columns: Vec<String> = stmt.column_names().into_iter().map(String::from).collect();
    let column_count = columns.len();

    let mut rows = stmt.query([])?;
    let mut result = QueryResult {
        columns,
        rows: Vec::new(),
    };
    while let Some(row) = rows.next()? {
        let values = (0..column_count)
            .map(|i| row.get_ref(i).map(SqlValue::from))
            .collect::<Result<Vec<_>, _>>()?;
        result.rows.push(values);
    }
    Ok(result)
}
