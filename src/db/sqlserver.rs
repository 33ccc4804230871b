// ABOUTME: SQL Server query helpers using tiberius
// ABOUTME: Connects per call from an ADO.NET connection string or a config profile

use std::borrow::Cow;

use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use thiserror::Error;
use tiberius::{AuthMethod, Client, ColumnData, Config, FromSql, Row, ToSql};
use tokio::net::TcpStream;
use tokio_util::compat::{Compat, TokioAsyncWriteCompatExt};

use crate::config::ConnectionProfile;
use crate::db::count_query;
use crate::models::{QueryResult, SqlValue};

#[derive(Error, Debug)]
pub enum SqlServerError {
    #[error("Connection failed: {0}")]
    ConnectionFailed(String),
    #[error("Invalid connection string: {0}")]
    InvalidConnectionString(String),
    #[error("Tiberius error: {0}")]
    Tiberius(#[from] tiberius::error::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Unexpected value for row count: {0:?}")]
    InvalidCount(Option<SqlValue>),
}

impl ToSql for SqlValue {
    fn to_sql(&self) -> ColumnData<'_> {
        match self {
            SqlValue::Null => ColumnData::String(None),
            SqlValue::Bool(b) => ColumnData::Bit(Some(*b)),
            SqlValue::Int(v) => ColumnData::I64(Some(*v)),
            SqlValue::Float(f) => ColumnData::F64(Some(*f)),
            SqlValue::Text(s) => ColumnData::String(Some(Cow::Borrowed(s.as_str()))),
            SqlValue::Bytes(b) => ColumnData::Binary(Some(Cow::Borrowed(b.as_slice()))),
        }
    }
}

/// Convert a TDS cell into an engine-neutral value. Date and time types
/// become ISO-8601 text.
pub fn column_value(data: &ColumnData<'static>) -> SqlValue {
    match data {
        ColumnData::U8(v) => SqlValue::from(v.map(i64::from)),
        ColumnData::I16(v) => SqlValue::from(v.map(i64::from)),
        ColumnData::I32(v) => SqlValue::from(v.map(i64::from)),
        ColumnData::I64(v) => SqlValue::from(*v),
        ColumnData::F32(v) => SqlValue::from(v.map(f64::from)),
        ColumnData::F64(v) => SqlValue::from(*v),
        ColumnData::Bit(v) => SqlValue::from(*v),
        ColumnData::String(v) => SqlValue::from(v.as_ref().map(|s| s.to_string())),
        ColumnData::Guid(v) => SqlValue::from(v.map(|g| g.to_string())),
        ColumnData::Binary(v) => SqlValue::from(v.as_ref().map(|b| b.to_vec())),
        ColumnData::Numeric(v) => SqlValue::from(
            v.map(|n| n.value() as f64 / 10f64.powi(i32::from(n.scale()))),
        ),
        ColumnData::Xml(v) => {
            SqlValue::from(v.as_ref().map(|x| x.clone().into_owned().into_string()))
        }
        other => temporal_value(other),
    }
}

fn temporal_value(data: &ColumnData<'static>) -> SqlValue {
    if let Ok(Some(dt)) = NaiveDateTime::from_sql(data) {
        return SqlValue::Text(dt.format("%Y-%m-%dT%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(d)) = NaiveDate::from_sql(data) {
        return SqlValue::Text(d.format("%Y-%m-%d").to_string());
    }
    if let Ok(Some(t)) = NaiveTime::from_sql(data) {
        return SqlValue::Text(t.format("%H:%M:%S%.f").to_string());
    }
    if let Ok(Some(dt)) = chrono::DateTime::<chrono::FixedOffset>::from_sql(data) {
        return SqlValue::Text(dt.to_rfc3339());
    }
    SqlValue::Null
}

fn row_values(row: Row) -> Vec<SqlValue> {
    row.into_iter().map(|data| column_value(&data)).collect()
}

/// A SQL Server database reached through a tiberius `Config`
#[derive(Clone)]
pub struct SqlServerDatabase {
    config: Config,
}

impl SqlServerDatabase {
    /// Build from an ADO.NET style connection string
    /// (`server=tcp:host,1433;user=sa;password=...;TrustServerCertificate=true`)
    pub fn from_connection_string(connection_string: &str) -> Result<Self, SqlServerError> {
        let config = Config::from_ado_string(connection_string)
            .map_err(|e| SqlServerError::InvalidConnectionString(e.to_string()))?;
        Ok(Self { config })
    }

    /// Build from a connection profile; an explicit connection string wins
    pub fn from_profile(profile: &ConnectionProfile) -> Result<Self, SqlServerError> {
        if let Some(conn_str) = profile.connection_string.as_deref() {
            return Self::from_connection_string(conn_str);
        }

        let mut config = Config::new();
        config.host(&profile.host);
        config.port(profile.port);
        config.authentication(AuthMethod::sql_server(&profile.username, &profile.password));

        if let Some(database) = profile.database.as_deref() {
            config.database(database);
        }

        if profile.trust_certificate {
            config.trust_cert();
        }

        Ok(Self { config })
    }

    /// Address the client connects to, `host:port`
    pub fn addr(&self) -> String {
        self.config.get_addr()
    }

    async fn connect(&self) -> Result<Client<Compat<TcpStream>>, SqlServerError> {
        let tcp = TcpStream::connect(self.config.get_addr())
            .await
            .map_err(|e| SqlServerError::ConnectionFailed(e.to_string()))?;

        tcp.set_nodelay(true)?;

        Client::connect(self.config.clone(), tcp.compat_write())
            .await
            .map_err(|e| SqlServerError::ConnectionFailed(e.to_string()))
    }

    /// Run a query and return every row of the first result set
    pub async fn query_database(&self, query: &str) -> Result<QueryResult, SqlServerError> {
        log::debug!("sqlserver query on {}: {}", self.addr(), query);
        let mut client = self.connect().await?;

        let result = async {
            let mut stream = client.simple_query(query).await?;
            let columns: Vec<String> = stream
                .columns()
                .await?
                .map(|cols| cols.iter().map(|c| c.name().to_string()).collect())
                .unwrap_or_default();
            let rows = stream.into_first_result().await?;
            Ok::<_, tiberius::error::Error>(QueryResult {
                columns,
                rows: rows.into_iter().map(row_values).collect(),
            })
        }
        .await;

        result.map_err(|e| {
            log::error!("Error executing query: {}", e);
            e.into()
        })
    }

    /// Execute an INSERT, UPDATE or DELETE and return the number of affected rows
    pub async fn execute_non_query(
        &self,
        statement: &str,
        params: &[SqlValue],
    ) -> Result<u64, SqlServerError> {
        log::debug!("sqlserver execute on {}: {}", self.addr(), statement);
        let mut client = self.connect().await?;
        let params = as_params(params);

        match client.execute(statement, &params).await {
            Ok(result) => Ok(result.total()),
            Err(e) => {
                log::error!("Error executing non-query: {}", e);
                Err(e.into())
            }
        }
    }

    /// First column of the first row, or `None` when the query returns no rows
    pub async fn execute_scalar(
        &self,
        query: &str,
        params: &[SqlValue],
    ) -> Result<Option<SqlValue>, SqlServerError> {
        log::debug!("sqlserver scalar on {}: {}", self.addr(), query);
        let mut client = self.connect().await?;
        let params = as_params(params);

        let result = async {
            let row = client.query(query, &params).await?.into_row().await?;
            Ok::<_, tiberius::error::Error>(
                row.and_then(|r| r.into_iter().next()).map(|data| column_value(&data)),
            )
        }
        .await;

        result.map_err(|e| {
            log::error!("Error executing scalar: {}", e);
            e.into()
        })
    }

    /// Names of all base tables visible to the login
    pub async fn table_names(&self) -> Result<Vec<String>, SqlServerError> {
        let result = self
            .query_database(
                "SELECT TABLE_NAME FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_TYPE = 'BASE TABLE' ORDER BY TABLE_NAME",
            )
            .await?;

        Ok(result
            .rows
            .into_iter()
            .filter_map(|row| match row.into_iter().next() {
                Some(SqlValue::Text(name)) => Some(name),
                _ => None,
            })
            .collect())
    }

    pub async fn table_exists(&self, table_name: &str) -> Result<bool, SqlServerError> {
        let found = self
            .execute_scalar(
                "SELECT 1 FROM INFORMATION_SCHEMA.TABLES WHERE TABLE_NAME = @P1 AND TABLE_TYPE = 'BASE TABLE'",
                &[SqlValue::from(table_name)],
            )
            .await?;
        Ok(found.is_some())
    }

    /// Row count of a table, or of the rows a SELECT statement returns
    pub async fn row_count(&self, table_or_query: &str) -> Result<i64, SqlServerError> {
        let result = self.execute_scalar(&count_query(table_or_query), &[]).await?;
        match result.as_ref().and_then(SqlValue::as_i64) {
            Some(count) => Ok(count),
            None => Err(SqlServerError::InvalidCount(result)),
        }
    }
}

fn as_params(params: &[SqlValue]) -> Vec<&dyn ToSql> {
    params.iter().map(|p| p as &dyn ToSql).collect()
}
