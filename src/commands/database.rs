// ABOUTME: Database commands against a configured profile
// ABOUTME: Dispatches to the SQLite or SQL Server helpers based on the profile type

use std::collections::BTreeMap;

use crate::config::{ConnectionProfile, DatabaseType};
use crate::db::{SqlServerDatabase, SqliteDatabase};
use crate::models::SqlValue;
use crate::ApiResponse;

enum Target {
    Sqlite(SqliteDatabase),
    SqlServer(SqlServerDatabase),
}

impl Target {
    fn from_profile(profile: &ConnectionProfile) -> Result<Self, String> {
        match profile.db_type {
            DatabaseType::Sqlite => {
                let path = profile
                    .path
                    .as_deref()
                    .ok_or_else(|| format!("Profile '{}' has no SQLite path", profile.name))?;
                Ok(Target::Sqlite(SqliteDatabase::new(path)))
            }
            DatabaseType::SqlServer => SqlServerDatabase::from_profile(profile)
                .map(Target::SqlServer)
                .map_err(|e| e.to_string()),
        }
    }
}

/// Command-line parameter: JSON literal if it parses (`5`, `1.5`, `true`,
/// `null`, `"text"`), otherwise the raw text
pub fn parse_param(raw: &str) -> SqlValue {
    serde_json::from_str::<SqlValue>(raw).unwrap_or_else(|_| SqlValue::Text(raw.to_string()))
}

macro_rules! target_or_return {
    ($profile:expr) => {
        match Target::from_profile($profile) {
            Ok(t) => t,
            Err(e) => return ApiResponse::error(format!("Invalid profile: {}", e)),
        }
    };
}

/// Run a query and return its rows as column -> value records
pub async fn query(
    profile: &ConnectionProfile,
    sql: &str,
) -> ApiResponse<Vec<BTreeMap<String, SqlValue>>> {
    let result = match target_or_return!(profile) {
        Target::Sqlite(db) => db.query_database(sql).map_err(|e| e.to_string()),
        Target::SqlServer(db) => db.query_database(sql).await.map_err(|e| e.to_string()),
    };

    match result {
        Ok(rows) => {
            let count = rows.len();
            ApiResponse::success(rows.to_records()).with_info(format!("{} row(s)", count))
        }
        Err(e) => ApiResponse::error(format!("Failed to execute query: {}", e)),
    }
}

/// Execute a statement and return the affected row count
pub async fn execute(
    profile: &ConnectionProfile,
    sql: &str,
    params: &[SqlValue],
) -> ApiResponse<u64> {
    let result = match target_or_return!(profile) {
        Target::Sqlite(db) => db
            .execute_non_query(sql, params)
            .map(|n| n as u64)
            .map_err(|e| e.to_string()),
        Target::SqlServer(db) => db
            .execute_non_query(sql, params)
            .await
            .map_err(|e| e.to_string()),
    };
    ApiResponse::from_result(result, "Failed to execute statement")
}

pub async fn scalar(
    profile: &ConnectionProfile,
    sql: &str,
    params: &[SqlValue],
) -> ApiResponse<Option<SqlValue>> {
    let result = match target_or_return!(profile) {
        Target::Sqlite(db) => db.execute_scalar(sql, params).map_err(|e| e.to_string()),
        Target::SqlServer(db) => db
            .execute_scalar(sql, params)
            .await
            .map_err(|e| e.to_string()),
    };
    ApiResponse::from_result(result, "Failed to execute scalar")
}

pub async fn tables(profile: &ConnectionProfile) -> ApiResponse<Vec<String>> {
    let result = match target_or_return!(profile) {
        Target::Sqlite(db) => db.table_names().map_err(|e| e.to_string()),
        Target::SqlServer(db) => db.table_names().await.map_err(|e| e.to_string()),
    };
    ApiResponse::from_result(result, "Failed to list tables")
}

pub async fn table_exists(profile: &ConnectionProfile, table: &str) -> ApiResponse<bool> {
    let result = match target_or_return!(profile) {
        Target::Sqlite(db) => db.table_exists(table).map_err(|e| e.to_string()),
        Target::SqlServer(db) => db.table_exists(table).await.map_err(|e| e.to_string()),
    };
    ApiResponse::from_result(result, "Failed to check table")
}

pub async fn row_count(profile: &ConnectionProfile, table_or_query: &str) -> ApiResponse<i64> {
    let result = match target_or_return!(profile) {
        Target::Sqlite(db) => db.row_count(table_or_query).map_err(|e| e.to_string()),
        Target::SqlServer(db) => db
            .row_count(table_or_query)
            .await
            .map_err(|e| e.to_string()),
    };
    ApiResponse::from_result(result, "Failed to count rows")
}
