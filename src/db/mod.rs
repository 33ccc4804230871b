// ABOUTME: Database module exports for the automation helpers
// ABOUTME: Same query helpers against SQLite files and SQL Server connection strings

pub mod sqlite;
pub mod sqlserver;

pub use sqlite::SqliteDatabase;
pub use sqlserver::SqlServerDatabase;

/// Build a row-count query for a table name or a SELECT statement
pub fn count_query(table_or_query: &str) -> String {
    let trimmed = table_or_query.trim();
    if trimmed.to_uppercase().starts_with("SELECT") {
        format!("SELECT COUNT(1) FROM ({}) AS subquery", trimmed)
    } else {
        format!("SELECT COUNT(1) FROM {}", trimmed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_query_for_table() {
        assert_eq!(count_query("users"), "SELECT COUNT(1) FROM users");
    }

    #[test]
    fn test_count_query_wraps_select() {
        assert_eq!(
            count_query("  select id from users where active = 1 "),
            "SELECT COUNT(1) FROM (select id from users where active = 1) AS subquery"
        );
    }
}
