// ABOUTME: End-to-end use of the helpers the way a test script would chain them
// ABOUTME: Seeds a SQLite file from CSV, checks counts, and writes a timestamped report

use automation_kit::datetime::{format_datetime, DEFAULT_DATE_FORMAT};
use automation_kit::db::SqliteDatabase;
use automation_kit::directories::{create_directory, files_in_directory, join_paths};
use automation_kit::files::{load_csv, read_text_file_lines, write_text_file};
use automation_kit::models::SqlValue;
use automation_kit::strings::generate_random_string;
use automation_kit::{parse_duration, parse_millis, DurationError};
use std::time::Duration;
use tempfile::TempDir;

#[test]
fn csv_to_sqlite_to_report() {
    let dir = TempDir::new().unwrap();
    let data_dir = join_paths([dir.path().to_str().unwrap(), "data"]);
    create_directory(&data_dir).unwrap();

    let csv_path = data_dir.join("orders.csv");
    write_text_file(&csv_path, "id,total\n1,10.5\n2,3.25\n3,7\n").unwrap();
    let table = load_csv(&csv_path, true).unwrap();

    let db = SqliteDatabase::new(data_dir.join("orders.db"));
    db.execute_non_query("CREATE TABLE orders (id INTEGER, total REAL)", &[])
        .unwrap();
    for row in &table.rows {
        let params: Vec<SqlValue> = vec![
            SqlValue::Int(row[0].parse().unwrap()),
            SqlValue::Float(row[1].parse().unwrap()),
        ];
        db.execute_non_query("INSERT INTO orders VALUES (?, ?)", &params)
            .unwrap();
    }

    assert_eq!(db.row_count("orders").unwrap(), 3);
    assert_eq!(
        db.row_count("SELECT id FROM orders WHERE total > 5").unwrap(),
        2
    );
    let sum = db
        .execute_scalar("SELECT SUM(total) FROM orders", &[])
        .unwrap()
        .and_then(|v| v.as_f64())
        .unwrap();
    assert!((sum - 20.75).abs() < f64::EPSILON);

    let run_id = generate_random_string(8);
    let date = format_datetime(&chrono::Utc::now(), DEFAULT_DATE_FORMAT).unwrap();
    let report = data_dir.join(format!("report_{}_{}.txt", date, run_id));
    write_text_file(&report, &format!("rows=3\nsum={}\n", sum)).unwrap();

    assert_eq!(read_text_file_lines(&report).unwrap()[0], "rows=3");
    let reports = files_in_directory(&data_dir, "report_*.txt").unwrap();
    assert_eq!(reports, vec![report]);
}

#[test]
fn duration_properties() {
    assert_eq!(parse_millis(""), Ok(0));
    assert_eq!(parse_millis("30m"), Ok(1_800_000));
    assert_eq!(parse_millis("1h30m"), Ok(5_400_000));
    assert_eq!(parse_millis("2d5h10m"), Ok(191_400_000));
    assert_eq!(parse_millis("45s"), Ok(45_000));
    assert_eq!(parse_millis("2D"), parse_millis("2d"));
    assert_eq!(parse_millis("10x"), Err(DurationError::InvalidUnit('x')));
    assert_eq!(parse_duration("90s").unwrap(), Duration::from_secs(90));
}

#[test]
fn duration_is_order_insensitive() {
    let tokens = ["3d", "4h", "15m", "59s", "2h"];
    let expected: u64 = tokens.iter().map(|t| parse_millis(t).unwrap()).sum();

    // Every rotation of the token list sums to the same total
    for shift in 0..tokens.len() {
        let mut rotated = tokens.to_vec();
        rotated.rotate_left(shift);
        assert_eq!(parse_millis(&rotated.concat()), Ok(expected));
    }
}
