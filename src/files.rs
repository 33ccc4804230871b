// ABOUTME: Text file and CSV helpers for test automation
// ABOUTME: Read/write/append text, file metadata, and CSV loading

use serde::Serialize;
use std::collections::BTreeMap;
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FileError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
}

impl FileError {
    fn io(path: &Path, source: std::io::Error) -> Self {
        FileError::Io {
            path: path.to_path_buf(),
            source,
        }
    }
}

pub fn read_text_file(path: impl AsRef<Path>) -> Result<String, FileError> {
    let path = path.as_ref();
    fs::read_to_string(path).map_err(|e| FileError::io(path, e))
}

/// File contents split into lines, without line terminators
pub fn read_text_file_lines(path: impl AsRef<Path>) -> Result<Vec<String>, FileError> {
    Ok(read_text_file(path)?.lines().map(String::from).collect())
}

/// Write a text file, replacing any existing content
pub fn write_text_file(path: impl AsRef<Path>, content: &str) -> Result<(), FileError> {
    let path = path.as_ref();
    fs::write(path, content).map_err(|e| FileError::io(path, e))
}

/// Append to a text file, creating it if needed
pub fn append_to_text_file(path: impl AsRef<Path>, content: &str) -> Result<(), FileError> {
    let path = path.as_ref();
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|e| FileError::io(path, e))?;
    file.write_all(content.as_bytes())
        .map_err(|e| FileError::io(path, e))
}

/// True only for regular files
pub fn file_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_file()
}

/// Delete a file if it exists; returns whether something was deleted
pub fn delete_file(path: impl AsRef<Path>) -> Result<bool, FileError> {
    let path = path.as_ref();
    if !path.is_file() {
        return Ok(false);
    }
    fs::remove_file(path).map_err(|e| FileError::io(path, e))?;
    Ok(true)
}

/// Size in bytes
pub fn file_size(path: impl AsRef<Path>) -> Result<u64, FileError> {
    let path = path.as_ref();
    fs::metadata(path)
        .map(|m| m.len())
        .map_err(|e| FileError::io(path, e))
}

/// Extension without the dot; empty when there is none
pub fn file_extension(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_default()
}

pub fn file_name_without_extension(path: impl AsRef<Path>) -> String {
    path.as_ref()
        .file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// A CSV file loaded into memory; every cell stays a string
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct CsvTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
}

impl CsvTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn value(&self, row: usize, header: &str) -> Option<&str> {
        let idx = self.headers.iter().position(|h| h == header)?;
        self.rows.get(row)?.get(idx).map(String::as_str)
    }

    /// Rows as header -> value maps
    pub fn to_records(&self) -> Vec<BTreeMap<String, String>> {
        self.rows
            .iter()
            .map(|row| {
                self.headers
                    .iter()
                    .cloned()
                    .zip(row.iter().cloned())
                    .collect()
            })
            .collect()
    }
}

/// Load a CSV file. Without a header row the columns are named
/// `Column0`, `Column1`, ... after the width of the first record.
pub fn load_csv(path: impl AsRef<Path>, has_headers: bool) -> Result<CsvTable, FileError> {
    let path = path.as_ref();
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(has_headers)
        .from_path(path)?;
    let named: Option<Vec<String>> = if has_headers {
        Some(reader.headers()?.iter().map(String::from).collect())
    } else {
        None
    };
    let rows = reader
        .records()
        .map(|record| record.map(|r| r.iter().map(String::from).collect()))
        .collect::<Result<Vec<Vec<String>>, _>>()?;
    let headers = named.unwrap_or_else(|| {
        let width = rows.first().map_or(0, Vec::len);
        (0..width).map(|i| format!("Column{}", i)).collect()
    });
    Ok(CsvTable { headers, rows })
}
