// ABOUTME: File and directory commands
// ABOUTME: Thin wrappers over the file/directory helpers with display-friendly paths

use std::path::{Path, PathBuf};

use crate::directories;
use crate::files::{self, CsvTable};
use crate::ApiResponse;

fn display(path: &Path) -> String {
    path.to_string_lossy().into_owned()
}

pub fn read_file(path: &Path) -> ApiResponse<String> {
    ApiResponse::from_result(files::read_text_file(path), "Failed to read file")
}

pub fn read_lines(path: &Path) -> ApiResponse<Vec<String>> {
    ApiResponse::from_result(files::read_text_file_lines(path), "Failed to read file")
}

pub fn write_file(path: &Path, content: &str, append: bool) -> ApiResponse<()> {
    let result = if append {
        files::append_to_text_file(path, content)
    } else {
        files::write_text_file(path, content)
    };
    ApiResponse::from_result(result, "Failed to write file")
}

pub fn file_exists(path: &Path) -> ApiResponse<bool> {
    ApiResponse::success(files::file_exists(path))
}

pub fn file_size(path: &Path) -> ApiResponse<u64> {
    ApiResponse::from_result(files::file_size(path), "Failed to read file size")
}

pub fn delete_file(path: &Path) -> ApiResponse<bool> {
    match files::delete_file(path) {
        Ok(true) => ApiResponse::success(true),
        Ok(false) => ApiResponse::success(false)
            .with_info(format!("{} did not exist", display(path))),
        Err(e) => ApiResponse::error(format!("Failed to delete file: {}", e)),
    }
}

pub fn load_csv(path: &Path, has_headers: bool) -> ApiResponse<CsvTable> {
    ApiResponse::from_result(files::load_csv(path, has_headers), "Failed to load CSV")
}

pub fn list_files(dir: &Path, pattern: &str) -> ApiResponse<Vec<String>> {
    match directories::files_in_directory(dir, pattern) {
        Ok(paths) => ApiResponse::success(paths.iter().map(|p| display(p)).collect()),
        Err(e) => ApiResponse::error(format!("Failed to list files: {}", e)),
    }
}

pub fn directory_exists(dir: &Path) -> ApiResponse<bool> {
    ApiResponse::success(directories::directory_exists(dir))
}

pub fn create_directory(dir: &Path) -> ApiResponse<String> {
    match directories::create_directory(dir) {
        Ok(()) => ApiResponse::success(display(dir)),
        Err(e) => ApiResponse::error(format!("Failed to create directory: {}", e)),
    }
}

/// Working directory name and path
pub fn root_folder() -> ApiResponse<(String, String)> {
    let result = directories::root_folder_path().and_then(|path| {
        let name = directories::root_folder_name()?;
        Ok((name, display(&path)))
    });
    ApiResponse::from_result(result, "Failed to read working directory")
}

pub fn absolute_path(path: &Path) -> ApiResponse<String> {
    ApiResponse::from_result(
        directories::absolute_path(path).map(|p: PathBuf| display(&p)),
        "Failed to resolve path",
    )
}
