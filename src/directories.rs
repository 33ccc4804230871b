// ABOUTME: Directory and path helpers for test automation
// ABOUTME: Working-directory info, directory creation/listing and path manipulation

use std::fs;
use std::path::{Component, Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum DirectoryError {
    #[error("IO error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid file pattern '{pattern}': {source}")]
    Pattern {
        pattern: String,
        #[source]
        source: glob::PatternError,
    },
    #[error("Cannot read {0}")]
    Glob(#[from] glob::GlobError),
}

/// Absolute path of the working directory
pub fn root_folder_path() -> Result<PathBuf, DirectoryError> {
    std::env::current_dir().map_err(|source| DirectoryError::Io {
        path: PathBuf::from("."),
        source,
    })
}

/// Last component of the working directory
pub fn root_folder_name() -> Result<String, DirectoryError> {
    let root = root_folder_path()?;
    Ok(root
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default())
}

/// Create a directory and any missing parents; existing directories are fine
pub fn create_directory(path: impl AsRef<Path>) -> Result<(), DirectoryError> {
    let path = path.as_ref();
    fs::create_dir_all(path).map_err(|source| DirectoryError::Io {
        path: path.to_path_buf(),
        source,
    })
}

pub fn directory_exists(path: impl AsRef<Path>) -> bool {
    path.as_ref().is_dir()
}

/// Regular files under `dir` matching a glob pattern (`*`, `*.txt`,
/// `**/*.json`), sorted
pub fn files_in_directory(
    dir: impl AsRef<Path>,
    pattern: &str,
) -> Result<Vec<PathBuf>, DirectoryError> {
    let dir = dir.as_ref();
    let escaped = glob::Pattern::escape(&dir.to_string_lossy());
    let full = format!("{}/{}", escaped.trim_end_matches('/'), pattern);

    let entries = glob::glob(&full).map_err(|source| DirectoryError::Pattern {
        pattern: pattern.to_string(),
        source,
    })?;

    let mut files = Vec::new();
    for entry in entries {
        let path = entry?;
        if path.is_file() {
            files.push(path);
        }
    }
    files.sort();
    Ok(files)
}

/// Join path segments; an absolute segment restarts the path
pub fn join_paths<I, P>(segments: I) -> PathBuf
where
    I: IntoIterator<Item = P>,
    P: AsRef<Path>,
{
    segments
        .into_iter()
        .fold(PathBuf::new(), |acc, seg| acc.join(seg))
}

/// Resolve against the working directory and normalise `.`/`..` without
/// touching the filesystem
pub fn absolute_path(path: impl AsRef<Path>) -> Result<PathBuf, DirectoryError> {
    let path = path.as_ref();
    let joined = if path.is_absolute() {
        path.to_path_buf()
    } else {
        root_folder_path()?.join(path)
    };
    Ok(normalize(&joined))
}

fn normalize(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                // Never pop past the root or a drive prefix
                if matches!(out.components().next_back(), Some(Component::Normal(_))) {
                    out.pop();
                }
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Parent of a file or directory path; empty for a bare name
pub fn parent_directory(path: impl AsRef<Path>) -> PathBuf {
    path.as_ref()
        .parent()
        .map(Path::to_path_buf)
        .unwrap_or_default()
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_create_and_exists() {
        let dir = TempDir::new().unwrap();
        let nested = dir.path().join("a").join("b").join("c");
        assert!(!directory_exists(&nested));
        create_directory(&nested).unwrap();
        create_directory(&nested).unwrap();
        assert!(directory_exists(&nested));
    }

    #[test]
    fn test_files_in_directory() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("b.txt"), "").unwrap();
        fs::write(dir.path().join("a.txt"), "").unwrap();
        fs::write(dir.path().join("c.csv"), "").unwrap();
        fs::create_dir(dir.path().join("sub.txt")).unwrap();

        let txt = files_in_directory(dir.path(), "*.txt").unwrap();
        let names: Vec<_> = txt
            .iter()
            .map(|p| p.file_name().unwrap().to_string_lossy().into_owned())
            .collect();
        assert_eq!(names, vec!["a.txt", "b.txt"]);

        assert_eq!(files_in_directory(dir.path(), "*").unwrap().len(), 3);
    }

    #[test]
    fn test_files_in_directory_with_glob_chars_in_dir() {
        let dir = TempDir::new().unwrap();
        let odd = dir.path().join("run[1]");
        create_directory(&odd).unwrap();
        fs::write(odd.join("x.log"), "").unwrap();
        assert_eq!(files_in_directory(&odd, "*.log").unwrap().len(), 1);
    }

    #[test]
    fn test_bad_pattern() {
        let dir = TempDir::new().unwrap();
        assert!(matches!(
            files_in_directory(dir.path(), "[z-a"),
            Err(DirectoryError::Pattern { .. })
        ));
    }

    #[test]
    fn test_join_paths() {
        assert_eq!(
            join_paths(["reports", "2024", "run.log"]),
            PathBuf::from("reports").join("2024").join("run.log")
        );
        assert_eq!(join_paths(["a", "/abs", "b"]), PathBuf::from("/abs/b"));
    }

    #[test]
    fn test_normalize() {
        assert_eq!(normalize(Path::new("/a/b/../c/./d")), PathBuf::from("/a/c/d"));
        assert_eq!(normalize(Path::new("/../x")), PathBuf::from("/x"));
    }

    #[test]
    fn test_absolute_path() {
        let cwd = std::env::current_dir().unwrap();
        assert_eq!(absolute_path("child").unwrap(), cwd.join("child"));
        assert!(absolute_path("../x").unwrap().is_absolute());
        assert_eq!(root_folder_name().unwrap(), cwd.file_name().unwrap().to_string_lossy());
    }

    #[test]
    fn test_parent_directory() {
        assert_eq!(parent_directory("/tmp/data/file.txt"), PathBuf::from("/tmp/data"));
        assert_eq!(parent_directory("file.txt"), PathBuf::from(""));
    }
}
