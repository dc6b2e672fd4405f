//! Path validation and splitting
//!
//! Both mount source paths and query paths go through the same rules:
//! absolute, slash-separated, no empty segments, no `.` or `..`.

use thiserror::Error;

/// Errors that can occur while validating a path
#[derive(Debug, Error, PartialEq, Eq)]
pub enum PathError {
    /// Path is malformed
    #[error("Invalid path: {0}")]
    InvalidPath(String),
}

/// Splits an absolute path into its segments
///
/// The root path `/` yields an empty segment list. Relative paths, empty
/// segments (`//`), and `.`/`..` segments are rejected.
///
/// # Examples
///
/// ```
/// use mount_table::path::split_path;
///
/// assert_eq!(split_path("/a/b").unwrap(), vec!["a", "b"]);
/// assert_eq!(split_path("/").unwrap(), Vec::<&str>::new());
/// assert!(split_path("a/b").is_err());
/// ```
pub fn split_path(path: &str) -> Result<Vec<&str>, PathError> {
    let rest = path
        .strip_prefix('/')
        .ok_or_else(|| PathError::InvalidPath(format!("Path is not absolute: {path}")))?;

    if rest.is_empty() {
        return Ok(Vec::new());
    }

    let segments: Vec<&str> = rest.split('/').collect();
    for segment in &segments {
        if segment.is_empty() {
            return Err(PathError::InvalidPath(format!(
                "Path contains an empty segment: {path}"
            )));
        }
        if *segment == "." || *segment == ".." {
            return Err(PathError::InvalidPath(format!(
                "Path contains a relative segment: {path}"
            )));
        }
    }

    Ok(segments)
}

/// Joins segments back into an absolute path
///
/// Zero segments produce the root path `/`.
pub fn join_segments(segments: &[&str]) -> String {
    if segments.is_empty() {
        "/".to_string()
    } else {
        format!("/{}", segments.join("/"))
    }
}
