//! Centralized validation of command-line inputs.

use std::path::{Path, PathBuf};

/// Maximum length of a single path component built from input data
pub const MAX_FILENAME_LENGTH: usize = 255;

/// Configuration errors: required inputs that are missing or unusable
#[derive(Debug, thiserror::Error)]
pub enum ValidationError {
    #[error("Input file not found: {}", .0.display())]
    MissingFile(PathBuf),
    #[error("Input path is not a regular file: {}", .0.display())]
    NotAFile(PathBuf),
    #[error("Input directory not found: {}", .0.display())]
    MissingDirectory(PathBuf),
    #[error("Cannot create directory {}: {source}", path.display())]
    CreateDirectory {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("Empty name where a file name was expected")]
    EmptyName,
    #[error("Name too long to use as a file name: exceeds {MAX_FILENAME_LENGTH} characters")]
    NameTooLong,
    #[error("Name '{0}' cannot be used as a file name: contains path separators or control characters")]
    InvalidName(String),
}

/// Ensure a required input file exists and is a regular file.
///
/// # Errors
///
/// Returns `ValidationError::MissingFile` if nothing exists at `path`, or
/// `ValidationError::NotAFile` if it is a directory or other special file.
pub fn require_file(path: &Path) -> Result<(), ValidationError> {
    let metadata =
        std::fs::metadata(path).map_err(|_| ValidationError::MissingFile(path.to_path_buf()))?;
    if !metadata.is_file() {
        return Err(ValidationError::NotAFile(path.to_path_buf()));
    }
    Ok(())
}

/// Ensure a required input directory exists.
///
/// # Errors
///
/// Returns `ValidationError::MissingDirectory` if `path` is not a directory.
pub fn require_dir(path: &Path) -> Result<(), ValidationError> {
    if path.is_dir() {
        Ok(())
    } else {
        Err(ValidationError::MissingDirectory(path.to_path_buf()))
    }
}

/// Create `path` and its parents if they do not exist yet.
///
/// # Errors
///
/// Returns `ValidationError::CreateDirectory` if the directory cannot be created.
pub fn ensure_dir(path: &Path) -> Result<(), ValidationError> {
    std::fs::create_dir_all(path).map_err(|source| ValidationError::CreateDirectory {
        path: path.to_path_buf(),
        source,
    })
}

/// Validate that an identifier read from input data (an accession, a cluster name)
/// is safe to use as a single path component.
///
/// # Errors
///
/// Returns `ValidationError::EmptyName` if the name is blank,
/// `ValidationError::NameTooLong` if it exceeds the limit, or
/// `ValidationError::InvalidName` if it could escape its parent directory.
pub fn validate_path_component(name: &str) -> Result<&str, ValidationError> {
    if name.trim().is_empty() {
        return Err(ValidationError::EmptyName);
    }

    if name.len() > MAX_FILENAME_LENGTH {
        return Err(ValidationError::NameTooLong);
    }

    if name == "."
        || name.contains("..")
        || name.contains('/')
        || name.contains('\\')
        || name.chars().any(char::is_control)
    {
        return Err(ValidationError::InvalidName(name.to_string()));
    }

    Ok(name)
}
