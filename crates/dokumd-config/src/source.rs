//! Source directory validation.

use std::path::{Path, PathBuf};

/// Directory inside a DokuWiki data folder that holds page text.
pub const PAGES_DIR: &str = "pages";

/// Reason a path cannot be used as a conversion source.
#[derive(Debug, thiserror::Error)]
pub enum SourceError {
    /// Path does not exist.
    #[error("Source directory not found: {}", .0.display())]
    NotFound(PathBuf),
    /// Path exists but is not a directory.
    #[error("Source is not a directory: {}", .0.display())]
    NotADirectory(PathBuf),
    /// Directory has no `pages/` subdirectory.
    #[error("Source directory has no 'pages' folder: {}", .0.display())]
    MissingPages(PathBuf),
}

/// Check that `path` looks like a DokuWiki data directory.
///
/// # Errors
///
/// Returns [`SourceError`] if the path is missing, is not a directory, or
/// has no `pages/` subdirectory.
pub fn validate_source(path: &Path) -> Result<(), SourceError> {
    if !path.exists() {
        return Err(SourceError::NotFound(path.to_path_buf()));
    }
    if !path.is_dir() {
        return Err(SourceError::NotADirectory(path.to_path_buf()));
    }
    if !path.join(PAGES_DIR).is_dir() {
        return Err(SourceError::MissingPages(path.to_path_buf()));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_source() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("pages")).unwrap();

        assert!(validate_source(temp.path()).is_ok());
    }

    #[test]
    fn test_missing_source() {
        let temp = tempfile::tempdir().unwrap();
        let err = validate_source(&temp.path().join("nope")).unwrap_err();

        assert!(matches!(err, SourceError::NotFound(_)));
    }

    #[test]
    fn test_file_is_not_a_source() {
        let temp = tempfile::tempdir().unwrap();
        let file = temp.path().join("data.txt");
        std::fs::write(&file, "").unwrap();

        let err = validate_source(&file).unwrap_err();
        assert!(matches!(err, SourceError::NotADirectory(_)));
    }

    #[test]
    fn test_source_without_pages() {
        let temp = tempfile::tempdir().unwrap();
        std::fs::create_dir(temp.path().join("media")).unwrap();

        let err = validate_source(temp.path()).unwrap_err();
        assert!(matches!(err, SourceError::MissingPages(_)));
        assert!(err.to_string().contains("'pages'"));
    }
}
