//! Model path resolution.

use std::env;
use std::path::PathBuf;

use thiserror::Error;

/// Errors that can occur while resolving a configured path.
#[derive(Debug, Error)]
pub enum PathError {
    /// Could not determine the user's home directory.
    #[error("Cannot determine home directory")]
    NoHomeDir,

    /// An empty path was provided.
    #[error("Path cannot be empty")]
    EmptyPath,

    /// Failed to get the current working directory.
    #[error("Cannot determine current directory: {0}")]
    CurrentDirError(String),
}

/// Resolve a user-provided model path to an absolute path.
///
/// Expands a leading `~`, joins relative paths onto the working directory
/// and resolves symlinks when the target exists. A missing target is not an
/// error here; callers decide what to do with it.
pub fn resolve_model_path(raw: &str) -> Result<PathBuf, PathError> {
    let absolute = normalize_user_path(raw)?;
    Ok(std::fs::canonicalize(&absolute).unwrap_or(absolute))
}

fn normalize_user_path(raw: &str) -> Result<PathBuf, PathError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Err(PathError::EmptyPath);
    }

    let expanded = if trimmed.starts_with("~/") || trimmed == "~" {
        let home = dirs::home_dir().ok_or(PathError::NoHomeDir)?;
        if trimmed == "~" {
            home
        } else {
            home.join(trimmed.trim_start_matches("~/"))
        }
    } else {
        PathBuf::from(trimmed)
    };

    if expanded.is_absolute() {
        Ok(expanded)
    } else {
        env::current_dir()
            .map(|cwd| cwd.join(expanded))
            .map_err(|e| PathError::CurrentDirError(e.to_string()))
    }
}
