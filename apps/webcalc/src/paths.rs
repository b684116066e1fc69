use std::fs;
use std::path::{Path, PathBuf};

/// Errors for resolving the home directory
#[derive(Debug, thiserror::Error)]
pub enum HomeDirError {
    #[error("cannot determine the user home directory")]
    HomeMissing,
    #[error("relative paths with directory separators are not allowed: {0}")]
    RelativePathNotAllowed(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

fn user_home() -> Result<PathBuf, HomeDirError> {
    dirs::home_dir().ok_or(HomeDirError::HomeMissing)
}

/// Expand a leading `~` to the user home directory.
///
/// Returns the path unchanged if no tilde prefix is present.
///
/// # Errors
/// `HomeMissing` when the prefix is present and no user home is known.
pub fn expand_tilde(raw: &str) -> Result<PathBuf, HomeDirError> {
    if raw == "~" {
        return user_home();
    }
    match raw.strip_prefix("~/").or_else(|| raw.strip_prefix("~\\")) {
        Some(rest) => Ok(user_home()?.join(rest)),
        None => Ok(PathBuf::from(raw)),
    }
}

/// Resolve the configured home directory.
///
/// Rules:
/// - `~` prefix: expanded to the user home directory
/// - absolute path: used as-is
/// - bare name (no separators): placed under the user home directory
/// - relative path with separators: rejected
///
/// If `create` is true, the directory is created if missing.
///
/// # Errors
/// See [`HomeDirError`].
pub fn resolve_home_dir(raw: &str, create: bool) -> Result<PathBuf, HomeDirError> {
    let expanded = expand_tilde(raw)?;

    let path = if expanded.is_absolute() {
        expanded
    } else if raw.contains('/') || raw.contains('\\') {
        return Err(HomeDirError::RelativePathNotAllowed(raw.to_owned()));
    } else {
        user_home()?.join(&expanded)
    };

    if create {
        fs::create_dir_all(&path)?;
    }
    Ok(path)
}

/// Default `SQLite` URL for the history database under `home_dir`.
#[must_use]
pub fn default_history_url(home_dir: &Path) -> String {
    format!(
        "sqlite://{}?mode=rwc",
        home_dir.join("history.db").display()
    )
}
