use std::path::PathBuf;

use thiserror::Error;
use tracing::{error, warn};

/// Error severity for spoken feedback
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorSeverity {
    Info,    // expected rejection, e.g. a duplicate name
    Warning, // recoverable, state left intact
    Error,   // operation failed
}

/// Coarse classification used when deciding how to report a failure.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Validation,
    NotFound,
    Filesystem,
    Store,
}

/// Domain-specific errors for the favorites engine
#[derive(Error, Debug)]
pub enum FavoritesError {
    #[error("identifier '{0}' is already in use")]
    DuplicateIdentifier(String),

    #[error("new name must not be empty")]
    EmptyName,

    #[error("path does not exist: {0}")]
    MissingPath(String),

    #[error("category '{0}' already exists")]
    DuplicateCategory(String),

    #[error("no saved path with identifier '{0}'")]
    UnknownIdentifier(String),

    #[error("no category named '{0}'")]
    UnknownCategory(String),

    #[error("access denied: {}", .path.display())]
    PermissionDenied { path: PathBuf },

    #[error("filesystem operation failed on '{}': {source}", .path.display())]
    Filesystem {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("'{}' already exists", .0.display())]
    DestinationExists(PathBuf),

    #[error("clipboard is empty")]
    ClipboardEmpty,

    #[error("could not open '{}': {source}", .path.display())]
    Launch {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("system clipboard unavailable: {0}")]
    SystemClipboard(String),

    #[error("store error: {0}")]
    Store(#[from] rusqlite::Error),

    #[error("legacy favorites file is not valid JSON: {0}")]
    LegacyDecode(#[from] serde_json::Error),

    #[error("{0} is not available in the basic catalog")]
    Unsupported(&'static str),

    #[error("favorites store is closed")]
    NotRunning,
}

impl FavoritesError {
    /// Wrap an io error, promoting permission failures to their own variant.
    pub fn from_io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        let path = path.into();
        if source.kind() == std::io::ErrorKind::PermissionDenied {
            Self::PermissionDenied { path }
        } else {
            Self::Filesystem { path, source }
        }
    }

    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::DuplicateIdentifier(_)
            | Self::EmptyName
            | Self::MissingPath(_)
            | Self::DuplicateCategory(_)
            | Self::Unsupported(_) => ErrorKind::Validation,
            Self::UnknownIdentifier(_) | Self::UnknownCategory(_) => ErrorKind::NotFound,
            Self::PermissionDenied { .. }
            | Self::Filesystem { .. }
            | Self::DestinationExists(_)
            | Self::ClipboardEmpty
            | Self::Launch { .. }
            | Self::SystemClipboard(_) => ErrorKind::Filesystem,
            Self::Store(_) | Self::LegacyDecode(_) | Self::NotRunning => ErrorKind::Store,
        }
    }

    pub fn severity(&self) -> ErrorSeverity {
        match self.kind() {
            ErrorKind::Validation | ErrorKind::NotFound => ErrorSeverity::Info,
            ErrorKind::Filesystem => ErrorSeverity::Warning,
            ErrorKind::Store => ErrorSeverity::Error,
        }
    }

    /// Text suitable for speaking to the user.
    pub fn user_message(&self) -> String {
        match self {
            Self::DuplicateIdentifier(_) => {
                "Unable to add the path, the identifier is already in use.".to_string()
            }
            Self::EmptyName => "The new name cannot be empty.".to_string(),
            Self::MissingPath(_) => "Unable to add the path, the path does not exist.".to_string(),
            Self::DuplicateCategory(_) => "The category already exists.".to_string(),
            Self::UnknownIdentifier(id) => format!("No saved path named {}.", id),
            Self::UnknownCategory(name) => format!("No category named {}.", name),
            Self::PermissionDenied { .. } => "Access denied".to_string(),
            Self::Filesystem { source, .. } => source.to_string(),
            Self::DestinationExists(path) => format!(
                "{} already exists.",
                path.file_name()
                    .map(|n| n.to_string_lossy().into_owned())
                    .unwrap_or_else(|| path.display().to_string())
            ),
            Self::ClipboardEmpty => "The clipboard is empty".to_string(),
            Self::Launch { source, .. } => source.to_string(),
            Self::SystemClipboard(msg) => format!("Error copying the path: {}", msg),
            Self::Store(e) => format!("An error occurred while accessing the paths: {}", e),
            Self::LegacyDecode(_) => "Error decoding the legacy favorites file.".to_string(),
            Self::Unsupported(what) => format!("{} is not available.", what),
            Self::NotRunning => "Favorite paths are not available.".to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, FavoritesError>;

/// Extension trait for silent error logging with caller location tracking.
/// Use when the operation is recoverable and the user doesn't need to know.
///
/// # Examples
///
/// ```ignore
/// use virtual_explorer::error::ResultExt;
///
/// store.commit().log_err();
/// ```
pub trait ResultExt<T> {
    /// Log error with caller location and return None. Use for recoverable failures.
    fn log_err(self) -> Option<T>;
    /// Log as warning with caller location and return None. Use for expected failures.
    fn warn_on_err(self) -> Option<T>;
}

impl<T, E: std::fmt::Debug> ResultExt<T> for std::result::Result<T, E> {
    #[track_caller]
    fn log_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                error!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation failed"
                );
                None
            }
        }
    }

    #[track_caller]
    fn warn_on_err(self) -> Option<T> {
        match self {
            Ok(value) => Some(value),
            Err(error) => {
                let caller = std::panic::Location::caller();
                warn!(
                    error = ?error,
                    file = caller.file(),
                    line = caller.line(),
                    "Operation had warning"
                );
                None
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_permission_denied_is_promoted() {
        let io = std::io::Error::new(std::io::ErrorKind::PermissionDenied, "nope");
        let err = FavoritesError::from_io("/root/secret", io);
        assert!(matches!(err, FavoritesError::PermissionDenied { .. }));
        assert_eq!(err.user_message(), "Access denied");
        assert_eq!(err.kind(), ErrorKind::Filesystem);
    }

    #[test]
    fn test_other_io_errors_stay_generic() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = FavoritesError::from_io("/tmp/missing", io);
        assert!(matches!(err, FavoritesError::Filesystem { .. }));
        assert_eq!(err.user_message(), "gone");
    }

    #[test]
    fn test_kinds_follow_taxonomy() {
        assert_eq!(
            FavoritesError::DuplicateIdentifier("a".into()).kind(),
            ErrorKind::Validation
        );
        assert_eq!(FavoritesError::EmptyName.kind(), ErrorKind::Validation);
        assert_eq!(
            FavoritesError::UnknownIdentifier("a".into()).kind(),
            ErrorKind::NotFound
        );
        assert_eq!(FavoritesError::ClipboardEmpty.kind(), ErrorKind::Filesystem);
        assert_eq!(
            FavoritesError::Store(rusqlite::Error::InvalidQuery).kind(),
            ErrorKind::Store
        );
        assert_eq!(
            FavoritesError::Store(rusqlite::Error::InvalidQuery).severity(),
            ErrorSeverity::Error
        );
    }

    #[test]
    fn test_destination_exists_names_the_file() {
        let err = FavoritesError::DestinationExists(PathBuf::from("/tmp/d/A.txt"));
        assert_eq!(err.user_message(), "A.txt already exists.");
    }

    #[test]
    fn test_log_err_returns_none_on_error() {
        let result: std::result::Result<u8, &str> = Err("boom");
        assert_eq!(result.log_err(), None);
        let ok: std::result::Result<u8, &str> = Ok(3);
        assert_eq!(ok.warn_on_err(), Some(3));
    }
}
