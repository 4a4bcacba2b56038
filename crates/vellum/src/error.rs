//! Error types for view resolution, helper loading, and rendering.
//!
//! [`ViewError`] is the single error type surfaced by this crate. It
//! abstracts over the underlying template engine's errors so the public API
//! stays stable across engine backends. Nothing is retried or swallowed:
//! every failure from resolution, loading, or compilation propagates to the
//! immediate caller.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Error type for all view-layer operations.
#[derive(Debug, Error)]
pub enum ViewError {
    /// The resolved template path does not exist.
    #[error("template not found: {}", path.display())]
    TemplateNotFound {
        /// The resolved path that was probed.
        path: PathBuf,
    },

    /// A stat or read failed while resolving a template or walking a helper
    /// source tree.
    #[error("filesystem error at {}: {source}", path.display())]
    Filesystem {
        /// The path the operation touched.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// A helper source file could not be loaded as a value.
    #[error("failed to load helper module {}: {message}", path.display())]
    HelperLoad {
        /// The helper file that failed to load.
        path: PathBuf,
        /// Parser or format diagnostic.
        message: String,
    },

    /// The template engine rejected the source at compile time.
    #[error("template compile error: {0}")]
    Compile(String),

    /// The engine failed while executing a compiled template.
    #[error("render error: {0}")]
    Render(String),
}

impl ViewError {
    /// Wraps an I/O error with the path that produced it.
    pub(crate) fn filesystem(path: impl Into<PathBuf>, source: io::Error) -> Self {
        ViewError::Filesystem {
            path: path.into(),
            source,
        }
    }
}

// Classifies engine errors the same way for every call site: syntax-class
// failures are compile errors, a missing named template is a not-found, and
// everything else surfaces as a render failure.
impl From<minijinja::Error> for ViewError {
    fn from(err: minijinja::Error) -> Self {
        use minijinja::ErrorKind;

        match err.kind() {
            ErrorKind::SyntaxError | ErrorKind::BadEscape => ViewError::Compile(err.to_string()),
            ErrorKind::TemplateNotFound => ViewError::TemplateNotFound {
                path: PathBuf::from(err.name().unwrap_or_default()),
            },
            _ => ViewError::Render(err.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_not_found_display() {
        let err = ViewError::TemplateNotFound {
            path: PathBuf::from("/views/missing.jinja"),
        };
        assert!(err.to_string().contains("template not found"));
        assert!(err.to_string().contains("missing.jinja"));
    }

    #[test]
    fn test_filesystem_keeps_source() {
        let io_err = io::Error::new(io::ErrorKind::PermissionDenied, "denied");
        let err = ViewError::filesystem("/views", io_err);
        assert!(matches!(err, ViewError::Filesystem { .. }));
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_from_minijinja_syntax_error() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::SyntaxError, "unexpected end");
        let err: ViewError = mj_err.into();
        assert!(matches!(err, ViewError::Compile(_)));
    }

    #[test]
    fn test_from_minijinja_template_not_found() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::TemplateNotFound, "no such view");
        let err: ViewError = mj_err.into();
        assert!(matches!(err, ViewError::TemplateNotFound { .. }));
    }

    #[test]
    fn test_from_minijinja_runtime_error() {
        let mj_err = minijinja::Error::new(minijinja::ErrorKind::InvalidOperation, "bad op");
        let err: ViewError = mj_err.into();
        assert!(matches!(err, ViewError::Render(_)));
    }
}
