//! Error and status types for mesh decoding.

use std::path::PathBuf;
use thiserror::Error;

/// Result type for mesh I/O operations.
pub type IoResult<T> = Result<T, IoError>;

/// Status code of a decode or encode call.
///
/// Fatal codes come with an [`IoError`]; the two warning codes are only ever
/// recorded as [`Diagnostic`](crate::Diagnostic)s while decoding continues.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Status {
    /// Nothing went wrong.
    #[default]
    None,
    /// Header or magic mismatch, or a malformed binary prologue.
    ErrUnknownFormat,
    /// A required file could not be opened.
    ErrFileNotFound,
    /// Element type with no representation in the mesh model.
    ErrUnsupportedElement,
    /// Structural invariant violated.
    ErrInvalidData,
    /// Output file could not be opened for writing.
    ErrFailToWriteToDisk,
    /// Operation not offered by the driver.
    ErrMissingDriverCapability,
    /// A vertex ID occurred more than once.
    WarnElementNotUnique,
    /// An element references a vertex that does not exist.
    WarnElementWithInvalidNode,
}

impl Status {
    /// Whether this status only describes a recoverable anomaly.
    #[must_use]
    pub const fn is_warning(self) -> bool {
        matches!(
            self,
            Self::WarnElementNotUnique | Self::WarnElementWithInvalidNode
        )
    }
}

/// Fatal errors that abort a decode or encode.
#[derive(Debug, Error)]
pub enum IoError {
    /// The input is not in the format the driver expects.
    #[error("unknown format: {message}")]
    UnknownFormat {
        /// What did not match.
        message: String,
    },

    /// A required (companion) file could not be opened.
    #[error("file not found: {path}")]
    FileNotFound {
        /// Path that could not be opened.
        path: PathBuf,
    },

    /// The input uses an element type the mesh model cannot represent.
    #[error("unsupported element `{tag}` at line {line}")]
    UnsupportedElement {
        /// Element tag as written in the file.
        tag: String,
        /// 1-based line number.
        line: usize,
    },

    /// The input violates a structural invariant.
    #[error("invalid data: {message}")]
    InvalidData {
        /// Description of the violation.
        message: String,
    },

    /// The output file could not be opened for writing.
    #[error("could not open {path} for writing")]
    FailToWriteToDisk {
        /// Output path.
        path: PathBuf,
    },

    /// The driver does not offer the requested operation.
    #[error("driver {driver} cannot {operation}")]
    MissingDriverCapability {
        /// Driver short name.
        driver: &'static str,
        /// Operation that was requested.
        operation: &'static str,
    },

    /// I/O error from the standard library.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl IoError {
    /// Create an `UnknownFormat` error with the given message.
    #[must_use]
    pub fn unknown_format(message: impl Into<String>) -> Self {
        Self::UnknownFormat {
            message: message.into(),
        }
    }

    /// Create an `InvalidData` error with the given message.
    #[must_use]
    pub fn invalid_data(message: impl Into<String>) -> Self {
        Self::InvalidData {
            message: message.into(),
        }
    }

    /// Map an error from opening `path` for reading.
    #[must_use]
    pub fn open_failed(path: impl Into<PathBuf>, err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::NotFound {
            Self::FileNotFound { path: path.into() }
        } else {
            Self::Io(err)
        }
    }

    /// Status code reported for this error.
    #[must_use]
    pub const fn status(&self) -> Status {
        match self {
            Self::UnknownFormat { .. } => Status::ErrUnknownFormat,
            Self::FileNotFound { .. } => Status::ErrFileNotFound,
            Self::UnsupportedElement { .. } => Status::ErrUnsupportedElement,
            Self::InvalidData { .. } => Status::ErrInvalidData,
            Self::FailToWriteToDisk { .. } => Status::ErrFailToWriteToDisk,
            Self::MissingDriverCapability { .. } => Status::ErrMissingDriverCapability,
            Self::Io(_) => Status::ErrInvalidData,
        }
    }
}
