//! Unified application error types for crudkit.
//!
//! Every failure raised by the service layer, the stores, and the mapping
//! helpers is an [`AppError`]. The [`ErrorKind`] tells callers which
//! category they are dealing with so they can map it to an external status
//! code; the optional source carries the underlying library error.

use std::fmt;
use thiserror::Error;

/// Boxed error type accepted as an underlying cause.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Top-level error kind categorization.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize)]
pub enum ErrorKind {
    /// A lookup by key found no entity.
    NotFound,
    /// An entity could not be converted to or from its JSON document.
    Conversion,
    /// A JSON Patch could not be parsed or applied.
    Patch,
    /// An entity could not be mapped to its DTO.
    Mapping,
    /// Input validation failed.
    Validation,
    /// The backing store reported an error.
    Database,
    /// A serialization/deserialization error occurred.
    Serialization,
    /// A configuration error occurred.
    Configuration,
    /// An internal error occurred.
    Internal,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotFound => write!(f, "NOT_FOUND"),
            Self::Conversion => write!(f, "CONVERSION"),
            Self::Patch => write!(f, "PATCH"),
            Self::Mapping => write!(f, "MAPPING"),
            Self::Validation => write!(f, "VALIDATION"),
            Self::Database => write!(f, "DATABASE"),
            Self::Serialization => write!(f, "SERIALIZATION"),
            Self::Configuration => write!(f, "CONFIGURATION"),
            Self::Internal => write!(f, "INTERNAL"),
        }
    }
}

/// The unified application error used throughout crudkit.
///
/// Library errors are mapped into `AppError` using `From` impls or
/// explicit `.map_err()` calls at the point where they occur, and then
/// propagate to the caller untouched.
#[derive(Debug, Error)]
#[error("{kind}: {message}")]
pub struct AppError {
    /// The category of error.
    pub kind: ErrorKind,
    /// A human-readable error message.
    pub message: String,
    /// Optional underlying cause.
    #[source]
    pub source: Option<BoxError>,
}

impl AppError {
    /// Create a new application error.
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            source: None,
        }
    }

    /// Create a new application error with an underlying cause.
    pub fn with_source(
        kind: ErrorKind,
        message: impl Into<String>,
        source: impl Into<BoxError>,
    ) -> Self {
        Self {
            kind,
            message: message.into(),
            source: Some(source.into()),
        }
    }

    /// Create a not-found error.
    pub fn not_found(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::NotFound, message)
    }

    /// Create an entity conversion error wrapping its cause.
    pub fn conversion(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::with_source(ErrorKind::Conversion, message, source)
    }

    /// Create a patch application error wrapping its cause.
    pub fn patch(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::with_source(ErrorKind::Patch, message, source)
    }

    /// Create a DTO mapping error wrapping its cause.
    pub fn mapping(message: impl Into<String>, source: impl Into<BoxError>) -> Self {
        Self::with_source(ErrorKind::Mapping, message, source)
    }

    /// Create a validation error.
    pub fn validation(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Validation, message)
    }

    /// Create a database error.
    pub fn database(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Database, message)
    }

    /// Create a configuration error.
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Configuration, message)
    }

    /// Create an internal error.
    pub fn internal(message: impl Into<String>) -> Self {
        Self::new(ErrorKind::Internal, message)
    }

    /// Returns `true` if this error is of the given kind.
    pub fn is(&self, kind: ErrorKind) -> bool {
        self.kind == kind
    }

    /// Whether retrying the same call could succeed.
    ///
    /// Only store failures qualify. Not-found, conversion, patch and
    /// mapping errors are caused by the caller's input and are terminal.
    pub fn is_retryable(&self) -> bool {
        matches!(self.kind, ErrorKind::Database)
    }
}

impl Clone for AppError {
    fn clone(&self) -> Self {
        Self {
            kind: self.kind,
            message: self.message.clone(),
            source: None,
        }
    }
}

impl From<serde_json::Error> for AppError {
    fn from(err: serde_json::Error) -> Self {
        Self::with_source(
            ErrorKind::Serialization,
            format!("JSON serialization error: {err}"),
            err,
        )
    }
}

impl From<config::ConfigError> for AppError {
    fn from(err: config::ConfigError) -> Self {
        Self::with_source(
            ErrorKind::Configuration,
            format!("Configuration error: {err}"),
            err,
        )
    }
}
