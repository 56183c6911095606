// --- File: crates/termin_common/src/error.rs ---
use std::fmt;
use thiserror::Error;

/// The base error type shared by all Termin crates.
///
/// Crate-local errors convert into this type when they cross an HTTP or
/// startup boundary.
#[derive(Error, Debug)]
pub enum TerminError {
    /// Missing or invalid configuration
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// Request data failed validation
    #[error("Validation error: {0}")]
    ValidationError(String),

    /// A feature is switched off in the runtime configuration
    #[error("Service unavailable: {0}")]
    ServiceUnavailable(String),

    /// Foreign error wrapped with [`Context`]
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// A trait for converting errors to HTTP status codes.
pub trait HttpStatusCode {
    /// Returns the HTTP status code for this error.
    fn status_code(&self) -> u16;
}

impl HttpStatusCode for TerminError {
    fn status_code(&self) -> u16 {
        match self {
            TerminError::ConfigError(_) => 500,
            TerminError::ValidationError(_) => 400,
            TerminError::ServiceUnavailable(_) => 503,
            TerminError::InternalError(_) => 500,
        }
    }
}

/// A trait for adding context to errors.
pub trait Context<T, E> {
    /// Adds context to an error.
    fn context<C>(self, context: C) -> Result<T, TerminError>
    where
        C: fmt::Display + Send + Sync + 'static;

    /// Adds context to an error with a lazy context provider.
    fn with_context<C, F>(self, f: F) -> Result<T, TerminError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C;
}

impl<T, E: std::error::Error + Send + Sync + 'static> Context<T, E> for Result<T, E> {
    fn context<C>(self, context: C) -> Result<T, TerminError>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|error| TerminError::InternalError(format!("{}: {}", context, error)))
    }

    fn with_context<C, F>(self, f: F) -> Result<T, TerminError>
    where
        C: fmt::Display + Send + Sync + 'static,
        F: FnOnce() -> C,
    {
        self.map_err(|error| TerminError::InternalError(format!("{}: {}", f(), error)))
    }
}

pub fn validation_error<T: fmt::Display>(message: T) -> TerminError {
    TerminError::ValidationError(message.to_string())
}

pub fn service_unavailable<T: fmt::Display>(message: T) -> TerminError {
    TerminError::ServiceUnavailable(message.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_codes_follow_error_kind() {
        assert_eq!(validation_error("bad phone").status_code(), 400);
        assert_eq!(service_unavailable("form off").status_code(), 503);
        assert_eq!(
            TerminError::ConfigError("no sheet id".into()).status_code(),
            500
        );
    }

    #[test]
    fn context_wraps_foreign_errors() {
        let result: Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing draft dir",
        ));
        let err = result.context("reading draft").unwrap_err();
        assert_eq!(
            err.to_string(),
            "Internal error: reading draft: missing draft dir"
        );
    }
}
