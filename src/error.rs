//! Error types

use thiserror::Error;

use crate::interpolate::InterpolationError;

/// Errors raised by translation reads, writes and accessor dispatch
#[derive(Error, Debug)]
pub enum TranslateError {
    /// A locale identifier could not be coerced into a canonical locale
    #[error("Invalid locale identifier '{0}'")]
    InvalidLocale(String),
    /// A locale is well formed but not one of the available locales
    #[error("Locale '{0}' is not available")]
    UnavailableLocale(String),
    /// The attribute was not declared as translatable
    #[error("'{0}' is not a translatable attribute")]
    UnknownAttribute(String),
    /// No accessor with this name exists on the record
    #[error("Undefined accessor '{0}'")]
    UndefinedAccessor(String),
    /// Interpolation failed for a reason other than a missing argument
    #[error(transparent)]
    Interpolation(#[from] InterpolationError),
    /// The backing field could not be read or written
    #[error(transparent)]
    Store(#[from] StoreError),
}

/// Errors raised by the persistence collaborator or while decoding its value
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// The field holds something other than a JSON object of strings
    #[error("Field '{field}' does not hold a translation map")]
    Malformed {
        /// Backing field name
        field: String,
    },
    /// The persistence layer reported a failure
    #[error("Backing field '{field}' failed: {message}")]
    Backend {
        /// Backing field name
        field: String,
        /// Failure reported by the persistence layer
        message: String,
    },
}
