//! Error types produced by the intake crate.
//!
//! Every variant describes a problem with the submitted report itself, so all
//! of them map to a client error at the HTTP boundary.
//!
//! | Error | Description |
//! |-------|-------------|
//! | [`MissingField`](IntakeError::MissingField) | Required field absent, or `itemName` blank |
//! | [`FieldTooLong`](IntakeError::FieldTooLong) | Field exceeds `max_field_bytes` after sanitizing |
//! | [`TooManyDetections`](IntakeError::TooManyDetections) | `aiAnalysis` carries too many objects |
//!
//! ```rust
//! use intake::IntakeError;
//!
//! let err = IntakeError::MissingField("category".into());
//! assert_eq!(err.to_string(), "Missing required field: category");
//! assert_eq!(err.http_status_code(), 400);
//! ```
use thiserror::Error;

/// Errors that can occur while validating a report.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
#[non_exhaustive]
pub enum IntakeError {
    /// A required field was absent from the submission.
    ///
    /// Fields are checked in the order `itemName`, `category`, `location`,
    /// `date`, `contactInfo`; only the first missing one is reported.
    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("field {field} is {len} bytes, limit is {limit}")]
    FieldTooLong {
        field: &'static str,
        len: usize,
        limit: usize,
    },

    #[error("aiAnalysis has {count} detected objects, limit is {limit}")]
    TooManyDetections { count: usize, limit: usize },
}

impl IntakeError {
    /// All intake errors are caused by the submitted data.
    pub fn is_client_error(&self) -> bool {
        true
    }

    pub fn http_status_code(&self) -> u16 {
        400
    }
}
