//! # Error Types
//!
//! This module defines custom error types for the experiment framework.
//! It provides specific error variants for the failure scenarios that may
//! occur while configuring, executing and persisting experiments.
//!
//! ## Examples
//!
//! Using the `Result` type:
//!
//! ```rust
//! use degalab::error::{ExperimentError, Result};
//!
//! fn some_function() -> Result<()> {
//!     // Function implementation
//!     Ok(())
//! }
//!
//! fn caller() {
//!     match some_function() {
//!         Ok(_) => println!("Success!"),
//!         Err(e) => println!("Error: {}", e),
//!     }
//! }
//! ```
//!
//! Using the `ResultExt` trait to add context to errors:
//!
//! ```rust
//! use degalab::error::{Result, ResultExt};
//! use std::fs::File;
//!
//! fn read_batch_file(path: &str) -> Result<()> {
//!     File::open(path).context("Failed to open job batch file")
//!         .and_then(|_file| {
//!             // Read file contents
//!             Ok(())
//!         })
//! }
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur in the experiment framework.
///
/// This enum provides specific error variants for the different failure
/// scenarios that may occur while building and running experiment batches.
#[derive(Error, Debug)]
pub enum ExperimentError {
    /// Error that occurs when an invalid configuration is provided
    /// (unknown algorithm or benchmark name, invalid constructor parameter).
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Error that occurs while an algorithm run is executing.
    #[error("Execution error: {0}")]
    Execution(String),

    /// Error that occurs when NaN or infinity values are encountered.
    #[error("Invalid numeric value: {0}")]
    InvalidNumericValue(String),

    /// Error that occurs when a persisted result cannot be read back.
    #[error("Cache error: {0}")]
    Cache(String),

    /// Error that occurs when serializing or deserializing experiment data.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for experiment operations.
///
/// This type is a convenience wrapper around `std::result::Result` with the
/// error type fixed to `ExperimentError`.
pub type Result<T> = std::result::Result<T, ExperimentError>;

/// Extension trait for Result to add context to errors.
///
/// This trait provides a convenient way to add context to errors when
/// converting from one error type to `ExperimentError`.
///
/// ## Examples
///
/// ```rust
/// use degalab::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> degalab::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
/// ```
pub trait ResultExt<T, E> {
    /// Adds context to an error.
    ///
    /// This method converts the error to an `ExperimentError` with the
    /// provided context.
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static;
}

impl<T, E> ResultExt<T, E> for std::result::Result<T, E>
where
    E: StdError + Send + Sync + 'static,
{
    fn context<C>(self, context: C) -> Result<T>
    where
        C: fmt::Display + Send + Sync + 'static,
    {
        self.map_err(|e| ExperimentError::Other(format!("{}: {}", context, e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_context_wraps_error_message() {
        let io_err: std::result::Result<(), std::io::Error> = Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            "missing file",
        ));

        let wrapped = io_err.context("reading batch");
        match wrapped {
            Err(ExperimentError::Other(msg)) => {
                assert!(msg.contains("reading batch"));
                assert!(msg.contains("missing file"));
            }
            _ => panic!("Expected Other error"),
        }
    }

    #[test]
    fn test_io_error_converts() {
        fn read() -> Result<String> {
            let contents = std::fs::read_to_string("/nonexistent/degalab/path")?;
            Ok(contents)
        }

        assert!(matches!(read(), Err(ExperimentError::Io(_))));
    }
}
