//! # Error Types
//!
//! This module defines the error type shared by every part of the crate.
//! Configuration problems and broken population invariants surface as
//! `GeneticError` values; persistence failures are reported the same way
//! but the evolution loop only logs them.
//!
//! ## Examples
//!
//! ```rust
//! use onemax::error::{GeneticError, Result};
//!
//! fn check_size(size: usize) -> Result<()> {
//!     if size < 2 {
//!         return Err(GeneticError::Configuration(
//!             "Population size must be at least 2".to_string(),
//!         ));
//!     }
//!     Ok(())
//! }
//!
//! assert!(check_size(1).is_err());
//! ```
//!
//! Using the `OptionExt` trait to convert `Option` to `Result`:
//!
//! ```rust
//! use onemax::error::{GeneticError, OptionExt};
//!
//! fn best(scores: &[usize]) -> onemax::error::Result<usize> {
//!     scores.iter().max().cloned().ok_or_else_genetic(|| GeneticError::EmptyPopulation)
//! }
//!
//! assert!(best(&[]).is_err());
//! ```

use std::error::Error as StdError;
use std::fmt;
use thiserror::Error;

/// Represents errors that can occur while evolving a population.
#[derive(Error, Debug)]
pub enum GeneticError {
    /// An invalid configuration was provided.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// A population operation was called in a state where its precondition
    /// does not hold, e.g. truncating below the target size.
    #[error("Invariant violation: {0}")]
    InvariantViolation(String),

    /// Error that occurs when an empty population is encountered.
    #[error("Empty population error: Cannot operate on an empty population")]
    EmptyPopulation,

    /// A gene position or population index is outside of valid bounds.
    #[error("Bounds error: {0}")]
    OutOfBounds(String),

    /// A gene value other than 0 or 1.
    #[error("Invalid gene value {0}: genes must be 0 or 1")]
    InvalidGene(u8),

    /// Writing an individual to the persistence sink failed.
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Error that occurs when an I/O operation fails.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Error that occurs when a record cannot be serialized.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// A generic error with a custom message.
    #[error("{0}")]
    Other(String),
}

/// A specialized Result type for genetic algorithm operations.
pub type Result<T> = std::result::Result<T, GeneticError>;

/// Extension trait for Result to add context to errors.
///
/// ## Examples
///
/// ```rust
/// use onemax::error::ResultExt;
/// use std::fs::File;
///
/// fn read_file(path: &str) -> onemax::error::Result<()> {
///     File::open(path).context("Failed to open file")?;
///     Ok(())
/// }
///
/// assert!(read_file("/definitely/not/here").is_err());
/// ```
pub trait ResultExt<T, E> {
    /// Converts the error to a `GeneticError::Other` prefixed with `context`.
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
        self.map_err(|e| GeneticError::Other(format!("{}: {}", context, e)))
    }
}

/// Extension trait for Option to convert to Result with a custom error.
pub trait OptionExt<T> {
    /// Converts an `Option<T>` to a `Result<T>` using `err_fn` for the `None` case.
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError;
}

impl<T> OptionExt<T> for Option<T> {
    fn ok_or_else_genetic<F>(self, err_fn: F) -> Result<T>
    where
        F: FnOnce() -> GeneticError,
    {
        self.ok_or_else(err_fn)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io;

    #[test]
    fn test_context_wraps_message() {
        let result: std::result::Result<(), io::Error> =
            Err(io::Error::new(io::ErrorKind::ConnectionRefused, "refused"));
        match result.context("Failed to reach sink") {
            Err(GeneticError::Other(msg)) => {
                assert!(msg.starts_with("Failed to reach sink"));
                assert!(msg.contains("refused"));
            }
            _ => panic!("Expected Other error"),
        }
    }

    #[test]
    fn test_io_error_converts() {
        fn fails() -> Result<()> {
            Err(io::Error::new(io::ErrorKind::Other, "boom"))?;
            Ok(())
        }
        assert!(matches!(fails(), Err(GeneticError::Io(_))));
    }

    #[test]
    fn test_option_ext() {
        let none: Option<usize> = None;
        assert!(matches!(
            none.ok_or_else_genetic(|| GeneticError::EmptyPopulation),
            Err(GeneticError::EmptyPopulation)
        ));
        assert_eq!(Some(3).ok_or_else_genetic(|| GeneticError::EmptyPopulation).unwrap(), 3);
    }

    #[test]
    fn test_display() {
        let err = GeneticError::InvalidGene(7);
        assert_eq!(err.to_string(), "Invalid gene value 7: genes must be 0 or 1");
    }
}
