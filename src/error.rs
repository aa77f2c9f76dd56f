//! Centralized error handling for stocklens.
//!
//! Every fallible library operation returns [`Result<T>`], whose error type is
//! [`StocklensError`]. The variants follow the failure taxonomy of the
//! dashboard:
//!
//! - file-level problems ([`StocklensError::Io`], [`StocklensError::Spreadsheet`],
//!   [`StocklensError::DataProcessing`], [`StocklensError::UnsupportedFormat`],
//!   [`StocklensError::MissingColumn`]) stop the affected output,
//! - [`StocklensError::InvalidIdentifier`] rejects a whole pasted batch,
//! - configuration problems surface as [`StocklensError::Config`].
//!
//! Malformed usage strings are not errors at all; see
//! [`crate::query::usage::UsageQuantity`].
//!
//! ```no_run
//! use stocklens::error::ResultExt as _;
//!
//! fn read_notes(path: &str) -> stocklens::error::Result<String> {
//!     let text = std::fs::read_to_string(path).context("Failed to read notes")?;
//!     Ok(text)
//! }
//! ```

use std::fmt;

/// Main error type for stocklens operations.
#[derive(Debug)]
pub enum StocklensError {
    /// I/O errors (file operations)
    Io(std::io::Error),

    /// Polars failures while reading or reshaping a table
    DataProcessing(String),

    /// Workbook could not be opened or read
    Spreadsheet(String),

    /// File extension not handled by the loader
    UnsupportedFormat(String),

    /// A required column is absent from a loaded table
    MissingColumn { table: String, column: String },

    /// A pasted identifier token is not a finite number
    InvalidIdentifier { token: String, position: usize },

    /// Configuration errors
    Config(String),

    /// Generic error with context
    Other(String),
}

impl fmt::Display for StocklensError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Io(e) => write!(f, "I/O error: {e}"),
            Self::DataProcessing(msg) => write!(f, "Data processing error: {msg}"),
            Self::Spreadsheet(msg) => write!(f, "Spreadsheet error: {msg}"),
            Self::UnsupportedFormat(ext) => write!(f, "Unsupported file extension: {ext}"),
            Self::MissingColumn { table, column } => {
                write!(f, "Column '{column}' not found in {table} table")
            }
            Self::InvalidIdentifier { token, position } => write!(
                f,
                "Invalid material ID '{token}' (entry {position}): expected a number"
            ),
            Self::Config(msg) => write!(f, "Configuration error: {msg}"),
            Self::Other(msg) => write!(f, "{msg}"),
        }
    }
}

impl std::error::Error for StocklensError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Self::Io(e) => Some(e),
            _ => None,
        }
    }
}

impl From<std::io::Error> for StocklensError {
    fn from(err: std::io::Error) -> Self {
        Self::Io(err)
    }
}

impl From<serde_json::Error> for StocklensError {
    fn from(err: serde_json::Error) -> Self {
        Self::Config(format!("JSON error: {err}"))
    }
}

impl From<polars::error::PolarsError> for StocklensError {
    fn from(err: polars::error::PolarsError) -> Self {
        Self::DataProcessing(err.to_string())
    }
}

impl From<calamine::Error> for StocklensError {
    fn from(err: calamine::Error) -> Self {
        Self::Spreadsheet(err.to_string())
    }
}

/// Result type alias for stocklens operations.
pub type Result<T> = std::result::Result<T, StocklensError>;

/// Extension trait to add context to results.
pub trait ResultExt<T> {
    /// Add context to an error.
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped in [`StocklensError::Other`] with `msg` prefixed.
    fn context(self, msg: impl Into<String>) -> Result<T>;

    /// Add context using a closure (lazy evaluation).
    ///
    /// # Errors
    ///
    /// Returns the original error wrapped in [`StocklensError::Other`] with the
    /// closure's message prefixed.
    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String;
}

impl<T, E> ResultExt<T> for std::result::Result<T, E>
where
    E: Into<StocklensError>,
{
    fn context(self, msg: impl Into<String>) -> Result<T> {
        self.map_err(|e| {
            let err: StocklensError = e.into();
            StocklensError::Other(format!("{}: {}", msg.into(), err))
        })
    }

    fn with_context<F>(self, f: F) -> Result<T>
    where
        F: FnOnce() -> String,
    {
        self.map_err(|e| {
            let err: StocklensError = e.into();
            StocklensError::Other(format!("{}: {}", f(), err))
        })
    }
}
