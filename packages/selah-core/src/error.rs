//! # Error Types
//!
//! This module defines all error types for the Selah library.
//!
//! The transposition engine itself never fails: unrecognized chord roots and
//! missing keys degrade to pass-through. Errors only appear at the edges,
//! where sheets, configuration and database snapshots are read.
//!
//! ## Error Types
//! - `ParseError` - Malformed sheet file structure, with line and column
//! - `MetadataError` - Invalid YAML frontmatter or configuration
//! - `LoadError` - The song data source reported a failure
//! - `UnknownKey` - A key name given explicitly by the caller is not a pitch class
//! - `Io` / `Json` - Reading or decoding a snapshot file
//!
//! ## Usage
//! ```rust
//! use selah::{parse_sheet, SelahError};
//!
//! match parse_sheet("---\ntitle: Unfinished\n") {
//!     Ok(sheet) => println!("{:?}", sheet.title),
//!     Err(SelahError::ParseError { line, column, message }) => {
//!         eprintln!("Parse error at {}:{}: {}", line, column, message);
//!     }
//!     Err(e) => eprintln!("Error: {}", e),
//! }
//! ```

use thiserror::Error;

#[derive(Error, Debug)]
pub enum SelahError {
    /// Sheet structure error with location information.
    ///
    /// # Example
    /// ```
    /// # use selah::SelahError;
    /// let err = SelahError::ParseError {
    ///     line: 1,
    ///     column: 1,
    ///     message: "Unterminated frontmatter".to_string(),
    /// };
    /// assert_eq!(err.to_string(), "Parse error at line 1, column 1: Unterminated frontmatter");
    /// ```
    #[error("Parse error at line {line}, column {column}: {message}")]
    ParseError {
        line: usize,
        column: usize,
        message: String,
    },

    /// Invalid metadata error.
    ///
    /// Occurs when sheet frontmatter or a configuration file is not valid YAML
    /// or has fields of the wrong type.
    #[error("Invalid metadata: {0}")]
    MetadataError(String),

    /// The data source could not deliver the song collection.
    ///
    /// This is the only fatal condition of the application; it is shown to the
    /// user and never retried automatically.
    ///
    /// # Example
    /// ```
    /// # use selah::SelahError;
    /// let err = SelahError::LoadError("permission denied".to_string());
    /// assert_eq!(err.to_string(), "Error loading songs: permission denied");
    /// ```
    #[error("Error loading songs: {0}")]
    LoadError(String),

    /// A key requested explicitly (CLI flag, config) is not a recognized pitch class.
    #[error("Unknown key: {0}")]
    UnknownKey(String),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("Invalid snapshot: {0}")]
    Json(#[from] serde_json::Error),
}
