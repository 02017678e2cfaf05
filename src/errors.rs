/*!
 * Error types for the rolesplit application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while parsing a subtitle script
#[derive(Error, Debug)]
pub enum ParseError {
    /// Error when the source file cannot be read or decoded
    #[error("Failed to read script file {path:?}: {source}")]
    Read {
        /// Path of the file that could not be read
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Error when a full scan of the file finds no valid dialogue records
    #[error("No Dialogue lines found in the [Events] section")]
    NoDialogueLines,
}

/// Errors that can occur while distributing classified events
#[derive(Error, Debug)]
pub enum DistributionError {
    /// Error when classification produced no non-empty bucket of any kind
    #[error("No actors, group lines or signs found, nothing to distribute")]
    EmptyResult,
}

/// Errors that can occur while writing output files
#[derive(Error, Debug)]
pub enum OutputError {
    /// Error when the output directory cannot be created or is not writable
    #[error("Output directory {path:?} is not writable: {reason}")]
    DirectoryAccess {
        /// The directory that failed the access check
        path: PathBuf,
        /// Why the directory was rejected
        reason: String,
    },

    /// Error when one specific output bucket fails to serialize or write
    #[error("Failed to write {path:?}: {source}")]
    FileWrite {
        /// Path of the file that could not be written
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from parsing the source script
    #[error("Parse error: {0}")]
    Parse(#[from] ParseError),

    /// Error from the distribution engine
    #[error("Distribution error: {0}")]
    Distribution(#[from] DistributionError),

    /// Error from the output phase
    #[error("Output error: {0}")]
    Output(#[from] OutputError),

    /// Error from a configuration operation
    #[error("Config error: {0}")]
    Config(String),

    /// Any other error
    #[error("Unknown error: {0}")]
    Unknown(String),
}

// Utility functions for error conversion
impl From<anyhow::Error> for AppError {
    fn from(error: anyhow::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}

impl From<std::io::Error> for AppError {
    fn from(error: std::io::Error) -> Self {
        Self::Unknown(error.to_string())
    }
}
