/*!
 * Error types for the vttzero application.
 *
 * This module contains custom error types for different parts of the application,
 * using the thiserror crate for ergonomic error definitions.
 */

// Allow dead code - error types are for library consumers
#![allow(dead_code)]

use std::path::PathBuf;
use thiserror::Error;

/// Errors that can occur while converting a single subtitle file
#[derive(Error, Debug)]
pub enum ConvertError {
    /// Error reading the source file (unreadable or not valid UTF-8)
    #[error("Failed to read source file {path:?}: {source}")]
    SourceUnreadable {
        /// Path of the source file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },

    /// Error writing the destination file
    #[error("Failed to write destination file {path:?}: {source}")]
    DestinationUnwritable {
        /// Path of the destination file
        path: PathBuf,
        /// Underlying I/O error
        source: std::io::Error,
    },
}

/// Errors that fail a batch job before any file is processed
#[derive(Error, Debug)]
pub enum DispatchError {
    /// The configured input directory does not exist
    #[error("Input directory does not exist: {0:?}")]
    InputDirMissing(PathBuf),

    /// The input directory could not be enumerated
    #[error("Failed to list input directory {path:?}: {message}")]
    InputDirUnreadable {
        /// Path of the input directory
        path: PathBuf,
        /// Cause of the enumeration failure
        message: String,
    },

    /// The output directory could not be created
    #[error("Could not create output directory {path:?}: {message}")]
    OutputDirUncreatable {
        /// Path of the output directory
        path: PathBuf,
        /// Cause of the creation failure
        message: String,
    },

    /// A new job was started while one was still running
    #[error("A batch job is already running")]
    JobAlreadyRunning,
}

/// Main application error type that wraps all other errors
#[derive(Error, Debug)]
pub enum AppError {
    /// Error from a file operation
    #[error("File error: {0}")]
    File(String),

    /// Error from a single file conversion
    #[error("Conversion error: {0}")]
    Convert(#[from] ConvertError),

    /// Error from batch dispatch
    #[error("Dispatch error: {0}")]
    Dispatch(#[from] DispatchError),

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
        Self::File(error.to_string())
    }
}
