//! vfld-verify Library
//!
//! A Rust library for verifying numerical weather prediction forecasts
//! against point observations using the vfld/vobs report file format.
//!
//! This library provides tools for:
//! - Decoding version-tagged vfld (forecast) and vobs (observation) report files
//! - Calendar-safe valid-time derivation from base time and lead time
//! - Matching forecast records to observations by station, time and pressure level
//! - Windowed precipitation differencing from cumulative forecast totals
//! - Parallel accumulation and merging of bias/RMSE statistics
//! - CSV metric report emission

pub mod config;
pub mod constants;
pub mod timeops;

// Core application modules
pub mod app {
    pub mod models;
    pub mod services {
        pub mod aggregator;
        pub mod discovery;
        pub mod matcher;
        pub mod obs_index;
        pub mod precip;
        pub mod report_decoder;
        pub mod report_writer;
        pub mod variables;
    }
}

// CLI modules
pub mod cli {
    pub mod args;
    pub mod commands;
}

// Re-export commonly used types
pub use app::models::{FileInfo, ReportKind, SurfaceStation, TempLevel};
pub use app::services::variables::Variable;
pub use config::Config;

/// Result type alias for the vfld verifier
pub type Result<T> = std::result::Result<T, Error>;

/// Comprehensive error types for verification operations
#[derive(thiserror::Error, Debug)]
pub enum Error {
    /// I/O operation failed
    #[error("I/O error: {message}")]
    Io {
        message: String,
        #[source]
        source: std::io::Error,
    },

    /// Report file format error (recoverable at single-file granularity)
    #[error("Report format error in file '{file}': {message}")]
    ReportFormat { file: String, message: String },

    /// Configuration error (fatal)
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// Directory traversal error
    #[error("Directory traversal error: {message}")]
    DirectoryTraversal {
        message: String,
        #[source]
        source: walkdir::Error,
    },

    /// CSV report writing error
    #[error("CSV writing error: {message}")]
    CsvWriting {
        message: String,
        #[source]
        source: csv::Error,
    },

    /// Worker task failure during parallel processing
    #[error("Worker failure: {message}")]
    Worker { message: String },
}

impl Error {
    /// Create an I/O error with context
    pub fn io(message: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            message: message.into(),
            source,
        }
    }

    /// Create an I/O error with a simple message
    pub fn io_error(message: impl Into<String>) -> Self {
        let message_str = message.into();
        Self::Io {
            message: message_str.clone(),
            source: std::io::Error::other(message_str),
        }
    }

    /// Create a report format error
    pub fn report_format(file: impl Into<String>, message: impl Into<String>) -> Self {
        Self::ReportFormat {
            file: file.into(),
            message: message.into(),
        }
    }

    /// Create a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Create a directory traversal error
    pub fn directory_traversal(message: impl Into<String>, source: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: message.into(),
            source,
        }
    }

    /// Create a CSV writing error
    pub fn csv_writing(message: impl Into<String>, source: csv::Error) -> Self {
        Self::CsvWriting {
            message: message.into(),
            source,
        }
    }

    /// Create a worker failure error
    pub fn worker(message: impl Into<String>) -> Self {
        Self::Worker {
            message: message.into(),
        }
    }
}

// Automatic conversions from common error types
impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Self::Io {
            message: "I/O operation failed".to_string(),
            source: error,
        }
    }
}

impl From<walkdir::Error> for Error {
    fn from(error: walkdir::Error) -> Self {
        Self::DirectoryTraversal {
            message: "Directory traversal failed".to_string(),
            source: error,
        }
    }
}

impl From<csv::Error> for Error {
    fn from(error: csv::Error) -> Self {
        Self::CsvWriting {
            message: "CSV writing failed".to_string(),
            source: error,
        }
    }
}

impl From<tokio::task::JoinError> for Error {
    fn from(error: tokio::task::JoinError) -> Self {
        Self::Worker {
            message: format!("Worker task panicked or was cancelled: {}", error),
        }
    }
}
