//! Command implementations for the vfld verifier CLI
//!
//! The tool is single-purpose: logging is initialized from the CLI flags,
//! then the verification pipeline runs to completion (or fails fast on a
//! fatal configuration error).

pub mod shared;
pub mod verify;

// Re-export the main types and functions for library callers
pub use shared::VerificationSummary;
pub use verify::run_verification;

use crate::Result;
use crate::cli::args::Args;

/// Main entry point for the verifier CLI
pub async fn run(args: Args) -> Result<VerificationSummary> {
    shared::setup_logging(&args)?;
    verify::run_verify(args).await
}
