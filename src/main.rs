use clap::Parser;
use std::process;
use vfld_verify::cli::{args::Args, commands};

fn main() {
    // Parse command line arguments; clap exits non-zero on malformed
    // numeric arguments before any work starts
    let args = Args::parse();

    // Create async runtime and run the verification pipeline
    let runtime = tokio::runtime::Runtime::new().unwrap_or_else(|e| {
        eprintln!("Failed to create async runtime: {}", e);
        process::exit(1);
    });

    let result = runtime.block_on(commands::run(args));

    match result {
        Ok(_summary) => {
            // Success - the summary has already been reported by the command
            process::exit(0);
        }
        Err(error) => {
            // Fatal error - print to stderr and exit with error code
            eprintln!("Error: {}", error);
            process::exit(1);
        }
    }
}
