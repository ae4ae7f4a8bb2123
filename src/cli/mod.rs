//! The Rill command-line interface.
//!
//! Thin orchestration over [`crate::runner`]: parse the (empty) argument
//! surface, run the suite, and map the summary to a process exit code.
//! Exit code 0 means every discovered check passed, including the
//! zero-files case; 1 means at least one FAIL or ERROR. A failed directory
//! scan is the one fatal path and renders as a miette report.

use std::process::ExitCode;

use clap::Parser;

use crate::cli::args::RillArgs;
use crate::runner::{run_suite, RunConfig};

pub mod args;

pub fn run() -> miette::Result<ExitCode> {
    let _args = RillArgs::parse();

    let config = RunConfig::default();
    let summary = run_suite(&config)?;

    if summary.all_passed() {
        Ok(ExitCode::SUCCESS)
    } else {
        Ok(ExitCode::FAILURE)
    }
}
