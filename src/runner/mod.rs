//! The check runner.
//!
//! Discovers check scripts under a fixed directory, executes each one in a
//! fresh environment, classifies the outcome, prints line-oriented results,
//! and reports an aggregate summary:
//!
//! ```text
//! PASS: scripts/checks/test_math.rill
//! FAIL: scripts/checks/strings_test.rill
//! ERROR: scripts/checks/test_bad.rill -> Parse error: ...
//!
//! Summary: 1/3 tests passed
//! ```
//!
//! Execution is strictly sequential and runs every discovered file exactly
//! once; a failing script never aborts the run. The only cross-file state
//! is the local pass counter in [`run_suite`].

pub mod discovery;

use std::fs;
use std::path::{Path, PathBuf};

use crate::errors::{ErrorKind, RillError, SourceContext};
use crate::runtime::env::Env;
use crate::runtime::eval::{eval_program, EvalContext, DEFAULT_DEPTH_LIMIT};
use crate::runtime::output::{OutputSink, StdoutSink};
use crate::syntax::parse;

use discovery::{discover_check_files, CheckFile};

/// Runner configuration. The defaults are the whole contract: checks live
/// under `scripts/checks` relative to the invocation directory, and there
/// is deliberately no way to configure anything else.
pub struct RunConfig {
    pub root: PathBuf,
    pub depth_limit: usize,
}

impl Default for RunConfig {
    fn default() -> Self {
        Self {
            root: PathBuf::from("scripts").join("checks"),
            depth_limit: DEFAULT_DEPTH_LIMIT,
        }
    }
}

/// Classified result of executing one check script.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
    /// The script ran to completion.
    Pass,
    /// An assertion in the script did not hold.
    Fail,
    /// Anything else went wrong: unreadable file, parse error, runtime
    /// fault. Carries the error's display text.
    Error { message: String },
}

/// Aggregate counts for a completed run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    pub total: usize,
    pub passed: usize,
}

impl RunSummary {
    pub fn all_passed(&self) -> bool {
        self.passed == self.total
    }
}

/// Executes one check script in a fresh entry-point environment and
/// classifies the result. Script `print` output goes straight to stdout,
/// exactly as it would if the script ran standalone.
pub fn execute_check_file(path: &Path, depth_limit: usize) -> Outcome {
    let mut sink = StdoutSink;
    let result = read_parse_eval(path, depth_limit, &mut sink);
    match result {
        Ok(()) => Outcome::Pass,
        Err(e) if e.is_assertion_failure() => Outcome::Fail,
        Err(e) => Outcome::Error {
            message: e.to_string(),
        },
    }
}

fn read_parse_eval(
    path: &Path,
    depth_limit: usize,
    sink: &mut dyn OutputSink,
) -> Result<(), RillError> {
    let content = fs::read_to_string(path).map_err(|e| {
        RillError::new(
            ErrorKind::Io {
                message: format!("failed to read '{}': {e}", path.display()),
            },
            &SourceContext::fallback("check execution"),
            crate::errors::unspanned(),
        )
    })?;
    let source = SourceContext::from_file(path.display().to_string(), content.clone());
    let program = parse(&content, &source)?;
    let mut ctx = EvalContext::new(Env::entry_point(), sink, source).with_depth_limit(depth_limit);
    eval_program(&mut ctx, &program)?;
    Ok(())
}

/// Formats the per-file result line.
pub fn outcome_line(file: &CheckFile, outcome: &Outcome) -> String {
    let path = file.path.display();
    match outcome {
        Outcome::Pass => format!("PASS: {path}"),
        Outcome::Fail => format!("FAIL: {path}"),
        Outcome::Error { message } => format!("ERROR: {path} -> {message}"),
    }
}

/// Formats the trailing summary line.
pub fn summary_line(summary: &RunSummary) -> String {
    format!("Summary: {}/{} tests passed", summary.passed, summary.total)
}

/// Runs the whole suite: discovery, per-file execution, result lines, and
/// the summary. Returns the aggregate counts; the only error this function
/// itself can return is a failed directory scan.
pub fn run_suite(config: &RunConfig) -> Result<RunSummary, RillError> {
    let files = discover_check_files(&config.root)?;
    if files.is_empty() {
        println!("No test files found in {}", config.root.display());
        return Ok(RunSummary {
            total: 0,
            passed: 0,
        });
    }

    let mut passed = 0;
    for file in &files {
        let outcome = execute_check_file(&file.path, config.depth_limit);
        println!("{}", outcome_line(file, &outcome));
        if outcome == Outcome::Pass {
            passed += 1;
        }
    }

    let summary = RunSummary {
        total: files.len(),
        passed,
    };
    println!();
    println!("{}", summary_line(&summary));
    Ok(summary)
}
