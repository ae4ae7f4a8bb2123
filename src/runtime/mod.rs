//! The Rill runtime: values, environments, the evaluator, and the builtin
//! registry. Evaluation is strictly sequential and single-threaded; the
//! check runner creates one fresh [`env::Env`] per script so nothing leaks
//! between files.

pub mod builtins;
pub mod env;
pub mod eval;
pub mod output;
pub mod value;
