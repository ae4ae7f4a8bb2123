pub mod ast;
pub mod cli;
pub mod errors;
pub mod runner;
pub mod runtime;
pub mod syntax;

pub use crate::ast::{Expr, Span};
pub use crate::errors::{ErrorCategory, ErrorKind, RillError, SourceContext};
pub use crate::runtime::value::Value;
