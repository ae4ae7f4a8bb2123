//! Surface syntax: the pest grammar and the parser that turns source text
//! into [`crate::ast::Expr`] nodes.

pub mod parser;

pub use parser::parse;
