//! Rill Parser
//!
//! Converts source text into AST nodes with byte-span tracking. The parser
//! is purely syntactic: special forms like `assert` or `let` are ordinary
//! lists here and only gain meaning during evaluation.

use pest::{error::Error, iterators::Pair, Parser};
use pest_derive::Parser;

use crate::ast::{Expr, Span};
use crate::errors::{to_source_span, ErrorKind, RillError, SourceContext};

#[derive(Parser)]
#[grammar = "syntax/grammar.pest"]
struct RillParser;

// ============================================================================
// PUBLIC API
// ============================================================================

/// Parse Rill source text into a sequence of top-level expressions.
pub fn parse(source_text: &str, source_context: &SourceContext) -> Result<Vec<Expr>, RillError> {
    if source_text.trim().is_empty() {
        return Ok(vec![]);
    }

    let pairs = RillParser::parse(Rule::program, source_text)
        .map_err(|e| convert_parse_error(e, source_context))?;

    let program = pairs.peek().expect("pest guarantees the program rule");

    program
        .into_inner()
        .filter(|p| p.as_rule() != Rule::EOI)
        .map(|p| build_expr(p, source_context))
        .collect()
}

// ============================================================================
// AST BUILDERS
// ============================================================================

fn build_expr(pair: Pair<Rule>, source: &SourceContext) -> Result<Expr, RillError> {
    let span = get_span(&pair);

    match pair.as_rule() {
        Rule::expr | Rule::atom => {
            let inner = pair.into_inner().next().expect("grammar guarantees inner");
            build_expr(inner, source)
        }

        Rule::list => {
            let children: Result<Vec<_>, _> = pair
                .into_inner()
                .map(|p| build_expr(p, source))
                .collect();
            Ok(Expr::List(children?, span))
        }

        Rule::number => {
            let text = pair.as_str();
            let value = text.parse::<f64>().map_err(|_| {
                make_error(
                    source,
                    ErrorKind::InvalidLiteral {
                        literal_type: "number".into(),
                        value: text.into(),
                    },
                    span,
                )
            })?;
            Ok(Expr::Number(value, span))
        }

        Rule::boolean => {
            let value = match pair.as_str() {
                "true" => true,
                "false" => false,
                text => {
                    return Err(make_error(
                        source,
                        ErrorKind::InvalidLiteral {
                            literal_type: "boolean".into(),
                            value: text.into(),
                        },
                        span,
                    ))
                }
            };
            Ok(Expr::Bool(value, span))
        }

        Rule::string => Ok(Expr::String(unescape_string(pair.as_str()), span)),

        Rule::symbol => Ok(Expr::Symbol(pair.as_str().to_string(), span)),

        rule => Err(make_error(
            source,
            ErrorKind::Syntax {
                message: format!("unsupported rule: {rule:?}"),
            },
            span,
        )),
    }
}

// ============================================================================
// UTILITIES
// ============================================================================

fn get_span(pair: &Pair<Rule>) -> Span {
    Span {
        start: pair.as_span().start(),
        end: pair.as_span().end(),
    }
}

fn unescape_string(text: &str) -> String {
    // Strip the surrounding quotes; the grammar guarantees they exist.
    let inner = &text[1..text.len() - 1];
    let mut result = String::with_capacity(inner.len());
    let mut chars = inner.chars();

    while let Some(ch) = chars.next() {
        if ch == '\\' {
            match chars.next() {
                Some('n') => result.push('\n'),
                Some('t') => result.push('\t'),
                Some('\\') => result.push('\\'),
                Some('"') => result.push('"'),
                Some(other) => {
                    result.push('\\');
                    result.push(other);
                }
                None => result.push('\\'),
            }
        } else {
            result.push(ch);
        }
    }

    result
}

// ============================================================================
// ERROR HANDLING
// ============================================================================

fn make_error(source: &SourceContext, kind: ErrorKind, span: Span) -> RillError {
    RillError::new(kind, source, to_source_span(span))
}

fn convert_parse_error(error: Error<Rule>, source: &SourceContext) -> RillError {
    let span = match error.location {
        pest::error::InputLocation::Pos(pos) => Span {
            start: pos,
            end: pos,
        },
        pest::error::InputLocation::Span((start, end)) => Span { start, end },
    };

    make_error(
        source,
        ErrorKind::Syntax {
            message: error.variant.message().to_string(),
        },
        span,
    )
    .with_help("expected an expression: a list, number, string, boolean, or symbol")
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse_one(input: &str) -> Expr {
        let ctx = SourceContext::from_file("test", input);
        let mut nodes = parse(input, &ctx).expect("parse failed");
        assert_eq!(nodes.len(), 1);
        nodes.pop().unwrap()
    }

    #[test]
    fn empty_input_parses_to_empty_program() {
        let ctx = SourceContext::from_file("test", "");
        assert!(parse("", &ctx).unwrap().is_empty());
    }

    #[test]
    fn comment_only_input_parses_to_empty_program() {
        let input = "; nothing to see here\n";
        let ctx = SourceContext::from_file("test", input);
        assert!(parse(input, &ctx).unwrap().is_empty());
    }

    #[test]
    fn parses_literals() {
        assert!(matches!(parse_one("42"), Expr::Number(n, _) if n == 42.0));
        assert!(matches!(parse_one("-3.5"), Expr::Number(n, _) if n == -3.5));
        assert!(matches!(parse_one("true"), Expr::Bool(true, _)));
        assert!(matches!(parse_one("false"), Expr::Bool(false, _)));
        assert!(matches!(parse_one("main?"), Expr::Symbol(s, _) if s == "main?"));
    }

    #[test]
    fn parses_strings_with_escapes() {
        let Expr::String(s, _) = parse_one(r#""line\none\ttab \"quoted\"""#) else {
            panic!("expected string");
        };
        assert_eq!(s, "line\none\ttab \"quoted\"");
    }

    #[test]
    fn parses_nested_lists_with_spans() {
        let input = "(eq? (+ 1 2) 3)";
        let expr = parse_one(input);
        let Expr::List(items, span) = &expr else {
            panic!("expected list");
        };
        assert_eq!(items.len(), 3);
        assert_eq!((span.start, span.end), (0, input.len()));
        assert!(matches!(&items[1], Expr::List(inner, _) if inner.len() == 3));
    }

    #[test]
    fn bare_minus_is_a_symbol() {
        assert!(matches!(parse_one("-"), Expr::Symbol(s, _) if s == "-"));
    }

    #[test]
    fn unmatched_paren_is_a_parse_error() {
        let input = "(assert true";
        let ctx = SourceContext::from_file("test", input);
        let err = parse(input, &ctx).unwrap_err();
        assert_eq!(err.category(), crate::errors::ErrorCategory::Parse);
    }

    #[test]
    fn multiple_top_level_forms() {
        let input = "(define x 1)\n(assert (eq? x 1))";
        let ctx = SourceContext::from_file("test", input);
        assert_eq!(parse(input, &ctx).unwrap().len(), 2);
    }
}
