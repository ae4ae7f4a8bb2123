//! The Rill evaluator.
//!
//! A tree-walking interpreter over [`Expr`]. Special forms are dispatched by
//! head symbol before builtin lookup; everything else is eager: arguments
//! are evaluated left to right and handed to the builtin as values.
//!
//! `assert` is the form the check runner is built around: it evaluates its
//! condition, demands a `Bool`, and raises an assertion-failure error when
//! the condition is false. That error kind is what separates FAIL from
//! ERROR at the runner boundary.

use crate::ast::{Expr, Span};
use crate::errors::{to_source_span, ErrorKind, RillError, SourceContext};
use crate::runtime::builtins::{BuiltinContext, BuiltinRegistry};
use crate::runtime::env::Env;
use crate::runtime::output::OutputSink;
use crate::runtime::value::Value;

/// Default recursion depth limit. Deep enough for any sane check script,
/// shallow enough to turn runaway nesting into a clean error.
pub const DEFAULT_DEPTH_LIMIT: usize = 256;

/// Everything a single evaluation needs: the environment, the output sink,
/// the source text for diagnostics, and the builtin table.
pub struct EvalContext<'o> {
    pub env: Env,
    pub output: &'o mut dyn OutputSink,
    pub source: SourceContext,
    pub builtins: BuiltinRegistry,
    pub max_depth: usize,
}

impl<'o> EvalContext<'o> {
    pub fn new(env: Env, output: &'o mut dyn OutputSink, source: SourceContext) -> Self {
        Self {
            env,
            output,
            source,
            builtins: BuiltinRegistry::standard(),
            max_depth: DEFAULT_DEPTH_LIMIT,
        }
    }

    pub fn with_depth_limit(mut self, max_depth: usize) -> Self {
        self.max_depth = max_depth;
        self
    }

    fn error(&self, kind: ErrorKind, span: Span) -> RillError {
        RillError::new(kind, &self.source, to_source_span(span))
    }

    fn malformed(&self, form: &str, reason: &str, span: Span) -> RillError {
        self.error(
            ErrorKind::MalformedForm {
                form: form.to_string(),
                reason: reason.to_string(),
            },
            span,
        )
    }
}

/// Evaluates top-level forms in order, returning the value of the last one.
/// An empty program evaluates to `Nil`.
pub fn eval_program(ctx: &mut EvalContext, program: &[Expr]) -> Result<Value, RillError> {
    let mut last = Value::Nil;
    for expr in program {
        last = eval_expr(ctx, expr, 0)?;
    }
    Ok(last)
}

fn eval_expr(ctx: &mut EvalContext, expr: &Expr, depth: usize) -> Result<Value, RillError> {
    if depth > ctx.max_depth {
        return Err(ctx.error(
            ErrorKind::RecursionLimit {
                limit: ctx.max_depth,
            },
            expr.span(),
        ));
    }

    match expr {
        Expr::Number(n, _) => Ok(Value::Number(*n)),
        Expr::Bool(b, _) => Ok(Value::Bool(*b)),
        Expr::String(s, _) => Ok(Value::String(s.clone())),
        Expr::Symbol(name, span) => ctx.env.lookup(name).cloned().ok_or_else(|| {
            ctx.error(
                ErrorKind::UndefinedSymbol {
                    symbol: name.clone(),
                },
                *span,
            )
        }),
        Expr::List(items, span) => eval_call(ctx, items, *span, depth),
    }
}

fn eval_call(
    ctx: &mut EvalContext,
    items: &[Expr],
    span: Span,
    depth: usize,
) -> Result<Value, RillError> {
    let Some(head) = items.first() else {
        return Ok(Value::List(vec![]));
    };
    let Expr::Symbol(name, head_span) = head else {
        return Err(ctx.error(
            ErrorKind::NotCallable {
                found: head.pretty(),
            },
            head.span(),
        ));
    };
    let args = &items[1..];

    match name.as_str() {
        "if" => eval_if(ctx, args, span, depth),
        "when" => eval_when(ctx, args, span, depth),
        "do" => eval_sequence(ctx, args, depth),
        "let" => eval_let(ctx, args, span, depth),
        "define" => eval_define(ctx, args, span, depth),
        "and" => eval_logic(ctx, args, depth, true),
        "or" => eval_logic(ctx, args, depth, false),
        "assert" => eval_assert(ctx, args, span, depth),
        _ => {
            let Some(builtin) = ctx.builtins.get(name) else {
                return Err(ctx.error(
                    ErrorKind::UndefinedSymbol {
                        symbol: name.clone(),
                    },
                    *head_span,
                ));
            };
            let mut values = Vec::with_capacity(args.len());
            for arg in args {
                values.push(eval_expr(ctx, arg, depth + 1)?);
            }
            let mut builtin_ctx = BuiltinContext {
                output: &mut *ctx.output,
                source: &ctx.source,
            };
            builtin(&values, &mut builtin_ctx, span)
        }
    }
}

// ============================================================================
// SPECIAL FORMS
// ============================================================================

/// Evaluates a condition expression that must produce a `Bool`.
fn eval_condition(ctx: &mut EvalContext, expr: &Expr, depth: usize) -> Result<bool, RillError> {
    let value = eval_expr(ctx, expr, depth)?;
    value.as_bool().ok_or_else(|| {
        ctx.error(
            ErrorKind::TypeMismatch {
                expected: "Bool".to_string(),
                actual: value.type_name().to_string(),
            },
            expr.span(),
        )
    })
}

fn eval_if(
    ctx: &mut EvalContext,
    args: &[Expr],
    span: Span,
    depth: usize,
) -> Result<Value, RillError> {
    if args.len() < 2 || args.len() > 3 {
        return Err(ctx.malformed("if", "expected a condition, a then-branch, and an optional else-branch", span));
    }
    if eval_condition(ctx, &args[0], depth + 1)? {
        eval_expr(ctx, &args[1], depth + 1)
    } else if let Some(else_branch) = args.get(2) {
        eval_expr(ctx, else_branch, depth + 1)
    } else {
        Ok(Value::Nil)
    }
}

fn eval_when(
    ctx: &mut EvalContext,
    args: &[Expr],
    span: Span,
    depth: usize,
) -> Result<Value, RillError> {
    let Some((condition, body)) = args.split_first() else {
        return Err(ctx.malformed("when", "expected a condition", span));
    };
    if eval_condition(ctx, condition, depth + 1)? {
        eval_sequence(ctx, body, depth)
    } else {
        Ok(Value::Nil)
    }
}

fn eval_sequence(ctx: &mut EvalContext, body: &[Expr], depth: usize) -> Result<Value, RillError> {
    let mut last = Value::Nil;
    for expr in body {
        last = eval_expr(ctx, expr, depth + 1)?;
    }
    Ok(last)
}

/// `(let ((name expr) ...) body...)`. Bindings are evaluated sequentially,
/// each visible to the next; the body's bindings vanish afterwards.
fn eval_let(
    ctx: &mut EvalContext,
    args: &[Expr],
    span: Span,
    depth: usize,
) -> Result<Value, RillError> {
    let Some((bindings, body)) = args.split_first() else {
        return Err(ctx.malformed("let", "expected a bindings list", span));
    };
    let Expr::List(pairs, _) = bindings else {
        return Err(ctx.malformed("let", "bindings must be a list of (name value) pairs", bindings.span()));
    };

    let saved = ctx.env.clone();
    let result = eval_let_body(ctx, pairs, body, depth);
    ctx.env = saved;
    result
}

fn eval_let_body(
    ctx: &mut EvalContext,
    pairs: &[Expr],
    body: &[Expr],
    depth: usize,
) -> Result<Value, RillError> {
    for pair in pairs {
        let Expr::List(binding, _) = pair else {
            return Err(ctx.malformed("let", "bindings must be a list of (name value) pairs", pair.span()));
        };
        let [Expr::Symbol(name, _), value_expr] = binding.as_slice() else {
            return Err(ctx.malformed("let", "each binding needs a symbol and one value", pair.span()));
        };
        let value = eval_expr(ctx, value_expr, depth + 1)?;
        ctx.env.define(name.clone(), value);
    }
    eval_sequence(ctx, body, depth)
}

/// `(define name expr)`. Binds at the file's top-level scope and returns `Nil`.
fn eval_define(
    ctx: &mut EvalContext,
    args: &[Expr],
    span: Span,
    depth: usize,
) -> Result<Value, RillError> {
    let [name_expr, value_expr] = args else {
        return Err(ctx.malformed("define", "expected a name and one value", span));
    };
    let Expr::Symbol(name, _) = name_expr else {
        return Err(ctx.malformed("define", "name must be a symbol", name_expr.span()));
    };
    let value = eval_expr(ctx, value_expr, depth + 1)?;
    ctx.env.define(name.clone(), value);
    Ok(Value::Nil)
}

fn eval_logic(
    ctx: &mut EvalContext,
    args: &[Expr],
    depth: usize,
    is_and: bool,
) -> Result<Value, RillError> {
    for arg in args {
        let holds = eval_condition(ctx, arg, depth + 1)?;
        if holds != is_and {
            return Ok(Value::Bool(holds));
        }
    }
    Ok(Value::Bool(is_and))
}

/// `(assert condition)` or `(assert condition detail)`. The condition must
/// evaluate to a `Bool`; a false condition raises the assertion-failure
/// error kind carrying either the evaluated detail or the pretty-printed
/// condition.
fn eval_assert(
    ctx: &mut EvalContext,
    args: &[Expr],
    span: Span,
    depth: usize,
) -> Result<Value, RillError> {
    if args.is_empty() || args.len() > 2 {
        return Err(ctx.error(
            ErrorKind::ArityMismatch {
                operation: "assert".to_string(),
                expected: "1 or 2".to_string(),
                actual: args.len(),
            },
            span,
        ));
    }

    let condition = &args[0];
    if eval_condition(ctx, condition, depth + 1)? {
        return Ok(Value::Nil);
    }

    let detail = match args.get(1) {
        Some(detail_expr) => eval_expr(ctx, detail_expr, depth + 1)?.to_string(),
        None => condition.pretty(),
    };
    Err(ctx.error(ErrorKind::AssertionFailure { detail }, span))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::output::OutputBuffer;
    use crate::syntax::parse;

    fn eval_source(input: &str) -> (Result<Value, RillError>, String) {
        let source = SourceContext::from_file("test.rill", input);
        let mut buffer = OutputBuffer::new();
        let result = parse(input, &source).and_then(|program| {
            let mut ctx = EvalContext::new(Env::entry_point(), &mut buffer, source.clone());
            eval_program(&mut ctx, &program)
        });
        (result, buffer.as_str().to_string())
    }

    fn eval_value(input: &str) -> Value {
        eval_source(input).0.expect("evaluation failed")
    }

    fn eval_err(input: &str) -> RillError {
        eval_source(input).0.expect_err("expected an error")
    }

    #[test]
    fn literals_evaluate_to_themselves() {
        assert_eq!(eval_value("42"), Value::Number(42.0));
        assert_eq!(eval_value("\"hi\""), Value::String("hi".to_string()));
        assert_eq!(eval_value("true"), Value::Bool(true));
        assert_eq!(eval_value("nil"), Value::Nil);
    }

    #[test]
    fn arithmetic_and_nesting() {
        assert_eq!(eval_value("(+ 1 (* 2 3))"), Value::Number(7.0));
        assert_eq!(eval_value("(mod 7 4)"), Value::Number(3.0));
    }

    #[test]
    fn passing_assert_returns_nil() {
        assert_eq!(eval_value("(assert true)"), Value::Nil);
        assert_eq!(eval_value("(assert (eq? (+ 1 1) 2))"), Value::Nil);
    }

    #[test]
    fn failing_assert_raises_assertion_failure() {
        let err = eval_err("(assert false)");
        assert!(err.is_assertion_failure());
        assert_eq!(err.to_string(), "Assertion failed: false");
    }

    #[test]
    fn failing_assert_with_detail() {
        let err = eval_err("(assert (eq? 1 2) \"ones are not twos\")");
        assert!(err.is_assertion_failure());
        assert_eq!(err.to_string(), "Assertion failed: ones are not twos");
    }

    #[test]
    fn assert_condition_must_be_bool() {
        let err = eval_err("(assert 1)");
        assert!(!err.is_assertion_failure());
        assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn undefined_symbol_is_not_an_assertion_failure() {
        let err = eval_err("(frobnicate 1)");
        assert!(!err.is_assertion_failure());
        assert_eq!(
            err.to_string(),
            "Evaluation error: undefined symbol 'frobnicate'"
        );
    }

    #[test]
    fn define_persists_across_top_level_forms() {
        assert_eq!(eval_value("(define x 3) (+ x 1)"), Value::Number(4.0));
    }

    #[test]
    fn let_bindings_are_scoped() {
        assert_eq!(
            eval_value("(let ((x 1) (y (+ x 1))) (+ x y))"),
            Value::Number(3.0)
        );
        let err = eval_err("(let ((x 1)) x) x");
        assert!(matches!(err.kind, ErrorKind::UndefinedSymbol { .. }));
    }

    #[test]
    fn entry_point_marker_is_bound() {
        assert_eq!(eval_value("main?"), Value::Bool(true));
        assert_eq!(eval_value("(when main? 99)"), Value::Number(99.0));
    }

    #[test]
    fn and_or_short_circuit() {
        assert_eq!(eval_value("(and true true false)"), Value::Bool(false));
        assert_eq!(eval_value("(or false true)"), Value::Bool(true));
        // The failing assert after the short-circuit point is never reached.
        assert_eq!(
            eval_value("(or true (do (assert false) true))"),
            Value::Bool(true)
        );
    }

    #[test]
    fn print_goes_through_the_sink() {
        let (result, printed) = eval_source("(print \"checking\" 1 2)");
        assert_eq!(result.unwrap(), Value::Nil);
        assert_eq!(printed, "checking 1 2");
    }

    #[test]
    fn empty_call_is_an_empty_list() {
        assert_eq!(eval_value("()"), Value::List(vec![]));
    }

    #[test]
    fn non_symbol_head_is_not_callable() {
        let err = eval_err("(1 2 3)");
        assert!(matches!(err.kind, ErrorKind::NotCallable { .. }));
    }

    #[test]
    fn deep_nesting_hits_the_depth_limit() {
        let mut program = String::new();
        for _ in 0..DEFAULT_DEPTH_LIMIT + 8 {
            program.push_str("(+ 1 ");
        }
        program.push('1');
        for _ in 0..DEFAULT_DEPTH_LIMIT + 8 {
            program.push(')');
        }
        let err = eval_err(&program);
        assert!(matches!(err.kind, ErrorKind::RecursionLimit { .. }));
    }
}
