//! The builtin registry: primitive operations available to every script.
//!
//! Builtins receive their arguments already evaluated, plus a context giving
//! access to the output sink and the source text for error reporting. Each
//! builtin has a single clear responsibility; anything more elaborate is
//! written in Rill itself by composing them.

use std::collections::HashMap;

use crate::ast::Span;
use crate::errors::{to_source_span, ErrorKind, RillError, SourceContext};
use crate::runtime::output::OutputSink;
use crate::runtime::value::Value;

/// Context handed to builtins for output and diagnostics.
pub struct BuiltinContext<'a> {
    pub output: &'a mut dyn OutputSink,
    pub source: &'a SourceContext,
}

impl BuiltinContext<'_> {
    fn error(&self, kind: ErrorKind, span: Span) -> RillError {
        RillError::new(kind, self.source, to_source_span(span))
    }
}

pub type BuiltinFn = fn(&[Value], &mut BuiltinContext, Span) -> Result<Value, RillError>;

/// Name-to-function table for builtin dispatch.
pub struct BuiltinRegistry {
    table: HashMap<&'static str, BuiltinFn>,
}

impl BuiltinRegistry {
    /// Registry with the full standard set of builtins.
    pub fn standard() -> Self {
        let mut registry = Self {
            table: HashMap::new(),
        };
        registry.register("+", builtin_add);
        registry.register("-", builtin_sub);
        registry.register("*", builtin_mul);
        registry.register("/", builtin_div);
        registry.register("mod", builtin_mod);
        registry.register("eq?", builtin_eq);
        registry.register("gt?", builtin_gt);
        registry.register("lt?", builtin_lt);
        registry.register("gte?", builtin_gte);
        registry.register("lte?", builtin_lte);
        registry.register("not", builtin_not);
        registry.register("list", builtin_list);
        registry.register("len", builtin_len);
        registry.register("str", builtin_str);
        registry.register("print", builtin_print);
        registry
    }

    pub fn register(&mut self, name: &'static str, f: BuiltinFn) {
        self.table.insert(name, f);
    }

    pub fn get(&self, name: &str) -> Option<BuiltinFn> {
        self.table.get(name).copied()
    }
}

// ============================================================================
// HELPERS
// ============================================================================

fn arity(
    ctx: &BuiltinContext,
    name: &str,
    expected: &str,
    args: &[Value],
    span: Span,
) -> RillError {
    ctx.error(
        ErrorKind::ArityMismatch {
            operation: name.to_string(),
            expected: expected.to_string(),
            actual: args.len(),
        },
        span,
    )
}

fn number(ctx: &BuiltinContext, value: &Value, span: Span) -> Result<f64, RillError> {
    value.as_number().ok_or_else(|| {
        ctx.error(
            ErrorKind::TypeMismatch {
                expected: "Number".to_string(),
                actual: value.type_name().to_string(),
            },
            span,
        )
    })
}

fn boolean(ctx: &BuiltinContext, value: &Value, span: Span) -> Result<bool, RillError> {
    value.as_bool().ok_or_else(|| {
        ctx.error(
            ErrorKind::TypeMismatch {
                expected: "Bool".to_string(),
                actual: value.type_name().to_string(),
            },
            span,
        )
    })
}

fn compare(
    args: &[Value],
    ctx: &mut BuiltinContext,
    span: Span,
    name: &str,
    op: fn(f64, f64) -> bool,
) -> Result<Value, RillError> {
    let [lhs, rhs] = args else {
        return Err(arity(ctx, name, "2", args, span));
    };
    let lhs = number(ctx, lhs, span)?;
    let rhs = number(ctx, rhs, span)?;
    Ok(Value::Bool(op(lhs, rhs)))
}

// ============================================================================
// ARITHMETIC
// ============================================================================

fn builtin_add(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    let mut sum = 0.0;
    for arg in args {
        sum += number(ctx, arg, span)?;
    }
    Ok(Value::Number(sum))
}

fn builtin_sub(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(arity(ctx, "-", "at least 1", args, span));
    };
    let first = number(ctx, first, span)?;
    if rest.is_empty() {
        return Ok(Value::Number(-first));
    }
    let mut result = first;
    for arg in rest {
        result -= number(ctx, arg, span)?;
    }
    Ok(Value::Number(result))
}

fn builtin_mul(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    let mut product = 1.0;
    for arg in args {
        product *= number(ctx, arg, span)?;
    }
    Ok(Value::Number(product))
}

fn builtin_div(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    let Some((first, rest)) = args.split_first() else {
        return Err(arity(ctx, "/", "at least 2", args, span));
    };
    if rest.is_empty() {
        return Err(arity(ctx, "/", "at least 2", args, span));
    }
    let mut result = number(ctx, first, span)?;
    for arg in rest {
        let divisor = number(ctx, arg, span)?;
        if divisor == 0.0 {
            return Err(ctx.error(ErrorKind::DivisionByZero, span));
        }
        result /= divisor;
    }
    Ok(Value::Number(result))
}

fn builtin_mod(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    let [lhs, rhs] = args else {
        return Err(arity(ctx, "mod", "2", args, span));
    };
    let lhs = number(ctx, lhs, span)?;
    let rhs = number(ctx, rhs, span)?;
    if rhs == 0.0 {
        return Err(ctx.error(ErrorKind::DivisionByZero, span));
    }
    Ok(Value::Number(lhs % rhs))
}

// ============================================================================
// PREDICATES
// ============================================================================

fn builtin_eq(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    let [lhs, rhs] = args else {
        return Err(arity(ctx, "eq?", "2", args, span));
    };
    Ok(Value::Bool(lhs == rhs))
}

fn builtin_gt(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    compare(args, ctx, span, "gt?", |a, b| a > b)
}

fn builtin_lt(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    compare(args, ctx, span, "lt?", |a, b| a < b)
}

fn builtin_gte(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    compare(args, ctx, span, "gte?", |a, b| a >= b)
}

fn builtin_lte(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    compare(args, ctx, span, "lte?", |a, b| a <= b)
}

fn builtin_not(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    let [value] = args else {
        return Err(arity(ctx, "not", "1", args, span));
    };
    Ok(Value::Bool(!boolean(ctx, value, span)?))
}

// ============================================================================
// COLLECTIONS AND STRINGS
// ============================================================================

fn builtin_list(args: &[Value], _ctx: &mut BuiltinContext, _span: Span) -> Result<Value, RillError> {
    Ok(Value::List(args.to_vec()))
}

fn builtin_len(args: &[Value], ctx: &mut BuiltinContext, span: Span) -> Result<Value, RillError> {
    let [value] = args else {
        return Err(arity(ctx, "len", "1", args, span));
    };
    match value {
        Value::String(s) => Ok(Value::Number(s.chars().count() as f64)),
        Value::List(items) => Ok(Value::Number(items.len() as f64)),
        other => Err(ctx.error(
            ErrorKind::TypeMismatch {
                expected: "String or List".to_string(),
                actual: other.type_name().to_string(),
            },
            span,
        )),
    }
}

fn builtin_str(args: &[Value], _ctx: &mut BuiltinContext, _span: Span) -> Result<Value, RillError> {
    let mut result = String::new();
    for arg in args {
        result.push_str(&arg.to_string());
    }
    Ok(Value::String(result))
}

fn builtin_print(args: &[Value], ctx: &mut BuiltinContext, _span: Span) -> Result<Value, RillError> {
    let text = args
        .iter()
        .map(Value::to_string)
        .collect::<Vec<_>>()
        .join(" ");
    ctx.output.emit(&text);
    Ok(Value::Nil)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::runtime::output::OutputBuffer;

    fn call(name: &str, args: &[Value]) -> Result<Value, RillError> {
        let source = SourceContext::from_file("test", "");
        let mut buffer = OutputBuffer::new();
        let mut ctx = BuiltinContext {
            output: &mut buffer,
            source: &source,
        };
        let f = BuiltinRegistry::standard().get(name).expect("unknown builtin");
        f(args, &mut ctx, Span::default())
    }

    #[test]
    fn arithmetic_folds_left() {
        assert_eq!(
            call("-", &[Value::Number(10.0), Value::Number(3.0), Value::Number(2.0)]).unwrap(),
            Value::Number(5.0)
        );
        assert_eq!(call("-", &[Value::Number(4.0)]).unwrap(), Value::Number(-4.0));
        assert_eq!(call("+", &[]).unwrap(), Value::Number(0.0));
    }

    #[test]
    fn division_by_zero_is_its_own_kind() {
        let err = call("/", &[Value::Number(1.0), Value::Number(0.0)]).unwrap_err();
        assert_eq!(err.kind, ErrorKind::DivisionByZero);
    }

    #[test]
    fn eq_compares_structurally() {
        assert_eq!(
            call("eq?", &[Value::Number(2.0), Value::Number(2.0)]).unwrap(),
            Value::Bool(true)
        );
        assert_eq!(
            call(
                "eq?",
                &[Value::String("a".into()), Value::String("b".into())]
            )
            .unwrap(),
            Value::Bool(false)
        );
    }

    #[test]
    fn len_rejects_numbers() {
        let err = call("len", &[Value::Number(1.0)]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    }

    #[test]
    fn comparison_requires_numbers() {
        let err = call("gt?", &[Value::Bool(true), Value::Number(1.0)]).unwrap_err();
        assert!(matches!(err.kind, ErrorKind::TypeMismatch { .. }));
    }
}
