//! Rill Abstract Syntax Tree
//!
//! Every node carries a byte-offset span into the source text so that
//! diagnostics can point at the exact expression that misbehaved.

/// Half-open byte range into the source text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

/// A parsed Rill expression.
#[derive(Debug, Clone, PartialEq)]
pub enum Expr {
    List(Vec<Expr>, Span),
    Symbol(String, Span),
    String(String, Span),
    Number(f64, Span),
    Bool(bool, Span),
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::List(_, span)
            | Expr::Symbol(_, span)
            | Expr::String(_, span)
            | Expr::Number(_, span)
            | Expr::Bool(_, span) => *span,
        }
    }

    /// Renders the expression back as source text. Used in diagnostics,
    /// notably as the default detail of a failed assertion.
    pub fn pretty(&self) -> String {
        match self {
            Expr::List(items, _) => {
                let inner = items
                    .iter()
                    .map(Expr::pretty)
                    .collect::<Vec<_>>()
                    .join(" ");
                format!("({inner})")
            }
            Expr::Symbol(s, _) => s.clone(),
            Expr::String(s, _) => format!("{s:?}"),
            Expr::Number(n, _) => n.to_string(),
            Expr::Bool(b, _) => b.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pretty_round_trips_simple_forms() {
        let span = Span::default();
        let expr = Expr::List(
            vec![
                Expr::Symbol("eq?".to_string(), span),
                Expr::Number(1.0, span),
                Expr::String("one".to_string(), span),
            ],
            span,
        );
        assert_eq!(expr.pretty(), "(eq? 1 \"one\")");
    }
}
