//! Typed Tinytalk syntax tree.
//!
//! Every span indexes the master document (see `ParseContext::base_offset`).
//! Leaf spans cover the token only, never the whitespace before it.

use serde::Serialize;

use memopeg_core::Span;

/// Module used when neither the source nor the context names one.
pub const DEFAULT_MODULE: &str = "main";

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct File {
    pub module: String,
    pub defs: Vec<Def>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Def {
    Method(Method),
    Val(Val),
}

/// `method #mod sel: a with: b [ body ]`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Method {
    pub module: String,
    pub selector: String,
    pub params: Vec<Ident>,
    pub body: Vec<Stmt>,
    pub span: Span,
}

/// `val #mod name := expr.`
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Val {
    pub module: String,
    pub name: Ident,
    pub value: Expr,
    pub span: Span,
}

/// Method signature: selector plus parameter names.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Sig {
    pub selector: String,
    pub params: Vec<Ident>,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Stmt {
    Return(Expr),
    Assign { target: Ident, value: Expr },
    Expr(Expr),
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Expr {
    Call(Call),
    Ident(Ident),
    /// Decimal digits as written; see [`Expr::int_value`].
    Int { digits: String, span: Span },
    Float { text: String, span: Span },
    /// Contents with `''` already unescaped.
    Str { value: String, span: Span },
    Char { value: char, span: Span },
    Block {
        params: Vec<Ident>,
        body: Vec<Stmt>,
        span: Span,
    },
    Array { items: Vec<Expr>, span: Span },
    /// Parenthesized expression; the span includes the parentheses.
    Paren { expr: Box<Expr>, span: Span },
}

impl Expr {
    pub fn span(&self) -> Span {
        match self {
            Expr::Call(call) => call.span,
            Expr::Ident(ident) => ident.span,
            Expr::Int { span, .. }
            | Expr::Float { span, .. }
            | Expr::Str { span, .. }
            | Expr::Char { span, .. }
            | Expr::Block { span, .. }
            | Expr::Array { span, .. }
            | Expr::Paren { span, .. } => *span,
        }
    }

    /// `None` for non-integers and for literals that overflow `i64`.
    pub fn int_value(&self) -> Option<i64> {
        match self {
            Expr::Int { digits, .. } => digits.parse().ok(),
            _ => None,
        }
    }

    pub fn as_call(&self) -> Option<&Call> {
        match self {
            Expr::Call(call) => Some(call),
            _ => None,
        }
    }

    pub fn as_ident(&self) -> Option<&Ident> {
        match self {
            Expr::Ident(ident) => Some(ident),
            _ => None,
        }
    }
}

/// Message send. Unary and binary chains fold left:
/// `a + b * c` is `(a + b) * c`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Call {
    /// Absent for a keyword message with no receiver, e.g. `foo: 1 bar: 2`.
    pub recv: Option<Box<Expr>>,
    pub selector: String,
    pub args: Vec<Expr>,
    pub span: Span,
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Ident {
    pub name: String,
    pub span: Span,
}

impl Ident {
    pub fn new(name: impl Into<String>, span: Span) -> Self {
        Self {
            name: name.into(),
            span,
        }
    }
}
