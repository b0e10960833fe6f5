//! Values flowing between Tinytalk's semantic actions.

use serde::Serialize;

use memopeg_core::{Span, Value};

use super::ast::{Def, Expr, File, Ident, Sig, Stmt};

/// Result of any Tinytalk rule.
///
/// `Text`, `List` and `None` are what the engine builds for productions
/// without an action; the rest are built by actions.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub enum Node {
    Text(String, Span),
    List(Vec<Node>),
    None,
    Ident(Ident),
    Expr(Expr),
    Stmt(Stmt),
    Stmts(Vec<Stmt>),
    Sig(Sig),
    Def(Def),
    File(File),
}

impl Value for Node {
    fn text(text: &str, span: Span) -> Self {
        Node::Text(text.to_string(), span)
    }

    fn list(items: Vec<Self>) -> Self {
        Node::List(items)
    }

    fn none() -> Self {
        Node::None
    }
}

impl Node {
    /// Identifiers are expressions too.
    pub fn into_expr(self) -> Option<Expr> {
        match self {
            Node::Expr(expr) => Some(expr),
            Node::Ident(ident) => Some(Expr::Ident(ident)),
            _ => None,
        }
    }

    pub fn into_ident(self) -> Option<Ident> {
        match self {
            Node::Ident(ident) => Some(ident),
            Node::Expr(Expr::Ident(ident)) => Some(ident),
            _ => None,
        }
    }

    pub fn into_text(self) -> Option<(String, Span)> {
        match self {
            Node::Text(text, span) => Some((text, span)),
            _ => None,
        }
    }

    pub fn into_stmt(self) -> Option<Stmt> {
        match self {
            Node::Stmt(stmt) => Some(stmt),
            _ => None,
        }
    }

    pub fn into_stmts(self) -> Option<Vec<Stmt>> {
        match self {
            Node::Stmts(stmts) => Some(stmts),
            _ => None,
        }
    }

    pub fn into_sig(self) -> Option<Sig> {
        match self {
            Node::Sig(sig) => Some(sig),
            _ => None,
        }
    }

    pub fn into_def(self) -> Option<Def> {
        match self {
            Node::Def(def) => Some(def),
            _ => None,
        }
    }

    pub fn into_file(self) -> Option<File> {
        match self {
            Node::File(file) => Some(file),
            _ => None,
        }
    }
}
