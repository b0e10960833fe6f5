//! Invariant checks excluded from coverage reports.
//!
//! Each rule's action knows which node kinds its labels carry. A mismatch
//! means the rule table is wrong, not the input.

#![cfg_attr(coverage_nightly, coverage(off))]

use super::ast::{Def, Expr, File, Ident, Sig, Stmt};
use super::value::Node;

fn broken(rule: &str, label: &str, want: &str, got: &Option<Node>) -> ! {
    panic!("broken grammar invariant in {rule}: label `{label}` should hold {want}, got {got:?}")
}

macro_rules! expect_fn {
    ($name:ident, $into:ident, $ty:ty, $want:literal) => {
        #[inline]
        pub(super) fn $name(rule: &str, label: &str, node: Option<Node>) -> $ty {
            match node.clone().and_then(Node::$into) {
                Some(value) => value,
                None => broken(rule, label, $want, &node),
            }
        }
    };
}

expect_fn!(expect_expr, into_expr, Expr, "an expression");
expect_fn!(expect_ident, into_ident, Ident, "an identifier");
expect_fn!(expect_text, into_text, (String, memopeg_core::Span), "token text");
expect_fn!(expect_stmt, into_stmt, Stmt, "a statement");
expect_fn!(expect_stmts, into_stmts, Vec<Stmt>, "a statement list");
expect_fn!(expect_sig, into_sig, Sig, "a signature");
expect_fn!(expect_def, into_def, Def, "a definition");
expect_fn!(expect_file, into_file, File, "a file");

pub(super) fn char_literal(text: &str) -> char {
    match text.chars().nth(1) {
        Some(ch) => ch,
        None => panic!("character literal `{text}` has no character after `$`"),
    }
}

pub(super) fn grammar_builds(
    built: Result<memopeg_core::Grammar<Node>, memopeg_core::GrammarError>,
) -> memopeg_core::Grammar<Node> {
    match built {
        Ok(grammar) => grammar,
        Err(err) => panic!("Tinytalk grammar is invalid: {err}"),
    }
}
