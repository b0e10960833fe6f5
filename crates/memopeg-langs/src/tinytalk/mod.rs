//! Tinytalk: keyword, binary and unary message sends with blocks, arrays and
//! top-level `method`/`val` definitions.
//!
//! ```text
//! method #geo area [ ^width * height ]
//! val origin := Point x: 0 y: 0.
//! ```
//!
//! Parsing runs the memoized recognizer first; actions then build the typed
//! AST in [`ast`], each at most once per (offset, rule).

pub mod ast;
mod grammar;
mod invariants;
mod value;


use memopeg_core::ParseContext;
use memopeg_lib::{Parser, Result};
use memopeg_vm::SyntaxNode;

pub use ast::{Call, DEFAULT_MODULE, Def, Expr, File, Ident, Method, Sig, Stmt, Val};
pub use grammar::{Start, Tinytalk, tinytalk};
pub use value::Node;

/// Parse a whole source file.
pub fn parse_file(text: &str, context: ParseContext) -> Result<File> {
    let node = parse_rule(Start::File, text, context)?;
    Ok(invariants::expect_file("File", "root", Some(node)))
}

/// Parse a period-separated statement list, e.g. a method body or a REPL line.
pub fn parse_stmts(text: &str, context: ParseContext) -> Result<Vec<Stmt>> {
    let node = parse_rule(Start::Stmts, text, context)?;
    Ok(invariants::expect_stmts("Stmts", "root", Some(node)))
}

/// Parse `text` as exactly one `start` construct.
///
/// Together with `ParseContext::base_offset` this re-parses a slice of a
/// larger document: spans in the result index the larger document.
pub fn parse_rule(start: Start, text: &str, context: ParseContext) -> Result<Node> {
    let tt = tinytalk();
    Parser::new(tt.grammar())
        .context(context)
        .parse(text, tt.rule(start))
}

/// Lossless concrete tree of `text` as one `start` construct.
pub fn syntax_tree(start: Start, text: &str) -> Result<SyntaxNode> {
    let tt = tinytalk();
    Parser::new(tt.grammar()).tree(text, tt.rule(start))
}
