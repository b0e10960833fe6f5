//! memopeg: packrat parsing of PEG grammars with farthest-failure diagnostics.
//!
//! # Example
//!
//! ```
//! use memopeg_core::GrammarBuilder;
//! use memopeg_core::grammar::dsl::*;
//! use memopeg_lib::Parser;
//!
//! let mut g = GrammarBuilder::<()>::new();
//! let list = g.declare("List");
//! g.define(list, seq([lit("["), star(class("0-9")), lit("]")]));
//! let grammar = g.build().unwrap();
//!
//! let parser = Parser::new(&grammar);
//! assert!(parser.recognize("[12]", list).is_ok());
//!
//! let err = parser.recognize("[12", list).unwrap_err();
//! eprintln!("{}", err);
//! ```

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod diagnostics;
mod parser;


pub use diagnostics::{Diagnostic, Diagnostics, DiagnosticsPrinter, LineCol};
pub use parser::{Parser, diagnose};

pub use memopeg_vm::RuntimeError;

/// Errors that can occur while parsing.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum Error {
    /// The input does not match the start rule.
    #[error("{0}")]
    Syntax(Diagnostics),

    /// Fuel or recursion limit hit, or input too large for the memo.
    #[error(transparent)]
    Runtime(#[from] RuntimeError),
}

impl Error {
    pub fn diagnostics(&self) -> Option<&Diagnostics> {
        match self {
            Error::Syntax(diagnostics) => Some(diagnostics),
            Error::Runtime(_) => None,
        }
    }
}

/// Result type for parse operations.
pub type Result<T> = std::result::Result<T, Error>;
