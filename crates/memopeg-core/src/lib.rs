#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Core data structures for memopeg.
//!
//! Three layers, leaves first:
//! - **Input**: `Cursor` decodes code points from an immutable byte buffer, `Span` addresses it
//! - **Productions**: the closed set of PEG production kinds, composed into rules
//! - **Grammar**: an ID-indexed rule table built and validated by `GrammarBuilder`
//!
//! Semantic values flow through the `Value` trait and the `Env` handed to action closures.
//! Evaluation itself lives in `memopeg-vm`.

mod colors;
mod context;
mod cursor;
mod span;
mod value;

pub mod grammar;

#[cfg(test)]
mod span_tests;

pub use colors::Colors;
pub use context::ParseContext;
pub use cursor::{Cursor, Scalar};
pub use grammar::{
    ActionFn, CharClass, Grammar, GrammarBuilder, GrammarError, Literal, Production, Rule, RuleId,
};
pub use span::Span;
pub use value::{Env, Value};
