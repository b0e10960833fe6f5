#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

//! Packrat evaluation engine for memopeg grammars.
//!
//! A `Session` owns the memo tables for one input text and evaluates rules in
//! one of four phases that share them: recognition, tree building,
//! farthest-failure diagnostics, and semantic actions.

pub mod engine;

pub use engine::{
    Fail, FuelLimits, NoopTracer, PhaseKind, PrintTracer, Recognized, RuntimeError, Session,
    SessionBuilder, Stats, SyntaxElement, SyntaxNode, SyntaxToken, Tracer, TreeKind, TreeLang,
    Verbosity, dump,
};
