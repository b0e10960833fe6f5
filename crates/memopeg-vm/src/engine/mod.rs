//! Packrat engine: one memo store, one generic evaluator, four phases.
//!
//! - `recognize`: match/no-match and farthest failure, dense delta memo
//! - `tree`: rowan concrete tree, truncate-on-backtrack child lists
//! - `fail`: expectation tree anchored at the farthest failure
//! - `action`: label bindings threaded into semantic actions
//!
//! Every heavier phase consults the recognition memo before doing any work,
//! so it never attempts a rule the recognizer rejected.

mod action;
mod error;
mod eval;
mod fail;
mod invariants;
mod memo;
mod recognize;
mod session;
mod trace;
mod tree;

#[cfg(test)]
mod memo_tests;
#[cfg(test)]
mod recognize_tests;
#[cfg(test)]
mod reference_tests;
#[cfg(test)]
mod test_grammars;

pub use error::RuntimeError;
pub use fail::Fail;
pub use memo::Recognized;
pub use session::{FuelLimits, Session, SessionBuilder, Stats};
pub use trace::{NoopTracer, PhaseKind, PrintTracer, Tracer, Verbosity};
pub use tree::{SyntaxElement, SyntaxNode, SyntaxToken, TreeKind, TreeLang, dump};
