//! Grammars written against the memopeg engine.
//!
//! - [`tinytalk`]: a small Smalltalk-flavoured message language with a typed AST

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod tinytalk;
