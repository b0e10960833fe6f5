//! Constructors for writing rule tables by hand.
//!
//! `use memopeg_core::grammar::dsl::*;` and compose:
//! `seq([rule(ws), lit("["), opt(label("body", rule(stmts))), lit("]")])`.

use crate::{CharClass, Env};

use super::{Literal, Production, RuleId};

pub fn lit<V>(text: &str) -> Production<V> {
    Production::Literal(Literal::new(text))
}

/// Character class in bracket notation without brackets, e.g. `class("a-z_")`.
pub fn class<V>(spec: &str) -> Production<V> {
    Production::Class(CharClass::new(spec))
}

pub fn not_class<V>(spec: &str) -> Production<V> {
    Production::Class(CharClass::negated(spec))
}

pub fn any<V>() -> Production<V> {
    Production::Any
}

/// Matches the empty string.
pub fn eps<V>() -> Production<V> {
    Production::Seq(Vec::new())
}

pub fn seq<V>(items: impl IntoIterator<Item = Production<V>>) -> Production<V> {
    Production::Seq(items.into_iter().collect())
}

pub fn choice<V>(alts: impl IntoIterator<Item = Production<V>>) -> Production<V> {
    Production::Choice(alts.into_iter().collect())
}

pub fn star<V>(p: Production<V>) -> Production<V> {
    Production::Star(Box::new(p))
}

pub fn plus<V>(p: Production<V>) -> Production<V> {
    Production::Plus(Box::new(p))
}

pub fn opt<V>(p: Production<V>) -> Production<V> {
    Production::Opt(Box::new(p))
}

pub fn pos<V>(p: Production<V>) -> Production<V> {
    Production::Pos(Box::new(p))
}

pub fn neg<V>(p: Production<V>) -> Production<V> {
    Production::Neg(Box::new(p))
}

pub fn label<V>(name: &'static str, p: Production<V>) -> Production<V> {
    Production::Label(name, Box::new(p))
}

pub fn rule<V>(id: RuleId) -> Production<V> {
    Production::Ref(id)
}

pub fn action<V, F>(p: Production<V>, f: F) -> Production<V>
where
    F: Fn(&mut Env<'_, V>) -> V + Send + Sync + 'static,
{
    Production::Action(Box::new(p), Box::new(f))
}
