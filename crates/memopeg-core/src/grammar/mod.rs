//! Grammar types: productions, rules, and the rule table.
//!
//! A grammar is built in two steps so rules can reference each other before
//! they are defined:
//!
//! ```
//! use memopeg_core::GrammarBuilder;
//! use memopeg_core::grammar::dsl::*;
//!
//! let mut g = GrammarBuilder::<()>::new();
//! let list = g.declare("List");
//! let item = g.declare("Item");
//! g.define(list, seq([lit("("), star(rule(item)), lit(")")]));
//! g.define(item, choice([plus(class("0-9")), rule(list)]));
//! let grammar = g.build().unwrap();
//! assert_eq!(grammar.len(), 2);
//! ```

mod analysis;
mod builder;
mod class;
mod production;

pub mod dsl;


pub use builder::{GrammarBuilder, RuleHandle};
pub use class::CharClass;
pub use production::{ActionFn, Literal, Production};

use indexmap::IndexMap;

/// Dense rule index. Also the raw tree-node kind of the rule.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct RuleId(u16);

impl RuleId {
    #[inline]
    pub const fn new(raw: u16) -> Self {
        Self(raw)
    }

    #[inline]
    pub const fn raw(self) -> u16 {
        self.0
    }

    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

/// Errors detected while building a grammar.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GrammarError {
    #[error("rule `{0}` is defined more than once")]
    DuplicateRule(&'static str),

    #[error("rule `{0}` is declared but never defined")]
    UndefinedRule(&'static str),

    #[error("rule id {0} does not belong to this grammar")]
    UnknownRuleId(u16),

    #[error("left recursion: {}", .0.join(" -> "))]
    LeftRecursion(Vec<&'static str>),

    #[error("grammar has more than {} rules", u16::MAX)]
    TooManyRules,
}

/// One named rule.
pub struct Rule<V> {
    pub(crate) id: RuleId,
    pub(crate) name: &'static str,
    /// Display name used in "expected ..." diagnostics.
    pub(crate) expected: Option<&'static str>,
    /// Lexical rule: atomic in trees, internal failures hidden on success.
    pub(crate) token: bool,
    pub(crate) production: Production<V>,
}

impl<V> Rule<V> {
    pub fn id(&self) -> RuleId {
        self.id
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn expected(&self) -> Option<&'static str> {
        self.expected
    }

    /// What a diagnostic calls this rule.
    pub fn display_name(&self) -> &'static str {
        self.expected.unwrap_or(self.name)
    }

    pub fn is_token(&self) -> bool {
        self.token
    }

    pub fn production(&self) -> &Production<V> {
        &self.production
    }
}

impl<V> std::fmt::Debug for Rule<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Rule")
            .field("id", &self.id)
            .field("name", &self.name)
            .field("expected", &self.expected)
            .field("token", &self.token)
            .field("production", &self.production)
            .finish()
    }
}

/// Validated, immutable rule table.
pub struct Grammar<V> {
    rules: Vec<Rule<V>>,
    names: IndexMap<&'static str, RuleId>,
}

impl<V> Grammar<V> {
    pub(crate) fn from_parts(rules: Vec<Rule<V>>, names: IndexMap<&'static str, RuleId>) -> Self {
        Self { rules, names }
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// # Panics
    /// Panics if `id` was not created for this grammar.
    #[inline]
    pub fn rule(&self, id: RuleId) -> &Rule<V> {
        &self.rules[id.index()]
    }

    pub fn get(&self, name: &str) -> Option<RuleId> {
        self.names.get(name).copied()
    }

    pub fn name(&self, id: RuleId) -> &'static str {
        self.rule(id).name
    }

    pub fn rules(&self) -> impl Iterator<Item = &Rule<V>> {
        self.rules.iter()
    }

    /// Human-readable description of a production, used for "expected" leaves.
    pub fn describe(&self, production: &Production<V>) -> String {
        let mut out = String::new();
        production.render(self, 0, &mut out);
        out
    }

    /// PEG-notation listing of every rule.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for rule in &self.rules {
            out.push_str(rule.name);
            if let Some(expected) = rule.expected {
                out.push_str(&format!(" {expected:?}"));
            }
            out.push_str(" <- ");
            rule.production.render(self, 0, &mut out);
            if rule.token {
                out.push_str("  # token");
            }
            out.push('\n');
        }
        out
    }
}

impl<V> std::fmt::Debug for Grammar<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Grammar")
            .field("rules", &self.rules)
            .finish()
    }
}
