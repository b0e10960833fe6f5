//! Two-phase grammar construction: declare names, then define productions.

use indexmap::IndexMap;

use super::analysis;
use super::{Grammar, GrammarError, Production, Rule, RuleId};

/// Builder for `Grammar`.
///
/// `declare` hands out ids up front so productions can reference rules that
/// are defined later (including themselves). `build` checks that every declared
/// rule got exactly one definition and that no rule is left-recursive.
pub struct GrammarBuilder<V> {
    names: IndexMap<&'static str, RuleId>,
    slots: Vec<Option<Rule<V>>>,
    errors: Vec<GrammarError>,
}

/// Chainable handle returned by `GrammarBuilder::define`.
pub struct RuleHandle<'b, V> {
    rule: Option<&'b mut Rule<V>>,
}

impl<V> Default for GrammarBuilder<V> {
    fn default() -> Self {
        Self::new()
    }
}

impl<V> GrammarBuilder<V> {
    pub fn new() -> Self {
        Self {
            names: IndexMap::new(),
            slots: Vec::new(),
            errors: Vec::new(),
        }
    }

    /// Reserve an id for `name`. Declaring the same name twice returns the same id.
    pub fn declare(&mut self, name: &'static str) -> RuleId {
        if let Some(&id) = self.names.get(name) {
            return id;
        }
        // u16::MAX is reserved: it is the tree kind of terminal tokens.
        let raw = match u16::try_from(self.slots.len()) {
            Ok(raw) if raw < u16::MAX => raw,
            _ => {
                self.errors.push(GrammarError::TooManyRules);
                return RuleId::new(u16::MAX);
            }
        };
        let id = RuleId::new(raw);
        self.names.insert(name, id);
        self.slots.push(None);
        id
    }

    /// Attach the production for a declared rule.
    pub fn define(&mut self, id: RuleId, production: Production<V>) -> RuleHandle<'_, V> {
        let Some((&name, _)) = self.names.get_index(id.index()) else {
            self.errors.push(GrammarError::UnknownRuleId(id.raw()));
            return RuleHandle { rule: None };
        };
        let slot = &mut self.slots[id.index()];
        if slot.is_some() {
            self.errors.push(GrammarError::DuplicateRule(name));
            return RuleHandle { rule: None };
        }
        let rule = slot.insert(Rule {
            id,
            name,
            expected: None,
            token: false,
            production,
        });
        RuleHandle { rule: Some(rule) }
    }

    pub fn build(mut self) -> Result<Grammar<V>, GrammarError> {
        if !self.errors.is_empty() {
            return Err(self.errors.swap_remove(0));
        }

        let mut rules = Vec::with_capacity(self.slots.len());
        for (slot, (&name, _)) in self.slots.into_iter().zip(self.names.iter()) {
            match slot {
                Some(rule) => rules.push(rule),
                None => return Err(GrammarError::UndefinedRule(name)),
            }
        }

        for rule in &rules {
            check_refs(&rule.production, rules.len())?;
        }

        let grammar = Grammar::from_parts(rules, self.names);
        if let Some(cycle) = analysis::find_left_recursion(&grammar) {
            return Err(GrammarError::LeftRecursion(cycle));
        }
        Ok(grammar)
    }

    /// Defined rules in declaration order, skipping validation.
    #[cfg(test)]
    pub(crate) fn into_parts(self) -> Vec<(&'static str, Rule<V>)> {
        self.names
            .into_keys()
            .zip(self.slots)
            .filter_map(|(name, slot)| slot.map(|rule| (name, rule)))
            .collect()
    }
}

impl<V> RuleHandle<'_, V> {
    /// Mark the rule as lexical: atomic in trees, and its internal failures are
    /// dropped from farthest-failure tracking once it matches.
    pub fn token(mut self) -> Self {
        if let Some(rule) = self.rule.as_deref_mut() {
            rule.token = true;
        }
        self
    }

    /// Name the rule in "expected ..." diagnostics instead of listing its internals.
    pub fn expected(mut self, name: &'static str) -> Self {
        if let Some(rule) = self.rule.as_deref_mut() {
            rule.expected = Some(name);
        }
        self
    }
}

fn check_refs<V>(production: &Production<V>, count: usize) -> Result<(), GrammarError> {
    match production {
        Production::Ref(id) if id.index() >= count => Err(GrammarError::UnknownRuleId(id.raw())),
        Production::Literal(_) | Production::Class(_) | Production::Any | Production::Ref(_) => {
            Ok(())
        }
        Production::Seq(items) | Production::Choice(items) => {
            items.iter().try_for_each(|p| check_refs(p, count))
        }
        Production::Star(p)
        | Production::Plus(p)
        | Production::Opt(p)
        | Production::Pos(p)
        | Production::Neg(p)
        | Production::Label(_, p)
        | Production::Action(p, _) => check_refs(p, count),
    }
}
