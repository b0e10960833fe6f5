//! Diagnostics phase: the expectation tree behind the farthest failure.
//!
//! Replays only rules whose recognized farthest failure reaches the error
//! target; every other rule contributes nothing, so the cost is bounded by the
//! paths that lead to the target rather than by the whole abandoned search.

use std::rc::Rc;

use serde::Serialize;

use memopeg_core::{ActionFn, Cursor, Production, RuleId};

use super::eval::{Phase, eval};
use super::session::Session;
use super::trace::{PhaseKind, Tracer};

/// One node of an expectation tree.
///
/// Leaves carry `want`: a terminal that did not match at `pos`, a negative
/// lookahead that did, or a named rule that failed as a whole at `pos`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Fail {
    pub rule: &'static str,
    pub pos: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub want: Option<String>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub kids: Vec<Rc<Fail>>,
}

impl Fail {
    pub fn leaf(rule: &'static str, pos: usize, want: impl Into<String>) -> Self {
        Self {
            rule,
            pos,
            want: Some(want.into()),
            kids: Vec::new(),
        }
    }

    pub fn node(rule: &'static str, pos: usize, kids: Vec<Rc<Fail>>) -> Self {
        Self {
            rule,
            pos,
            want: None,
            kids,
        }
    }

    pub fn is_leaf(&self) -> bool {
        self.want.is_some()
    }

    /// Every leaf, depth first.
    pub fn leaves(&self) -> Vec<&Fail> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'f>(&'f self, out: &mut Vec<&'f Fail>) {
        if self.is_leaf() {
            out.push(self);
        }
        for kid in &self.kids {
            kid.collect_leaves(out);
        }
    }

    /// Distinct expectations, sorted.
    pub fn expected(&self) -> Vec<String> {
        let mut wants: Vec<String> = self
            .leaves()
            .into_iter()
            .filter_map(|leaf| leaf.want.clone())
            .collect();
        wants.sort();
        wants.dedup();
        wants
    }

    /// Indented listing.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        self.dump_into(0, &mut out);
        out
    }

    fn dump_into(&self, indent: usize, out: &mut String) {
        let prefix = "  ".repeat(indent);
        match &self.want {
            Some(want) => out.push_str(&format!("{prefix}{} @{}: expected {want}\n", self.rule, self.pos)),
            None => out.push_str(&format!("{prefix}{} @{}\n", self.rule, self.pos)),
        }
        for kid in &self.kids {
            kid.dump_into(indent + 1, out);
        }
    }
}

/// Collects failure facts inside one rule body.
struct FailBuilder<'s, 'a, V, T> {
    session: &'s mut Session<'a, V, T>,
    rule: &'static str,
    err_pos: usize,
    kids: Vec<Rc<Fail>>,
}

impl<'a, V, T: Tracer> Session<'a, V, T> {
    /// Memoized expectation tree of `id` at `pos` for target `err_pos`.
    ///
    /// Trivial (`None`) when the rule's farthest failure stops short of the
    /// target, or when it is a token rule that matched. Every leaf sits at or
    /// after `err_pos`.
    pub(crate) fn fail_node(
        &mut self,
        id: RuleId,
        pos: usize,
        err_pos: usize,
    ) -> (Option<usize>, Option<Rc<Fail>>) {
        let recognized = self.recognize(id, pos);
        let grammar = self.grammar;
        let rule = grammar.rule(id);
        if recognized.err.is_none_or(|err| err < err_pos) || (rule.is_token() && recognized.is_match()) {
            return (recognized.end, None);
        }
        if let Some(cached) = self.fails.get(&(pos, id)) {
            let cached = cached.clone();
            self.memo_hit(PhaseKind::Fail, id, pos, recognized.end);
            return (recognized.end, cached);
        }

        // Named rules are leaves only when they start at or after the target.
        let node = match (rule.expected(), recognized.end) {
            (Some(name), None) if pos >= err_pos => {
                Some(Rc::new(Fail::leaf(rule.name(), pos, name)))
            }
            _ => {
                if !self.enter(PhaseKind::Fail, id, pos) {
                    return (None, None);
                }
                let mut builder = FailBuilder {
                    session: self,
                    rule: rule.name(),
                    err_pos,
                    kids: Vec::new(),
                };
                let replayed = eval(&mut builder, rule.production(), pos).map(|(end, ())| end);
                let kids = builder.kids;
                self.exit(PhaseKind::Fail, id, pos, replayed);
                (!kids.is_empty()).then(|| Rc::new(Fail::node(rule.name(), pos, kids)))
            }
        };
        if self.fatal.is_some() {
            return (None, None);
        }

        self.fails.insert((pos, id), node.clone());
        self.stats.fails += 1;
        (recognized.end, node)
    }
}

impl<'a, V: 'a, T: Tracer> FailBuilder<'_, 'a, V, T> {
    fn describe(&self, want: &'a Production<V>, negated: bool) -> String {
        let text = match want {
            Production::Any => "any character".to_string(),
            _ => self.session.grammar.describe(want),
        };
        if negated { format!("not {text}") } else { text }
    }
}

impl<'a, V: 'a, T: Tracer> Phase<'a, V> for FailBuilder<'_, 'a, V, T> {
    type Item = ();
    type Mark = ();

    #[inline]
    fn cursor(&self) -> Cursor<'a> {
        self.session.cursor
    }

    #[inline]
    fn step(&mut self) -> bool {
        self.session.step()
    }

    #[inline]
    fn descend(&mut self) -> bool {
        self.session.descend()
    }

    #[inline]
    fn ascend(&mut self) {
        self.session.ascend();
    }

    #[inline(always)]
    fn mark(&self) {}

    // Failed alternatives are exactly what this phase reports.
    #[inline(always)]
    fn rewind(&mut self, _mark: ()) {}

    // The recognizer counts failures inside lookaheads; keep them to agree with it.
    #[inline(always)]
    fn discard(&mut self, _mark: ()) {}

    fn miss(&mut self, pos: usize, want: &'a Production<V>, negated: bool) {
        if pos >= self.err_pos {
            let want = self.describe(want, negated);
            self.kids.push(Rc::new(Fail::leaf(self.rule, pos, want)));
        }
    }

    #[inline(always)]
    fn terminal(&mut self, _start: usize, _end: usize) {}

    #[inline(always)]
    fn matched(&mut self, _start: usize, _end: usize) {}

    #[inline(always)]
    fn list(&mut self, _items: Vec<()>) {}

    #[inline(always)]
    fn none(&mut self) {}

    #[inline(always)]
    fn label(&mut self, _name: &'static str, _item: ()) {}

    #[inline(always)]
    fn action(&mut self, _mark: (), _f: &'a ActionFn<V>, _start: usize, _end: usize) {}

    fn call(&mut self, rule: RuleId, pos: usize) -> Option<(usize, ())> {
        let (end, node) = self.session.fail_node(rule, pos, self.err_pos);
        self.kids.extend(node);
        end.map(|end| (end, ()))
    }
}
