//! Action phase: typed values built by the grammar's semantic actions.
//!
//! Values are cached per (start, rule), so an action closure runs at most once
//! per pair no matter how often ordered choice, lookahead or repetition come
//! back to the same rule at the same offset.

use memopeg_core::{ActionFn, Cursor, Env, Production, RuleId, Span, Value};

use super::eval::{Phase, eval};
use super::invariants::ensure_replay_agrees;
use super::session::Session;
use super::trace::{PhaseKind, Tracer};

/// Label bindings of one rule body, in match order.
struct ActionEvaluator<'s, 'a, V, T> {
    session: &'s mut Session<'a, V, T>,
    bindings: Vec<(&'static str, V)>,
}

impl<'a, V: Value, T: Tracer> Session<'a, V, T> {
    /// Memoized value of `id` at `pos`.
    pub(crate) fn value(&mut self, id: RuleId, pos: usize) -> Option<(usize, V)> {
        let end = self.recognize(id, pos).end?;
        if let Some(cached) = self.values.get(&(pos, id)) {
            let value = cached.clone();
            self.memo_hit(PhaseKind::Action, id, pos, Some(end));
            return Some((end, value));
        }
        if !self.enter(PhaseKind::Action, id, pos) {
            return None;
        }

        let grammar = self.grammar;
        let rule = grammar.rule(id);
        let mut evaluator = ActionEvaluator {
            session: self,
            bindings: Vec::new(),
        };
        // Labels not consumed by an action in this body die here.
        let replayed = eval(&mut evaluator, rule.production(), pos);
        self.exit(PhaseKind::Action, id, pos, replayed.as_ref().map(|(e, _)| *e));
        if self.fatal.is_some() {
            return None;
        }
        let (replayed_end, value) = match replayed {
            Some(hit) => hit,
            None => (pos, V::none()),
        };
        ensure_replay_agrees(rule.name(), pos, end, replayed_end);

        self.values.insert((pos, id), value.clone());
        self.stats.values += 1;
        Some((end, value))
    }

    fn text_value(&self, start: usize, end: usize) -> V {
        let span = Span::new(start, end).shift(self.context.get_base_offset());
        V::text(self.cursor.text(start, end), span)
    }
}

impl<'a, V: Value + 'a, T: Tracer> Phase<'a, V> for ActionEvaluator<'_, 'a, V, T> {
    type Item = V;
    type Mark = usize;

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

    #[inline]
    fn mark(&self) -> usize {
        self.bindings.len()
    }

    #[inline]
    fn rewind(&mut self, mark: usize) {
        self.bindings.truncate(mark);
    }

    #[inline]
    fn discard(&mut self, mark: usize) {
        self.bindings.truncate(mark);
    }

    #[inline(always)]
    fn miss(&mut self, _pos: usize, _want: &'a Production<V>, _negated: bool) {}

    fn terminal(&mut self, start: usize, end: usize) -> V {
        self.session.text_value(start, end)
    }

    fn matched(&mut self, start: usize, end: usize) -> V {
        self.session.text_value(start, end)
    }

    fn list(&mut self, items: Vec<V>) -> V {
        V::list(items)
    }

    fn none(&mut self) -> V {
        V::none()
    }

    fn label(&mut self, name: &'static str, item: V) -> V {
        self.bindings.push((name, item));
        V::none()
    }

    fn action(&mut self, mark: usize, f: &'a ActionFn<V>, start: usize, end: usize) -> V {
        let labels = self.bindings.split_off(mark);
        let session = &mut *self.session;
        session.stats.action_calls += 1;
        let span = Span::new(start, end).shift(session.context.get_base_offset());
        let mut env = Env::new(session.cursor.text(start, end), span, labels, &session.context);
        f(&mut env)
    }

    fn call(&mut self, rule: RuleId, pos: usize) -> Option<(usize, V)> {
        self.session.value(rule, pos)
    }
}
