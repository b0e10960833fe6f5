//! Recognition phase: match/no-match plus farthest failure, nothing allocated.

use memopeg_core::{ActionFn, Cursor, Production, RuleId};

use super::eval::{Phase, eval};
use super::invariants::ensure_err_not_before_start;
use super::memo::Recognized;
use super::session::Session;
use super::trace::{PhaseKind, Tracer};

/// Evaluates one rule body, tracking the farthest failure inside it.
struct Recognizer<'s, 'a, V, T> {
    session: &'s mut Session<'a, V, T>,
    err: Option<usize>,
}

impl<'a, V, T: Tracer> Session<'a, V, T> {
    /// Memoized recognition of `id` at `pos`.
    ///
    /// Updates `last_fail`. A token rule that matches reports its own start as
    /// its farthest failure and restores `last_fail` to what it was on entry
    /// (or the start, if farther): failed attempts inside a complete token say
    /// nothing about the surrounding grammar.
    pub(crate) fn recognize(&mut self, id: RuleId, pos: usize) -> Recognized {
        if let Some(hit) = self.memo.get(pos, id) {
            self.memo_hit(PhaseKind::Recognize, id, pos, hit.end);
            self.last_fail = self.last_fail.max(hit.err);
            return hit;
        }
        if !self.enter(PhaseKind::Recognize, id, pos) {
            return Recognized::FAIL;
        }

        let entry_fail = self.last_fail;
        let grammar = self.grammar;
        let rule = grammar.rule(id);
        let mut recognizer = Recognizer {
            session: self,
            err: None,
        };
        let end = eval(&mut recognizer, rule.production(), pos).map(|(end, ())| end);
        let mut err = recognizer.err;

        if rule.is_token() && end.is_some() {
            err = Some(pos);
            self.last_fail = entry_fail.max(err);
        } else {
            self.last_fail = self.last_fail.max(err);
        }
        if let Some(err) = err {
            ensure_err_not_before_start(rule.name(), pos, err);
        }

        self.exit(PhaseKind::Recognize, id, pos, end);
        let result = Recognized { end, err };
        if self.fatal.is_none() {
            self.memo.set(pos, id, result);
        }
        result
    }
}

impl<'a, V: 'a, T: Tracer> Phase<'a, V> for Recognizer<'_, 'a, V, T> {
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

    #[inline(always)]
    fn rewind(&mut self, _mark: ()) {}

    #[inline(always)]
    fn discard(&mut self, _mark: ()) {}

    #[inline]
    fn miss(&mut self, pos: usize, _want: &'a Production<V>, _negated: bool) {
        self.err = self.err.max(Some(pos));
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
        let result = self.session.recognize(rule, pos);
        self.err = self.err.max(result.err);
        result.end.map(|end| (end, ()))
    }
}
