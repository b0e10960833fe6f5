//! The one production interpreter shared by all four phases.
//!
//! Control flow (sequencing, ordered choice, repetition, lookahead) is fixed
//! here. What a phase accumulates along the way, and how it undoes that on
//! backtrack, is left to its `Phase` implementation.
//!
//! A production that fails leaves the phase state as it found it, except for
//! what `miss` records: `Seq` and `Choice` rewind, repetition rewinds the
//! failed iteration, lookahead discards its child's output.

use memopeg_core::{ActionFn, Cursor, Production, RuleId};

/// Hooks one phase plugs into `eval`.
pub(crate) trait Phase<'a, V: 'a> {
    /// What a production yields: `()` for phases that accumulate elsewhere.
    type Item;
    /// Snapshot of accumulated state for rewinding.
    type Mark: Copy;

    fn cursor(&self) -> Cursor<'a>;

    /// Spend one unit of execution fuel. `false` once the session is dead.
    fn step(&mut self) -> bool;

    /// Push one frame against the recursion limit. `false` once the session is dead.
    fn descend(&mut self) -> bool;

    fn ascend(&mut self);

    fn mark(&self) -> Self::Mark;

    /// Undo work of a failed alternative or repetition step.
    fn rewind(&mut self, mark: Self::Mark);

    /// Drop whatever a lookahead child produced, whether it matched or not.
    fn discard(&mut self, mark: Self::Mark);

    /// A terminal failed at `pos`, or a negative lookahead's child matched there.
    fn miss(&mut self, pos: usize, want: &'a Production<V>, negated: bool);

    /// A terminal consumed `start..end`.
    fn terminal(&mut self, start: usize, end: usize) -> Self::Item;

    /// Value of an unlabeled sequence spanning `start..end`.
    fn matched(&mut self, start: usize, end: usize) -> Self::Item;

    fn list(&mut self, items: Vec<Self::Item>) -> Self::Item;

    fn none(&mut self) -> Self::Item;

    fn label(&mut self, name: &'static str, item: Self::Item) -> Self::Item;

    /// Run an action over everything bound since `mark`.
    fn action(
        &mut self,
        mark: Self::Mark,
        f: &'a ActionFn<V>,
        start: usize,
        end: usize,
    ) -> Self::Item;

    /// Evaluate a rule reference, through the memo.
    fn call(&mut self, rule: RuleId, pos: usize) -> Option<(usize, Self::Item)>;
}

/// Evaluate `production` at `pos`, returning the end offset and item on a match.
pub(crate) fn eval<'a, V: 'a, P: Phase<'a, V>>(
    phase: &mut P,
    production: &'a Production<V>,
    pos: usize,
) -> Option<(usize, P::Item)> {
    if !phase.step() || !phase.descend() {
        return None;
    }
    let hit = eval_production(phase, production, pos);
    phase.ascend();
    hit
}

fn eval_production<'a, V: 'a, P: Phase<'a, V>>(
    phase: &mut P,
    production: &'a Production<V>,
    pos: usize,
) -> Option<(usize, P::Item)> {
    match production {
        Production::Literal(lit) => {
            if phase.cursor().starts_with(pos, lit.as_bytes()) {
                let end = pos + lit.len();
                Some((end, phase.terminal(pos, end)))
            } else {
                phase.miss(pos, production, false);
                None
            }
        }
        Production::Class(class) => {
            let scalar = phase.cursor().next(pos);
            if !scalar.is_none() && class.matches(scalar.ch) {
                let end = pos + scalar.width;
                Some((end, phase.terminal(pos, end)))
            } else {
                phase.miss(pos, production, false);
                None
            }
        }
        Production::Any => {
            let scalar = phase.cursor().next(pos);
            if scalar.is_none() {
                phase.miss(pos, production, false);
                None
            } else {
                let end = pos + scalar.width;
                Some((end, phase.terminal(pos, end)))
            }
        }
        Production::Seq(items) => {
            let mark = phase.mark();
            let mut at = pos;
            for item in items {
                match eval(phase, item, at) {
                    Some((end, _)) => at = end,
                    None => {
                        phase.rewind(mark);
                        return None;
                    }
                }
            }
            Some((at, phase.matched(pos, at)))
        }
        Production::Choice(alts) => {
            for alt in alts {
                let mark = phase.mark();
                if let Some(hit) = eval(phase, alt, pos) {
                    return Some(hit);
                }
                phase.rewind(mark);
            }
            None
        }
        Production::Star(child) => repeat(phase, child, pos, false),
        Production::Plus(child) => repeat(phase, child, pos, true),
        Production::Opt(child) => {
            let mark = phase.mark();
            if let Some(hit) = eval(phase, child, pos) {
                return Some(hit);
            }
            phase.rewind(mark);
            Some((pos, phase.none()))
        }
        Production::Pos(child) => {
            let mark = phase.mark();
            let hit = eval(phase, child, pos);
            phase.discard(mark);
            if hit.is_none() {
                return None;
            }
            Some((pos, phase.none()))
        }
        Production::Neg(child) => {
            let mark = phase.mark();
            let hit = eval(phase, child, pos);
            phase.discard(mark);
            if hit.is_some() {
                phase.miss(pos, child, true);
                return None;
            }
            Some((pos, phase.none()))
        }
        Production::Label(name, child) => {
            let (end, item) = eval(phase, child, pos)?;
            Some((end, phase.label(*name, item)))
        }
        Production::Ref(rule) => phase.call(*rule, pos),
        Production::Action(child, f) => {
            let mark = phase.mark();
            let (end, _) = eval(phase, child, pos)?;
            Some((end, phase.action(mark, f, pos, end)))
        }
    }
}

fn repeat<'a, V: 'a, P: Phase<'a, V>>(
    phase: &mut P,
    child: &'a Production<V>,
    pos: usize,
    at_least_one: bool,
) -> Option<(usize, P::Item)> {
    let mut items = Vec::new();
    let mut at = pos;
    loop {
        let mark = phase.mark();
        match eval(phase, child, at) {
            Some((end, item)) => {
                items.push(item);
                // A step that consumed nothing would repeat forever.
                if end == at {
                    break;
                }
                at = end;
            }
            None => {
                phase.rewind(mark);
                break;
            }
        }
    }
    if at_least_one && items.is_empty() {
        return None;
    }
    Some((at, phase.list(items)))
}
