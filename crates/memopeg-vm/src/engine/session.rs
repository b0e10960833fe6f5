//! Per-input session: memo tables, limits, and the public phase entry points.

use std::collections::HashMap;
use std::rc::Rc;

use memopeg_core::{Cursor, Grammar, ParseContext, RuleId, Value};

use super::error::RuntimeError;
use super::fail::Fail;
use super::memo::{Memo, Recognized};
use super::trace::{NoopTracer, PhaseKind, Tracer};
use super::tree::{GreenElement, SyntaxNode};

/// Default nesting of evaluator frames. Fits a 2 MiB thread stack in debug
/// builds with the largest value types in this workspace.
const DEFAULT_RECURSION_LIMIT: u32 = 256;

/// Runtime limits for one session.
#[derive(Clone, Copy, Debug)]
pub struct FuelLimits {
    /// Maximum production evaluation steps (default: unbounded).
    pub(crate) exec_fuel: Option<u32>,
    /// Maximum nesting of production evaluation, rule calls included
    /// (default: 256). Evaluation recurses on the native stack.
    pub(crate) recursion_limit: u32,
}

impl Default for FuelLimits {
    fn default() -> Self {
        Self {
            exec_fuel: None,
            recursion_limit: DEFAULT_RECURSION_LIMIT,
        }
    }
}

impl FuelLimits {
    /// Create new fuel limits with defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the execution fuel limit.
    pub fn exec_fuel(mut self, fuel: u32) -> Self {
        self.exec_fuel = Some(fuel);
        self
    }

    /// Set the recursion limit.
    pub fn recursion_limit(mut self, limit: u32) -> Self {
        self.recursion_limit = limit;
        self
    }

    pub fn get_exec_fuel(&self) -> Option<u32> {
        self.exec_fuel
    }
    pub fn get_recursion_limit(&self) -> u32 {
        self.recursion_limit
    }
}

/// How much work each phase has done so far.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Stats {
    /// Recognition entries computed.
    pub recognized: usize,
    /// Tree nodes built.
    pub trees: usize,
    /// Fail nodes built for the current error target.
    pub fails: usize,
    /// Rule values computed by the action phase.
    pub values: usize,
    /// Action closures invoked.
    pub action_calls: usize,
    /// Production evaluation steps, i.e. fuel consumed.
    pub steps: u64,
}

/// Builder for sessions.
pub struct SessionBuilder<'a, V, T = NoopTracer> {
    grammar: &'a Grammar<V>,
    text: &'a str,
    context: ParseContext,
    limits: FuelLimits,
    tracer: T,
}

impl<'a, V, T: Tracer> SessionBuilder<'a, V, T> {
    /// Set the offset/context provider.
    pub fn context(mut self, context: ParseContext) -> Self {
        self.context = context;
        self
    }

    /// Set the fuel limits.
    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    /// Replace the tracer.
    pub fn tracer<U: Tracer>(self, tracer: U) -> SessionBuilder<'a, V, U> {
        SessionBuilder {
            grammar: self.grammar,
            text: self.text,
            context: self.context,
            limits: self.limits,
            tracer,
        }
    }

    /// Build the session, sizing the recognition memo for the input.
    pub fn build(self) -> Result<Session<'a, V, T>, RuntimeError> {
        let memo = Memo::new(self.text.len(), self.grammar.len())?;
        Ok(Session {
            grammar: self.grammar,
            text: self.text,
            cursor: Cursor::new(self.text.as_bytes()),
            context: self.context,
            memo,
            nodes: HashMap::new(),
            values: HashMap::new(),
            fails: HashMap::new(),
            fail_target: None,
            last_fail: None,
            limits: self.limits,
            depth: 0,
            fatal: None,
            tracer: self.tracer,
            stats: Stats::default(),
        })
    }
}

/// Memo tables and state for parsing one text with one grammar.
///
/// Entries are filled lazily and never invalidated (the fail cache excepted,
/// which belongs to one error target). A fuel or recursion error is sticky:
/// once raised, every entry point returns it.
pub struct Session<'a, V, T = NoopTracer> {
    pub(crate) grammar: &'a Grammar<V>,
    pub(crate) text: &'a str,
    pub(crate) cursor: Cursor<'a>,
    pub(crate) context: ParseContext,
    pub(crate) memo: Memo,
    pub(crate) nodes: HashMap<(usize, RuleId), Option<GreenElement>>,
    pub(crate) values: HashMap<(usize, RuleId), V>,
    pub(crate) fails: HashMap<(usize, RuleId), Option<Rc<Fail>>>,
    pub(crate) fail_target: Option<usize>,
    /// Farthest failure offset seen by the recognizer.
    pub(crate) last_fail: Option<usize>,
    pub(crate) limits: FuelLimits,
    /// Evaluator frames currently on the stack.
    pub(crate) depth: u32,
    pub(crate) fatal: Option<RuntimeError>,
    pub(crate) tracer: T,
    pub(crate) stats: Stats,
}

impl<'a, V> Session<'a, V> {
    /// Create a session builder.
    pub fn builder(grammar: &'a Grammar<V>, text: &'a str) -> SessionBuilder<'a, V> {
        SessionBuilder {
            grammar,
            text,
            context: ParseContext::default(),
            limits: FuelLimits::default(),
            tracer: NoopTracer,
        }
    }

    /// Session with default context and limits.
    pub fn new(grammar: &'a Grammar<V>, text: &'a str) -> Result<Self, RuntimeError> {
        Self::builder(grammar, text).build()
    }
}

impl<'a, V, T: Tracer> Session<'a, V, T> {
    pub fn grammar(&self) -> &'a Grammar<V> {
        self.grammar
    }

    pub fn text(&self) -> &'a str {
        self.text
    }

    pub fn len(&self) -> usize {
        self.text.len()
    }

    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    pub fn context(&self) -> &ParseContext {
        &self.context
    }

    pub fn tracer(&self) -> &T {
        &self.tracer
    }

    pub fn into_tracer(self) -> T {
        self.tracer
    }

    /// Farthest offset at which any recognition attempt has failed so far.
    pub fn last_fail(&self) -> Option<usize> {
        self.last_fail
    }

    pub fn stats(&self) -> Stats {
        Stats {
            recognized: self.memo.computed(),
            ..self.stats
        }
    }

    /// Recognize `rule` at `pos`.
    pub fn accept(&mut self, rule: RuleId, pos: usize) -> Result<Recognized, RuntimeError> {
        self.check_start(PhaseKind::Recognize, rule, pos)?;
        let result = self.recognize(rule, pos);
        self.check_fatal()?;
        Ok(result)
    }

    /// Build the concrete tree of `rule` at `pos`.
    pub fn tree(
        &mut self,
        rule: RuleId,
        pos: usize,
    ) -> Result<Option<(usize, SyntaxNode)>, RuntimeError> {
        self.check_start(PhaseKind::Tree, rule, pos)?;
        let built = self.node(rule, pos);
        self.check_fatal()?;
        Ok(built.map(|(end, element)| (end, SyntaxNode::new_root(self.root_node(rule, element)))))
    }

    /// Expectation tree of `rule` at `pos`, pruned to facts at or after `err_pos`.
    pub fn fail(&mut self, rule: RuleId, pos: usize, err_pos: usize) -> Result<Fail, RuntimeError> {
        self.check_start(PhaseKind::Fail, rule, pos)?;
        if self.fail_target != Some(err_pos) {
            self.fails.clear();
            self.stats.fails = 0;
            self.fail_target = Some(err_pos);
        }
        let (_, node) = self.fail_node(rule, pos, err_pos);
        self.check_fatal()?;
        let name = self.grammar.name(rule);
        Ok(node.map_or_else(|| Fail::node(name, pos, Vec::new()), Rc::unwrap_or_clone))
    }

    pub(crate) fn check_start(
        &mut self,
        phase: PhaseKind,
        rule: RuleId,
        pos: usize,
    ) -> Result<(), RuntimeError> {
        self.check_fatal()?;
        assert!(
            rule.index() < self.grammar.len(),
            "rule id {} does not belong to this grammar",
            rule.raw()
        );
        assert!(
            pos <= self.text.len(),
            "offset {pos} is past the end of the input ({})",
            self.text.len()
        );
        self.tracer.trace_phase(phase, self.grammar.name(rule), pos);
        Ok(())
    }

    pub(crate) fn check_fatal(&self) -> Result<(), RuntimeError> {
        match &self.fatal {
            Some(err) => Err(err.clone()),
            None => Ok(()),
        }
    }

    /// Spend one evaluation step.
    #[inline]
    pub(crate) fn step(&mut self) -> bool {
        if self.fatal.is_some() {
            return false;
        }
        if let Some(limit) = self.limits.exec_fuel
            && self.stats.steps >= u64::from(limit)
        {
            self.fatal = Some(RuntimeError::ExecFuelExhausted);
            return false;
        }
        self.stats.steps += 1;
        true
    }

    /// Push one evaluator frame. `false` once the session is dead.
    #[inline]
    pub(crate) fn descend(&mut self) -> bool {
        if self.fatal.is_some() {
            return false;
        }
        if self.depth >= self.limits.recursion_limit {
            self.fatal = Some(RuntimeError::RecursionLimitExceeded);
            return false;
        }
        self.depth += 1;
        true
    }

    #[inline]
    pub(crate) fn ascend(&mut self) {
        self.depth -= 1;
    }

    /// Enter a rule evaluation (memo miss). `false` once the session is dead.
    pub(crate) fn enter(&mut self, phase: PhaseKind, rule: RuleId, pos: usize) -> bool {
        if self.fatal.is_some() {
            return false;
        }
        self.tracer.trace_enter(phase, self.grammar.name(rule), pos);
        true
    }

    pub(crate) fn exit(&mut self, phase: PhaseKind, rule: RuleId, pos: usize, end: Option<usize>) {
        self.tracer
            .trace_exit(phase, self.grammar.name(rule), pos, end);
    }

    pub(crate) fn memo_hit(&mut self, phase: PhaseKind, rule: RuleId, pos: usize, end: Option<usize>) {
        self.tracer
            .trace_memo_hit(phase, self.grammar.name(rule), pos, end);
    }
}

impl<'a, V: Value, T: Tracer> Session<'a, V, T> {
    /// Run the semantic actions of `rule` at `pos`.
    pub fn action(&mut self, rule: RuleId, pos: usize) -> Result<Option<(usize, V)>, RuntimeError> {
        self.check_start(PhaseKind::Action, rule, pos)?;
        let result = self.value(rule, pos);
        self.check_fatal()?;
        Ok(result)
    }
}
