//! Whole-input entry points over a grammar.
//!
//! Each call opens a fresh session, so a `Parser` can be reused across inputs.
//! A parse succeeds only if the start rule consumes the entire text; otherwise
//! the fail phase is replayed once, aimed at the farthest failure, and the
//! result is turned into a diagnostic.

use memopeg_core::{Grammar, ParseContext, RuleId, Span, Value};
use memopeg_vm::{FuelLimits, Recognized, RuntimeError, Session, SyntaxNode, Tracer};

use crate::diagnostics::{Diagnostic, Diagnostics, LineCol};
use crate::{Error, Result};

/// Expectation reported where the start rule stopped short of the end.
const END_OF_INPUT: &str = "end of input";

/// Entry points for one grammar.
pub struct Parser<'g, V> {
    grammar: &'g Grammar<V>,
    context: ParseContext,
    limits: FuelLimits,
}

impl<'g, V> Parser<'g, V> {
    pub fn new(grammar: &'g Grammar<V>) -> Self {
        Self {
            grammar,
            context: ParseContext::default(),
            limits: FuelLimits::default(),
        }
    }

    /// Set the offset/context provider passed to every session.
    pub fn context(mut self, context: ParseContext) -> Self {
        self.context = context;
        self
    }

    pub fn limits(mut self, limits: FuelLimits) -> Self {
        self.limits = limits;
        self
    }

    pub fn grammar(&self) -> &'g Grammar<V> {
        self.grammar
    }

    pub fn get_context(&self) -> &ParseContext {
        &self.context
    }

    /// Fresh session over `text` with this parser's context and limits.
    pub fn session<'t>(&self, text: &'t str) -> Result<Session<'t, V>>
    where
        'g: 't,
    {
        let session = Session::builder(self.grammar, text)
            .context(self.context.clone())
            .limits(self.limits)
            .build()?;
        Ok(session)
    }

    /// Check that `rule` matches all of `text`.
    pub fn recognize(&self, text: &str, rule: RuleId) -> Result<()> {
        let mut session = self.session(text)?;
        accept_all(&mut session, rule)
    }

    /// Concrete tree of `rule` over all of `text`.
    pub fn tree(&self, text: &str, rule: RuleId) -> Result<SyntaxNode> {
        let mut session = self.session(text)?;
        accept_all(&mut session, rule)?;
        let built = session.tree(rule, 0)?;
        Ok(replayed(built, self.grammar.name(rule)))
    }
}

impl<V: Value> Parser<'_, V> {
    /// Value the actions of `rule` build over all of `text`.
    pub fn parse(&self, text: &str, rule: RuleId) -> Result<V> {
        let mut session = self.session(text)?;
        accept_all(&mut session, rule)?;
        let built = session.action(rule, 0)?;
        Ok(replayed(built, self.grammar.name(rule)))
    }
}

fn accept_all<V, T: Tracer>(session: &mut Session<'_, V, T>, rule: RuleId) -> Result<()> {
    let recognized = session.accept(rule, 0)?;
    if recognized.end == Some(session.len()) {
        return Ok(());
    }
    Err(Error::Syntax(diagnose(session, rule, recognized)?))
}

/// Explain why `rule` at offset 0 did not consume the whole text.
///
/// `recognized` is what the session's recognizer returned for it. The error
/// offset is the farther of the rule's farthest failure and its end; if the
/// rule matched and nothing failed past its end, "end of input" joins the
/// expectations there.
pub fn diagnose<V, T: Tracer>(
    session: &mut Session<'_, V, T>,
    rule: RuleId,
    recognized: Recognized,
) -> std::result::Result<Diagnostics, RuntimeError> {
    let err_pos = recognized.err.max(recognized.end).unwrap_or(0);
    let fail = session.fail(rule, 0, err_pos)?;

    let mut expected = fail.expected();
    if recognized.end == Some(err_pos) && err_pos < session.len() {
        expected.push(END_OF_INPUT.to_string());
    }

    let span = Span::empty(err_pos).shift(session.context().get_base_offset());
    let at = LineCol::of(session.text(), err_pos);
    Ok(Diagnostics::from_iter([Diagnostic::expected(span, at, expected)]))
}

/// Heavier phases replay only what recognition accepted.
#[cfg_attr(coverage_nightly, coverage(off))]
fn replayed<T>(built: Option<(usize, T)>, rule: &str) -> T {
    match built {
        Some((_, item)) => item,
        None => panic!("rule `{rule}` was accepted but its replay failed"),
    }
}
