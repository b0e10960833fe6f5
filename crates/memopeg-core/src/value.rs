//! Semantic values and the label environment seen by action closures.

use crate::{ParseContext, Span};

/// Result type produced by a grammar's actions.
///
/// Besides what actions build, every production kind needs a value so that
/// labels can capture it: terminals and unlabeled sequences yield their text,
/// repetitions a list, optionals and lookaheads `none()`.
///
/// Values are cached per (start, rule) and handed out again on cache hits,
/// hence `Clone`.
pub trait Value: Clone {
    fn text(text: &str, span: Span) -> Self;
    fn list(items: Vec<Self>) -> Self;
    fn none() -> Self;
}

/// Recognition-only grammars carry no values.
impl Value for () {
    #[inline(always)]
    fn text(_text: &str, _span: Span) -> Self {}

    #[inline(always)]
    fn list(_items: Vec<Self>) -> Self {}

    #[inline(always)]
    fn none() -> Self {}
}

/// Label bindings and match facts for one action invocation.
///
/// Bindings keep match order. A label bound more than once (inside a
/// repetition) keeps every binding; `take` hands out the earliest one.
pub struct Env<'a, V> {
    text: &'a str,
    span: Span,
    labels: Vec<(&'static str, V)>,
    context: &'a ParseContext,
}

impl<'a, V> Env<'a, V> {
    pub fn new(
        text: &'a str,
        span: Span,
        labels: Vec<(&'static str, V)>,
        context: &'a ParseContext,
    ) -> Self {
        Self {
            text,
            span,
            labels,
            context,
        }
    }

    /// Matched text of the whole action.
    pub fn text(&self) -> &'a str {
        self.text
    }

    /// Matched span in master-document coordinates.
    pub fn span(&self) -> Span {
        self.span
    }

    pub fn context(&self) -> &'a ParseContext {
        self.context
    }

    pub fn default_module(&self) -> Option<&'a str> {
        self.context.get_default_module()
    }

    pub fn has(&self, label: &str) -> bool {
        self.labels.iter().any(|(l, _)| *l == label)
    }

    /// Remove and return the earliest binding of `label`.
    pub fn take(&mut self, label: &str) -> Option<V> {
        let idx = self.labels.iter().position(|(l, _)| *l == label)?;
        Some(self.labels.remove(idx).1)
    }

    /// Remove and return every binding of `label`, in match order.
    pub fn take_all(&mut self, label: &str) -> Vec<V> {
        let mut taken = Vec::new();
        let mut kept = Vec::with_capacity(self.labels.len());
        for (l, v) in self.labels.drain(..) {
            if l == label {
                taken.push(v);
            } else {
                kept.push((l, v));
            }
        }
        self.labels = kept;
        taken
    }

    /// Labels still bound, in match order.
    pub fn labels(&self) -> impl Iterator<Item = &'static str> + '_ {
        self.labels.iter().map(|(l, _)| *l)
    }
}
