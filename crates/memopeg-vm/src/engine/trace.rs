//! Tracing infrastructure for debugging rule evaluation.
//!
//! # Design: Zero-Cost Abstraction
//!
//! The session is generic over its tracer. With `NoopTracer` every trait
//! method is an `#[inline(always)]` empty function, so the calls and their
//! arguments disappear at compile time and no tracing state lives in the
//! evaluation structures.
//!
//! `PrintTracer` keeps its own indentation depth and current section, and
//! collects formatted lines for display.

use memopeg_core::Colors;

/// Which evaluation phase a traced event belongs to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum PhaseKind {
    Recognize,
    Tree,
    Fail,
    Action,
}

impl PhaseKind {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Recognize => "recognize",
            Self::Tree => "tree",
            Self::Fail => "fail",
            Self::Action => "action",
        }
    }
}

impl std::fmt::Display for PhaseKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Verbosity level for trace output.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Verbosity {
    /// Default: rule enter/exit.
    #[default]
    Default,
    /// Verbose (-v): also memo hits.
    Verbose,
    /// Very verbose (-vv): also the matched text on successful exits.
    VeryVerbose,
}

/// Tracer trait for session instrumentation.
///
/// Methods receive rule names and offsets the session already has; formatting
/// happens in the implementation.
///
/// - `trace_phase` - a public entry point starts evaluating `rule` at `pos`
/// - `trace_enter` - a rule is evaluated (memo miss)
/// - `trace_exit` - the evaluation finished; `end` is `None` on failure
/// - `trace_memo_hit` - a cached result was reused
pub trait Tracer {
    fn trace_phase(&mut self, phase: PhaseKind, rule: &str, pos: usize);

    fn trace_enter(&mut self, phase: PhaseKind, rule: &str, pos: usize);

    fn trace_exit(&mut self, phase: PhaseKind, rule: &str, pos: usize, end: Option<usize>);

    fn trace_memo_hit(&mut self, phase: PhaseKind, rule: &str, pos: usize, end: Option<usize>);
}

/// No-op tracer that gets optimized away completely.
#[derive(Clone, Copy, Debug, Default)]
pub struct NoopTracer;

impl Tracer for NoopTracer {
    #[inline(always)]
    fn trace_phase(&mut self, _phase: PhaseKind, _rule: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_enter(&mut self, _phase: PhaseKind, _rule: &str, _pos: usize) {}

    #[inline(always)]
    fn trace_exit(&mut self, _phase: PhaseKind, _rule: &str, _pos: usize, _end: Option<usize>) {}

    #[inline(always)]
    fn trace_memo_hit(&mut self, _phase: PhaseKind, _rule: &str, _pos: usize, _end: Option<usize>) {
    }
}

/// Longest matched-text excerpt shown in very verbose mode.
const TEXT_BUDGET: usize = 24;

/// Tracer that collects an indented evaluation trace.
pub struct PrintTracer<'s> {
    /// Source text for matched-text excerpts.
    source: &'s str,
    verbosity: Verbosity,
    lines: Vec<String>,
    depth: usize,
    /// Phase of the current section; events of other phases get a tag.
    section: Option<PhaseKind>,
    colors: Colors,
}

impl<'s> PrintTracer<'s> {
    pub fn new(source: &'s str, verbosity: Verbosity, colors: Colors) -> Self {
        Self {
            source,
            verbosity,
            lines: Vec::new(),
            depth: 0,
            section: None,
            colors,
        }
    }

    pub fn lines(&self) -> &[String] {
        &self.lines
    }

    /// Collected trace, one event per line.
    pub fn dump(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            out.push_str(line);
            out.push('\n');
        }
        out
    }

    /// Print all trace lines.
    pub fn print(&self) {
        for line in &self.lines {
            println!("{}", line);
        }
    }

    fn indent(&self) -> String {
        "  ".repeat(self.depth)
    }

    fn tag(&self, phase: PhaseKind) -> String {
        if self.section == Some(phase) {
            String::new()
        } else {
            format!(" [{phase}]")
        }
    }

    fn excerpt(&self, pos: usize, end: usize) -> String {
        let c = &self.colors;
        let text = self.source.get(pos..end).unwrap_or("?");
        let shown: String = if text.chars().count() > TEXT_BUDGET {
            let mut s: String = text.chars().take(TEXT_BUDGET - 1).collect();
            s.push('…');
            s
        } else {
            text.to_string()
        };
        format!(" {}{}{:?}{}", c.meta, c.matched, shown, c.reset)
    }
}

impl Tracer for PrintTracer<'_> {
    fn trace_phase(&mut self, phase: PhaseKind, rule: &str, pos: usize) {
        let c = self.colors;
        if !self.lines.is_empty() {
            self.lines.push(String::new());
        }
        self.section = Some(phase);
        self.depth = 0;
        self.lines.push(format!(
            "{}{phase}{} {rule} {}@{pos}{}",
            c.rule, c.reset, c.meta, c.reset
        ));
    }

    fn trace_enter(&mut self, phase: PhaseKind, rule: &str, pos: usize) {
        let c = self.colors;
        let line = format!(
            "{}{}{rule}{} {}@{pos}{}{}",
            self.indent(),
            c.rule,
            c.reset,
            c.meta,
            c.reset,
            self.tag(phase)
        );
        self.lines.push(line);
        self.depth += 1;
    }

    fn trace_exit(&mut self, phase: PhaseKind, rule: &str, pos: usize, end: Option<usize>) {
        let c = self.colors;
        self.depth = self.depth.saturating_sub(1);
        let line = match end {
            Some(end) => {
                let text = if self.verbosity == Verbosity::VeryVerbose {
                    self.excerpt(pos, end)
                } else {
                    String::new()
                };
                format!(
                    "{}{}✓{} {rule} {}{pos}..{end}{}{}{text}",
                    self.indent(),
                    c.matched,
                    c.reset,
                    c.meta,
                    c.reset,
                    self.tag(phase)
                )
            }
            None => format!(
                "{}{}✗{} {rule} {}@{pos}{}{}",
                self.indent(),
                c.failed,
                c.reset,
                c.meta,
                c.reset,
                self.tag(phase)
            ),
        };
        self.lines.push(line);
    }

    fn trace_memo_hit(&mut self, phase: PhaseKind, rule: &str, pos: usize, end: Option<usize>) {
        if self.verbosity == Verbosity::Default {
            return;
        }
        let c = self.colors;
        let outcome = match end {
            Some(end) => format!("{pos}..{end}"),
            None => format!("@{pos} fail"),
        };
        let line = format!(
            "{}{}= {rule} {outcome}{}{}",
            self.indent(),
            c.meta,
            c.reset,
            self.tag(phase)
        );
        self.lines.push(line);
    }
}
