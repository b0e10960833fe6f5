//! Tree phase: a lossless concrete tree over the accepted span.
//!
//! Trees are `rowan` green trees. A rule invocation becomes a node whose raw
//! kind is the rule id. Terminal matches become `Text` tokens; a token rule
//! becomes one token carrying the rule's id. Empty tokens are not emitted.

use rowan::{GreenNode, GreenToken, NodeOrToken};

use memopeg_core::{ActionFn, Cursor, Grammar, Production, RuleId};

use super::eval::{Phase, eval};
use super::invariants::ensure_replay_agrees;
use super::session::Session;
use super::trace::{PhaseKind, Tracer};

/// Raw kind of tokens produced by terminals. Never a rule id.
const TEXT_KIND: u16 = u16::MAX;

pub(crate) type GreenElement = NodeOrToken<GreenNode, GreenToken>;

/// Kind of a tree element.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreeKind {
    /// Node of a rule invocation, or token of a token rule.
    Rule(RuleId),
    /// Text consumed by a terminal.
    Text,
}

/// Language tag for Rowan's tree types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum TreeLang {}

impl rowan::Language for TreeLang {
    type Kind = TreeKind;

    fn kind_from_raw(raw: rowan::SyntaxKind) -> Self::Kind {
        match raw.0 {
            TEXT_KIND => TreeKind::Text,
            id => TreeKind::Rule(RuleId::new(id)),
        }
    }

    fn kind_to_raw(kind: Self::Kind) -> rowan::SyntaxKind {
        match kind {
            TreeKind::Rule(id) => rowan::SyntaxKind(id.raw()),
            TreeKind::Text => rowan::SyntaxKind(TEXT_KIND),
        }
    }
}

/// Type aliases for Rowan types parameterized by our language.
pub type SyntaxNode = rowan::SyntaxNode<TreeLang>;
pub type SyntaxToken = rowan::SyntaxToken<TreeLang>;
pub type SyntaxElement = rowan::NodeOrToken<SyntaxNode, SyntaxToken>;

/// Collects the children of one rule node.
struct TreeBuilder<'s, 'a, V, T> {
    session: &'s mut Session<'a, V, T>,
    children: Vec<GreenElement>,
}

impl<'a, V, T: Tracer> Session<'a, V, T> {
    /// Memoized tree of `id` at `pos`. `None` inside the pair means the rule
    /// matched but produced an empty token.
    pub(crate) fn node(&mut self, id: RuleId, pos: usize) -> Option<(usize, Option<GreenElement>)> {
        let end = self.recognize(id, pos).end?;
        if let Some(cached) = self.nodes.get(&(pos, id)) {
            let element = cached.clone();
            self.memo_hit(PhaseKind::Tree, id, pos, Some(end));
            return Some((end, element));
        }

        let grammar = self.grammar;
        let rule = grammar.rule(id);
        let kind = rowan::SyntaxKind(id.raw());
        let element = if rule.is_token() {
            (end > pos).then(|| NodeOrToken::Token(GreenToken::new(kind, self.cursor.text(pos, end))))
        } else {
            if !self.enter(PhaseKind::Tree, id, pos) {
                return None;
            }
            let mut builder = TreeBuilder {
                session: self,
                children: Vec::new(),
            };
            let replayed = eval(&mut builder, rule.production(), pos);
            let children = builder.children;
            self.exit(PhaseKind::Tree, id, pos, replayed.as_ref().map(|(e, ())| *e));
            if self.fatal.is_some() {
                return None;
            }
            let replayed_end = replayed.map_or(pos, |(e, ())| e);
            ensure_replay_agrees(rule.name(), pos, end, replayed_end);
            Some(NodeOrToken::Node(GreenNode::new(kind, children)))
        };

        self.nodes.insert((pos, id), element.clone());
        self.stats.trees += 1;
        Some((end, element))
    }

    /// Wrap a top-level element so every tree has a rule node at its root.
    pub(crate) fn root_node(&self, id: RuleId, element: Option<GreenElement>) -> GreenNode {
        let kind = rowan::SyntaxKind(id.raw());
        match element {
            Some(NodeOrToken::Node(node)) => node,
            Some(token) => GreenNode::new(kind, [token]),
            None => GreenNode::new(kind, []),
        }
    }

    /// Indented listing of a tree built by this session.
    pub fn dump_tree(&self, root: &SyntaxNode) -> String {
        dump(self.grammar, root)
    }
}

/// Indented listing: nodes with their byte range, tokens with their text.
pub fn dump<V>(grammar: &Grammar<V>, root: &SyntaxNode) -> String {
    let mut out = String::new();
    dump_node(grammar, root, 0, &mut out);
    out
}

fn dump_node<V>(grammar: &Grammar<V>, node: &SyntaxNode, indent: usize, out: &mut String) {
    let prefix = "  ".repeat(indent);
    let range = node.text_range();
    out.push_str(&format!(
        "{prefix}{} {}..{}\n",
        kind_name(grammar, node.kind()),
        u32::from(range.start()),
        u32::from(range.end())
    ));
    for child in node.children_with_tokens() {
        match child {
            NodeOrToken::Node(n) => dump_node(grammar, &n, indent + 1, out),
            NodeOrToken::Token(t) => {
                let child_prefix = "  ".repeat(indent + 1);
                match t.kind() {
                    TreeKind::Text => out.push_str(&format!("{child_prefix}{:?}\n", t.text())),
                    kind => out.push_str(&format!(
                        "{child_prefix}{} {:?}\n",
                        kind_name(grammar, kind),
                        t.text()
                    )),
                }
            }
        }
    }
}

fn kind_name<V>(grammar: &Grammar<V>, kind: TreeKind) -> &'static str {
    match kind {
        TreeKind::Rule(id) if id.index() < grammar.len() => grammar.name(id),
        TreeKind::Rule(_) => "?",
        TreeKind::Text => "text",
    }
}

impl<'a, V: 'a, T: Tracer> Phase<'a, V> for TreeBuilder<'_, 'a, V, T> {
    type Item = ();
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
        self.children.len()
    }

    #[inline]
    fn rewind(&mut self, mark: usize) {
        self.children.truncate(mark);
    }

    #[inline]
    fn discard(&mut self, mark: usize) {
        self.children.truncate(mark);
    }

    #[inline(always)]
    fn miss(&mut self, _pos: usize, _want: &'a Production<V>, _negated: bool) {}

    fn terminal(&mut self, start: usize, end: usize) {
        if end > start {
            let text = self.session.cursor.text(start, end);
            self.children.push(NodeOrToken::Token(GreenToken::new(
                rowan::SyntaxKind(TEXT_KIND),
                text,
            )));
        }
    }

    #[inline(always)]
    fn matched(&mut self, _start: usize, _end: usize) {}

    #[inline(always)]
    fn list(&mut self, _items: Vec<()>) {}

    #[inline(always)]
    fn none(&mut self) {}

    #[inline(always)]
    fn label(&mut self, _name: &'static str, _item: ()) {}

    #[inline(always)]
    fn action(&mut self, _mark: usize, _f: &'a ActionFn<V>, _start: usize, _end: usize) {}

    fn call(&mut self, rule: RuleId, pos: usize) -> Option<(usize, ())> {
        let (end, element) = self.session.node(rule, pos)?;
        self.children.extend(element);
        Some((end, ()))
    }
}
