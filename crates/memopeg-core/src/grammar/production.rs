//! The closed set of production kinds.

use crate::{CharClass, Env};

use super::{Grammar, RuleId};

/// Semantic action run once a production fully matches.
///
/// `Send + Sync` so one grammar can serve independent sessions on several threads.
pub type ActionFn<V> = Box<dyn Fn(&mut Env<'_, V>) -> V + Send + Sync>;

/// Literal byte string.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Literal(Box<str>);

impl Literal {
    pub fn new(text: &str) -> Self {
        Self(text.into())
    }

    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        self.0.as_bytes()
    }

    #[inline]
    pub fn as_str(&self) -> &str {
        &self.0
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Production tree node.
///
/// Terminals (`Literal`, `Class`, `Any`) consume input; every other kind composes
/// children. `Opt` behaves as `Choice(child, ε)`, and the empty `Seq` is ε.
pub enum Production<V> {
    Literal(Literal),
    Class(CharClass),
    Any,
    Seq(Vec<Production<V>>),
    Choice(Vec<Production<V>>),
    Star(Box<Production<V>>),
    Plus(Box<Production<V>>),
    Opt(Box<Production<V>>),
    /// Positive lookahead `&e`.
    Pos(Box<Production<V>>),
    /// Negative lookahead `!e`.
    Neg(Box<Production<V>>),
    Label(&'static str, Box<Production<V>>),
    Ref(RuleId),
    Action(Box<Production<V>>, ActionFn<V>),
}

// Binding strength for rendering, loosest first.
const PREC_CHOICE: u8 = 0;
const PREC_SEQ: u8 = 1;
const PREC_PREFIX: u8 = 2;
const PREC_SUFFIX: u8 = 3;
const PREC_ATOM: u8 = 4;

impl<V> Production<V> {
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Literal(_) | Self::Class(_) | Self::Any)
    }

    fn precedence(&self) -> u8 {
        match self {
            Self::Choice(alts) if alts.len() > 1 => PREC_CHOICE,
            Self::Action(..) => PREC_CHOICE,
            Self::Seq(items) if items.len() > 1 => PREC_SEQ,
            Self::Pos(_) | Self::Neg(_) | Self::Label(..) => PREC_PREFIX,
            Self::Star(_) | Self::Plus(_) | Self::Opt(_) => PREC_SUFFIX,
            _ => PREC_ATOM,
        }
    }

    /// Write PEG notation for this production, parenthesized when it binds
    /// looser than `min`.
    pub(crate) fn render(&self, grammar: &Grammar<V>, min: u8, out: &mut String) {
        let wrap = self.precedence() < min;
        if wrap {
            out.push('(');
        }
        match self {
            Self::Literal(lit) => out.push_str(&format!("{:?}", lit.as_str())),
            Self::Class(class) => out.push_str(&class.to_string()),
            Self::Any => out.push('.'),
            Self::Seq(items) if items.is_empty() => out.push_str("()"),
            Self::Seq(items) => render_joined(grammar, items, " ", PREC_PREFIX, out),
            Self::Choice(alts) if alts.is_empty() => out.push_str("!()"),
            Self::Choice(alts) => render_joined(grammar, alts, " / ", PREC_SEQ, out),
            Self::Star(p) => render_suffix(grammar, p, '*', out),
            Self::Plus(p) => render_suffix(grammar, p, '+', out),
            Self::Opt(p) => render_suffix(grammar, p, '?', out),
            Self::Pos(p) => {
                out.push('&');
                p.render(grammar, PREC_SUFFIX, out);
            }
            Self::Neg(p) => {
                out.push('!');
                p.render(grammar, PREC_SUFFIX, out);
            }
            Self::Label(name, p) => {
                out.push_str(name);
                out.push(':');
                p.render(grammar, PREC_SUFFIX, out);
            }
            Self::Ref(id) => out.push_str(grammar.name(*id)),
            Self::Action(p, _) => {
                p.render(grammar, PREC_SEQ, out);
                out.push_str(" {…}");
            }
        }
        if wrap {
            out.push(')');
        }
    }
}

fn render_joined<V>(
    grammar: &Grammar<V>,
    items: &[Production<V>],
    sep: &str,
    min: u8,
    out: &mut String,
) {
    for (i, item) in items.iter().enumerate() {
        if i > 0 {
            out.push_str(sep);
        }
        item.render(grammar, min, out);
    }
}

fn render_suffix<V>(grammar: &Grammar<V>, p: &Production<V>, suffix: char, out: &mut String) {
    p.render(grammar, PREC_ATOM, out);
    out.push(suffix);
}

impl<V> std::fmt::Debug for Production<V> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Literal(lit) => f.debug_tuple("Literal").field(&lit.as_str()).finish(),
            Self::Class(class) => f.debug_tuple("Class").field(class).finish(),
            Self::Any => f.write_str("Any"),
            Self::Seq(items) => f.debug_tuple("Seq").field(items).finish(),
            Self::Choice(alts) => f.debug_tuple("Choice").field(alts).finish(),
            Self::Star(p) => f.debug_tuple("Star").field(p).finish(),
            Self::Plus(p) => f.debug_tuple("Plus").field(p).finish(),
            Self::Opt(p) => f.debug_tuple("Opt").field(p).finish(),
            Self::Pos(p) => f.debug_tuple("Pos").field(p).finish(),
            Self::Neg(p) => f.debug_tuple("Neg").field(p).finish(),
            Self::Label(name, p) => f.debug_tuple("Label").field(name).field(p).finish(),
            Self::Ref(id) => f.debug_tuple("Ref").field(&id.raw()).finish(),
            Self::Action(p, _) => f.debug_tuple("Action").field(p).finish(),
        }
    }
}
