//! Small grammars shared by the engine tests.

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use memopeg_core::grammar::dsl::*;
use memopeg_core::{Env, Grammar, GrammarBuilder, RuleId, Span, Value};

/// Value type of the test grammars.
#[derive(Clone, Debug, PartialEq)]
pub(crate) enum Val {
    Text(String, Span),
    List(Vec<Val>),
    None,
    Num(i64),
}

impl Value for Val {
    fn text(text: &str, span: Span) -> Self {
        Val::Text(text.to_string(), span)
    }

    fn list(items: Vec<Self>) -> Self {
        Val::List(items)
    }

    fn none() -> Self {
        Val::None
    }
}

impl Val {
    pub(crate) fn num(&self) -> i64 {
        match self {
            Val::Num(n) => *n,
            other => panic!("expected a number, got {other:?}"),
        }
    }
}

/// ```text
/// Sum <- _ l:Num (_ "+" _ r:Num)* _      { l + r... }
/// Num "number" <- [0-9]+                 token { parse }
/// _ <- [ ]*                              token
/// ```
pub(crate) struct Arith {
    pub grammar: Grammar<Val>,
    pub sum: RuleId,
    pub num: RuleId,
}

pub(crate) fn arith() -> Arith {
    let mut g = GrammarBuilder::<Val>::new();
    let sum = g.declare("Sum");
    let num = g.declare("Num");
    let ws = g.declare("_");

    g.define(
        sum,
        action(
            seq([
                rule(ws),
                label("l", rule(num)),
                star(seq([rule(ws), lit("+"), rule(ws), label("r", rule(num))])),
                rule(ws),
            ]),
            |env: &mut Env<'_, Val>| {
                let first = env.take("l").map_or(0, |v| v.num());
                let rest: i64 = env.take_all("r").iter().map(Val::num).sum();
                Val::Num(first + rest)
            },
        ),
    );
    g.define(
        num,
        action(plus(class("0-9")), |env: &mut Env<'_, Val>| {
            Val::Num(env.text().parse().unwrap_or_default())
        }),
    )
    .token()
    .expected("number");
    g.define(ws, star(lit(" "))).token();

    Arith {
        grammar: g.build().unwrap(),
        sum,
        num,
    }
}

/// ```text
/// List <- _ "(" Item* _ ")"
/// Item <- List / Atom
/// Atom <- _ Word
/// Word "word" <- [a-z]+     token
/// _ <- [ \n]*               token
/// ```
pub(crate) struct Lists {
    pub grammar: Grammar<()>,
    pub list: RuleId,
    pub word: RuleId,
}

pub(crate) fn lists() -> Lists {
    let mut g = GrammarBuilder::<()>::new();
    let list = g.declare("List");
    let item = g.declare("Item");
    let atom = g.declare("Atom");
    let word = g.declare("Word");
    let ws = g.declare("_");

    g.define(
        list,
        seq([rule(ws), lit("("), star(rule(item)), rule(ws), lit(")")]),
    );
    g.define(item, choice([rule(list), rule(atom)]));
    g.define(atom, seq([rule(ws), rule(word)]));
    g.define(word, plus(class("a-z"))).token().expected("word");
    g.define(ws, star(class(" \\n"))).token();

    Lists {
        grammar: g.build().unwrap(),
        list,
        word,
    }
}

/// ```text
/// Start <- A "x" / A "y"
/// A <- "a"          { count }
/// ```
pub(crate) struct Counted {
    pub grammar: Grammar<Val>,
    pub start: RuleId,
    pub calls: Arc<AtomicUsize>,
}

pub(crate) fn counted() -> Counted {
    let calls = Arc::new(AtomicUsize::new(0));
    let mut g = GrammarBuilder::<Val>::new();
    let start = g.declare("Start");
    let a = g.declare("A");

    g.define(
        start,
        choice([seq([rule(a), lit("x")]), seq([rule(a), lit("y")])]),
    );
    let counter = Arc::clone(&calls);
    g.define(
        a,
        action(lit("a"), move |env: &mut Env<'_, Val>| {
            counter.fetch_add(1, Ordering::SeqCst);
            Val::Text(env.text().to_string(), env.span())
        }),
    );

    Counted {
        grammar: g.build().unwrap(),
        start,
        calls,
    }
}
