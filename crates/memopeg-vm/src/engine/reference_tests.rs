//! Memoized phases checked against a direct, cache-free recursive descent.

use memopeg_core::grammar::dsl::*;
use memopeg_core::{Cursor, Grammar, GrammarBuilder, Production, RuleId};

use super::test_grammars::{arith, lists};
use super::{Recognized, Session};

/// Plain backtracking recognizer: re-evaluates every rule call from scratch.
struct Reference<'g, V> {
    grammar: &'g Grammar<V>,
    cursor: Cursor<'g>,
}

impl<'g, V> Reference<'g, V> {
    fn new(grammar: &'g Grammar<V>, text: &'g str) -> Self {
        Self {
            grammar,
            cursor: Cursor::new(text.as_bytes()),
        }
    }

    fn rule(&self, id: RuleId, pos: usize) -> Recognized {
        let rule = self.grammar.rule(id);
        let mut err = None;
        let end = self.expr(rule.production(), pos, &mut err);
        if rule.is_token() && end.is_some() {
            err = Some(pos);
        }
        Recognized { end, err }
    }

    fn expr(&self, production: &Production<V>, pos: usize, err: &mut Option<usize>) -> Option<usize> {
        let miss = |err: &mut Option<usize>| *err = (*err).max(Some(pos));
        match production {
            Production::Literal(lit) => {
                if self.cursor.starts_with(pos, lit.as_bytes()) {
                    Some(pos + lit.len())
                } else {
                    miss(err);
                    None
                }
            }
            Production::Class(class) => {
                let scalar = self.cursor.next(pos);
                if !scalar.is_none() && class.matches(scalar.ch) {
                    Some(pos + scalar.width)
                } else {
                    miss(err);
                    None
                }
            }
            Production::Any => {
                let scalar = self.cursor.next(pos);
                if scalar.is_none() {
                    miss(err);
                    None
                } else {
                    Some(pos + scalar.width)
                }
            }
            Production::Seq(items) => {
                let mut at = pos;
                for item in items {
                    at = self.expr(item, at, err)?;
                }
                Some(at)
            }
            Production::Choice(alts) => alts.iter().find_map(|alt| self.expr(alt, pos, err)),
            Production::Star(child) | Production::Plus(child) => {
                let mut at = pos;
                let mut count = 0;
                while let Some(end) = self.expr(child, at, err) {
                    count += 1;
                    if end == at {
                        break;
                    }
                    at = end;
                }
                if matches!(production, Production::Plus(_)) && count == 0 {
                    return None;
                }
                Some(at)
            }
            Production::Opt(child) => Some(self.expr(child, pos, err).unwrap_or(pos)),
            Production::Pos(child) => self.expr(child, pos, err).map(|_| pos),
            Production::Neg(child) => match self.expr(child, pos, err) {
                Some(_) => {
                    miss(err);
                    None
                }
                None => Some(pos),
            },
            Production::Label(_, child) | Production::Action(child, _) => self.expr(child, pos, err),
            Production::Ref(id) => {
                let result = self.rule(*id, pos);
                *err = (*err).max(result.err);
                result.end
            }
        }
    }
}

/// ```text
/// Doc <- (!"end" Line)* "end" !.
/// Line <- [^\n]* "\n"
/// ```
fn lines() -> (Grammar<()>, RuleId) {
    let mut g = GrammarBuilder::<()>::new();
    let doc = g.declare("Doc");
    let line = g.declare("Line");
    g.define(
        doc,
        seq([
            star(seq([neg(lit("end")), rule(line)])),
            lit("end"),
            neg(any()),
        ]),
    );
    g.define(line, seq([star(not_class("\\n")), lit("\n")]));
    (g.build().unwrap(), doc)
}

fn rule_ids<V>(grammar: &Grammar<V>) -> Vec<RuleId> {
    grammar.rules().map(|r| r.id()).collect()
}

fn check_transparent<V>(grammar: &Grammar<V>, text: &str) {
    let reference = Reference::new(grammar, text);
    let ids = rule_ids(grammar);
    let offsets: Vec<usize> = (0..=text.len()).filter(|&p| text.is_char_boundary(p)).collect();

    let mut forward = Session::new(grammar, text).unwrap();
    for &pos in &offsets {
        for &id in &ids {
            assert_eq!(
                forward.accept(id, pos).unwrap(),
                reference.rule(id, pos),
                "{} at {pos} in {text:?}",
                grammar.name(id)
            );
        }
    }

    let mut backward = Session::new(grammar, text).unwrap();
    for &pos in offsets.iter().rev() {
        for &id in ids.iter().rev() {
            assert_eq!(
                backward.accept(id, pos).unwrap(),
                reference.rule(id, pos),
                "{} at {pos} in {text:?}, reverse order",
                grammar.name(id)
            );
        }
    }
}

const LIST_INPUTS: &[&str] = &[
    "",
    "(",
    "(a",
    "()",
    "(a (b",
    "a",
    "(a b))",
    "( a\n(b c) d)",
    "(1)",
    "((((x))))",
];

const SUM_INPUTS: &[&str] = &["", "1", "1 + 22", "1 +", "+", "1 + + 2", "12 34", " 7 "];

const DOC_INPUTS: &[&str] = &["end", "a\nend", "a\nb\nen", "endx", "a\nend\n", "é\nend", "x"];

#[test]
fn memo_is_transparent() {
    let g = lists();
    for text in LIST_INPUTS {
        check_transparent(&g.grammar, text);
    }

    let g = arith();
    for text in SUM_INPUTS {
        check_transparent(&g.grammar, text);
    }

    let (grammar, _) = lines();
    for text in DOC_INPUTS {
        check_transparent(&grammar, text);
    }
}

#[test]
fn parsing_is_deterministic() {
    let g = lists();
    for text in LIST_INPUTS {
        let mut first = Session::new(&g.grammar, text).unwrap();
        let mut second = Session::new(&g.grammar, text).unwrap();

        assert_eq!(first.accept(g.list, 0), second.accept(g.list, 0));
        assert_eq!(first.last_fail(), second.last_fail());

        let a = first.tree(g.list, 0).unwrap().map(|(end, n)| (end, first.dump_tree(&n)));
        let b = second.tree(g.list, 0).unwrap().map(|(end, n)| (end, second.dump_tree(&n)));
        assert_eq!(a, b);

        if let Some(err) = first.last_fail() {
            assert_eq!(first.fail(g.list, 0, err), second.fail(g.list, 0, err));
        }
    }
}

#[test]
fn farthest_failure_is_reported() {
    let g = lists();
    for text in LIST_INPUTS {
        let expected = Reference::new(&g.grammar, text).rule(g.list, 0);
        let mut session = Session::new(&g.grammar, text).unwrap();
        session.accept(g.list, 0).unwrap();

        assert_eq!(session.last_fail(), expected.err, "{text:?}");

        let Some(err) = expected.err else {
            continue;
        };
        let fail = session.fail(g.list, 0, err).unwrap();
        assert!(!fail.expected().is_empty(), "{text:?}");
        assert!(fail.leaves().iter().all(|leaf| leaf.pos == err), "{text:?}");
    }

    let (grammar, doc) = lines();
    for text in DOC_INPUTS {
        let expected = Reference::new(&grammar, text).rule(doc, 0);
        let mut session = Session::new(&grammar, text).unwrap();
        session.accept(doc, 0).unwrap();

        assert_eq!(session.last_fail(), expected.err, "{text:?}");
        if let Some(err) = expected.err {
            assert!(!session.fail(doc, 0, err).unwrap().expected().is_empty(), "{text:?}");
        }
    }
}

#[test]
fn trees_cover_exactly_the_match() {
    let g = lists();
    for text in LIST_INPUTS {
        let mut session = Session::new(&g.grammar, text).unwrap();
        let recognized = session.accept(g.list, 0).unwrap();
        let built = session.tree(g.list, 0).unwrap();

        assert_eq!(built.as_ref().map(|(end, _)| *end), recognized.end, "{text:?}");
        if let Some((end, root)) = built {
            assert_eq!(root.text().to_string(), &text[..end], "{text:?}");
        }
    }

    let (grammar, doc) = lines();
    for text in DOC_INPUTS {
        let mut session = Session::new(&grammar, text).unwrap();
        if let Some((end, root)) = session.tree(doc, 0).unwrap() {
            assert_eq!(end, text.len());
            assert_eq!(root.text().to_string(), *text);
        }
    }
}
