use memopeg_core::grammar::dsl::*;
use memopeg_core::{Grammar, GrammarBuilder, RuleId};

use super::test_grammars::{arith, lists};
use super::{FuelLimits, Recognized, RuntimeError, Session};

fn recognized(end: Option<usize>, err: Option<usize>) -> Recognized {
    Recognized { end, err }
}

#[test]
fn farthest_failure_of_a_successful_rule() {
    let g = arith();
    let mut session = Session::new(&g.grammar, "1 + 22").unwrap();

    let result = session.accept(g.sum, 0).unwrap();

    // The last `(_ "+" ...)` attempt failed at the end of input.
    assert_eq!(result, recognized(Some(6), Some(6)));
    assert_eq!(session.last_fail(), Some(6));
}

#[test]
fn partial_match_reports_farther_failure() {
    let g = arith();
    let mut session = Session::new(&g.grammar, "1 +").unwrap();

    let result = session.accept(g.sum, 0).unwrap();

    assert_eq!(result, recognized(Some(2), Some(3)));
    assert_eq!(session.last_fail(), Some(3));
}

#[test]
fn memo_hits_do_not_recompute() {
    let g = arith();
    let mut session = Session::new(&g.grammar, "1 + 22").unwrap();

    let first = session.accept(g.sum, 0).unwrap();
    let computed = session.stats().recognized;
    let steps = session.stats().steps;
    let second = session.accept(g.sum, 0).unwrap();

    assert_eq!(first, second);
    assert_eq!(session.stats().recognized, computed);
    assert_eq!(session.stats().steps, steps);
}

#[test]
fn sub_rule_results_are_reused_by_callers() {
    let g = arith();
    let mut session = Session::new(&g.grammar, "1 + 22").unwrap();

    let num = session.accept(g.num, 4).unwrap();
    assert_eq!(num, recognized(Some(6), Some(4)));
    let computed = session.stats().recognized;

    session.accept(g.sum, 0).unwrap();
    assert!(session.stats().recognized > computed);
    assert_eq!(session.accept(g.num, 4).unwrap(), num);
}

struct Tokens {
    grammar: Grammar<()>,
    with_token: RuleId,
    without_token: RuleId,
}

fn tokens() -> Tokens {
    let mut g = GrammarBuilder::<()>::new();
    let with_token = g.declare("A");
    let without_token = g.declare("B");
    let tok = g.declare("Tok");
    let plain = g.declare("Plain");
    g.define(with_token, seq([rule(tok), lit("!")]));
    g.define(without_token, seq([rule(plain), lit("!")]));
    g.define(tok, plus(class("a-z"))).token();
    g.define(plain, plus(class("a-z")));
    Tokens {
        grammar: g.build().unwrap(),
        with_token,
        without_token,
    }
}

#[test]
fn matched_token_resets_farthest_failure_to_its_start() {
    let t = tokens();

    let mut session = Session::new(&t.grammar, "abc!").unwrap();
    assert_eq!(
        session.accept(t.with_token, 0).unwrap(),
        recognized(Some(4), Some(0))
    );
    assert_eq!(session.last_fail(), Some(0));

    let mut session = Session::new(&t.grammar, "abc!").unwrap();
    assert_eq!(
        session.accept(t.without_token, 0).unwrap(),
        recognized(Some(4), Some(3))
    );
    assert_eq!(session.last_fail(), Some(3));
}

#[test]
fn failure_after_a_token_is_still_reported() {
    let t = tokens();
    let mut session = Session::new(&t.grammar, "abc?").unwrap();

    assert_eq!(
        session.accept(t.with_token, 0).unwrap(),
        recognized(None, Some(3))
    );
    assert_eq!(session.last_fail(), Some(3));
}

#[test]
fn empty_repetition_step_stops_the_loop() {
    let mut g = GrammarBuilder::<()>::new();
    let s = g.declare("S");
    g.define(s, star(opt(lit("a"))));
    let grammar = g.build().unwrap();
    let mut session = Session::new(&grammar, "aab").unwrap();

    assert_eq!(session.accept(s, 0).unwrap().end, Some(2));
}

#[test]
fn lookahead_never_consumes() {
    let mut g = GrammarBuilder::<()>::new();
    let s = g.declare("S");
    let peek = g.declare("Peek");
    g.define(s, seq([pos(lit("a")), lit("a"), neg(lit("b"))]));
    g.define(peek, pos(lit("abc")));
    let grammar = g.build().unwrap();

    let mut session = Session::new(&grammar, "ac").unwrap();
    assert_eq!(session.accept(s, 0).unwrap(), recognized(Some(1), Some(1)));

    let mut session = Session::new(&grammar, "ab").unwrap();
    assert_eq!(session.accept(s, 0).unwrap(), recognized(None, Some(1)));

    let mut session = Session::new(&grammar, "abc").unwrap();
    assert_eq!(session.accept(peek, 0).unwrap(), recognized(Some(0), None));
}

#[test]
fn end_of_input_matches_no_class() {
    let mut g = GrammarBuilder::<()>::new();
    let s = g.declare("S");
    let t = g.declare("T");
    g.define(s, not_class("a"));
    g.define(t, any());
    let grammar = g.build().unwrap();
    let mut session = Session::new(&grammar, "é").unwrap();

    assert_eq!(session.accept(s, 0).unwrap(), recognized(Some(2), None));
    assert_eq!(session.accept(s, 2).unwrap(), recognized(None, Some(2)));
    assert_eq!(session.accept(t, 2).unwrap(), recognized(None, Some(2)));
}

#[test]
fn exec_fuel_is_sticky() {
    let g = arith();
    let mut session = Session::builder(&g.grammar, "1 + 22")
        .limits(FuelLimits::new().exec_fuel(3))
        .build()
        .unwrap();

    assert_eq!(session.accept(g.sum, 0), Err(RuntimeError::ExecFuelExhausted));
    assert_eq!(session.accept(g.num, 0), Err(RuntimeError::ExecFuelExhausted));
    assert_eq!(session.stats().steps, 3);
}

#[test]
fn recursion_limit() {
    let g = lists();
    let mut session = Session::builder(&g.grammar, "((((((a))))))")
        .limits(FuelLimits::new().recursion_limit(4))
        .build()
        .unwrap();

    assert_eq!(
        session.accept(g.list, 0),
        Err(RuntimeError::RecursionLimitExceeded)
    );

    let mut session = Session::new(&g.grammar, "((((((a))))))").unwrap();
    assert_eq!(session.accept(g.list, 0).unwrap().end, Some(13));
}

#[test]
fn recursion_limit_counts_nested_productions() {
    let g = lists();
    // List -> Seq -> Star -> Item -> Choice -> List: five frames per level.
    let text = format!("{}a{}", "(".repeat(60), ")".repeat(60));

    let mut session = Session::new(&g.grammar, &text).unwrap();
    assert_eq!(
        session.accept(g.list, 0),
        Err(RuntimeError::RecursionLimitExceeded)
    );

    let mut session = Session::builder(&g.grammar, &text)
        .limits(FuelLimits::new().recursion_limit(512))
        .build()
        .unwrap();
    assert_eq!(session.accept(g.list, 0).unwrap().end, Some(text.len()));
}

#[test]
fn deep_nesting_fails_cleanly_in_every_phase() {
    let g = lists();
    let text = format!("{}a{}", "(".repeat(5000), ")".repeat(5000));
    let mut session = Session::new(&g.grammar, &text).unwrap();

    assert_eq!(
        session.accept(g.list, 0),
        Err(RuntimeError::RecursionLimitExceeded)
    );
    assert_eq!(
        session.tree(g.list, 0).map(|t| t.is_some()),
        Err(RuntimeError::RecursionLimitExceeded)
    );
}

#[test]
fn default_limits() {
    let limits = FuelLimits::default();
    assert_eq!(limits.get_exec_fuel(), None);
    assert_eq!(limits.get_recursion_limit(), 256);
}
