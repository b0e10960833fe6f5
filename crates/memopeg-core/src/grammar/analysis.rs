//! Static checks run by `GrammarBuilder::build`.
//!
//! A packrat parser cannot terminate on a left-recursive rule: the rule would
//! call itself at the same offset before consuming anything. We find such
//! cycles up front from a nullable analysis.

use super::{Grammar, Production, RuleId};

/// Which rules can succeed without consuming input. Least fixpoint.
pub(crate) fn nullable_rules<V>(grammar: &Grammar<V>) -> Vec<bool> {
    let mut nullable = vec![false; grammar.len()];
    loop {
        let mut changed = false;
        for rule in grammar.rules() {
            let idx = rule.id().index();
            if !nullable[idx] && is_nullable(rule.production(), &nullable) {
                nullable[idx] = true;
                changed = true;
            }
        }
        if !changed {
            return nullable;
        }
    }
}

pub(crate) fn is_nullable<V>(production: &Production<V>, nullable: &[bool]) -> bool {
    match production {
        Production::Literal(lit) => lit.is_empty(),
        Production::Class(_) | Production::Any => false,
        Production::Seq(items) => items.iter().all(|p| is_nullable(p, nullable)),
        Production::Choice(alts) => alts.iter().any(|p| is_nullable(p, nullable)),
        Production::Star(_) | Production::Opt(_) | Production::Pos(_) | Production::Neg(_) => true,
        Production::Plus(p) | Production::Label(_, p) | Production::Action(p, _) => {
            is_nullable(p, nullable)
        }
        Production::Ref(id) => nullable[id.index()],
    }
}

/// Rules the production may call before consuming any input.
pub(crate) fn left_calls<V>(production: &Production<V>, nullable: &[bool], out: &mut Vec<RuleId>) {
    match production {
        Production::Literal(_) | Production::Class(_) | Production::Any => {}
        Production::Seq(items) => {
            for item in items {
                left_calls(item, nullable, out);
                if !is_nullable(item, nullable) {
                    break;
                }
            }
        }
        Production::Choice(alts) => {
            for alt in alts {
                left_calls(alt, nullable, out);
            }
        }
        Production::Star(p)
        | Production::Plus(p)
        | Production::Opt(p)
        | Production::Pos(p)
        | Production::Neg(p)
        | Production::Label(_, p)
        | Production::Action(p, _) => left_calls(p, nullable, out),
        Production::Ref(id) => {
            if !out.contains(id) {
                out.push(*id);
            }
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Mark {
    Unvisited,
    OnStack,
    Done,
}

/// First left-recursive cycle found, as rule names with the repeated rule at
/// both ends (`["A", "B", "A"]`).
pub(crate) fn find_left_recursion<V>(grammar: &Grammar<V>) -> Option<Vec<&'static str>> {
    let nullable = nullable_rules(grammar);
    let edges: Vec<Vec<RuleId>> = grammar
        .rules()
        .map(|rule| {
            let mut out = Vec::new();
            left_calls(rule.production(), &nullable, &mut out);
            out
        })
        .collect();

    let mut marks = vec![Mark::Unvisited; grammar.len()];
    let mut stack = Vec::new();
    for rule in grammar.rules() {
        if marks[rule.id().index()] == Mark::Unvisited
            && let Some(cycle) = visit(rule.id(), &edges, &mut marks, &mut stack)
        {
            return Some(cycle.into_iter().map(|id| grammar.name(id)).collect());
        }
    }
    None
}

fn visit(
    id: RuleId,
    edges: &[Vec<RuleId>],
    marks: &mut [Mark],
    stack: &mut Vec<RuleId>,
) -> Option<Vec<RuleId>> {
    marks[id.index()] = Mark::OnStack;
    stack.push(id);

    for &callee in &edges[id.index()] {
        match marks[callee.index()] {
            Mark::OnStack => {
                let from = stack
                    .iter()
                    .position(|&s| s == callee)
                    .unwrap_or_default();
                let mut cycle = stack[from..].to_vec();
                cycle.push(callee);
                return Some(cycle);
            }
            Mark::Unvisited => {
                if let Some(cycle) = visit(callee, edges, marks, stack) {
                    return Some(cycle);
                }
            }
            Mark::Done => {}
        }
    }

    stack.pop();
    marks[id.index()] = Mark::Done;
    None
}
