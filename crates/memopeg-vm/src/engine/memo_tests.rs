use memopeg_core::RuleId;

use super::error::RuntimeError;
use super::memo::{MAX_INPUT, Memo, Recognized};

const A: RuleId = RuleId::new(0);
const B: RuleId = RuleId::new(1);

#[test]
fn uncomputed_entries_are_absent() {
    let memo = Memo::new(4, 2).unwrap();

    assert_eq!(memo.get(0, A), None);
    assert_eq!(memo.get(4, B), None);
    assert_eq!(memo.computed(), 0);
}

#[test]
fn epsilon_match_is_not_uncomputed() {
    let mut memo = Memo::new(4, 2).unwrap();
    let eps = Recognized {
        end: Some(3),
        err: None,
    };
    memo.set(3, A, eps);

    assert_eq!(memo.get(3, A), Some(eps));
    assert_eq!(memo.get(3, B), None);
}

#[test]
fn failure_and_farthest_error_round_trip() {
    let mut memo = Memo::new(10, 2).unwrap();
    let failed = Recognized {
        end: None,
        err: Some(9),
    };
    let matched = Recognized {
        end: Some(10),
        err: Some(10),
    };
    memo.set(2, B, failed);
    memo.set(0, A, matched);

    assert_eq!(memo.get(2, B), Some(failed));
    assert_eq!(memo.get(0, A), Some(matched));
    assert_eq!(memo.get(2, A), None);
    assert_eq!(memo.computed(), 2);
}

#[test]
fn entries_are_written_once() {
    let mut memo = Memo::new(3, 1).unwrap();
    let first = Recognized {
        end: Some(1),
        err: Some(1),
    };
    memo.set(0, A, first);
    memo.set(0, A, Recognized::FAIL);

    assert_eq!(memo.get(0, A), Some(first));
    assert_eq!(memo.computed(), 1);
}

#[test]
fn input_too_large() {
    let err = Memo::new(MAX_INPUT + 1, 1).err();
    assert_eq!(err, Some(RuntimeError::InputTooLarge(MAX_INPUT + 1)));
}
