//! Invariant checks excluded from coverage reports.

#![cfg_attr(coverage_nightly, coverage(off))]

/// Every heavier phase replays a rule the recognizer already accepted, so
/// both must stop at the same offset.
#[inline]
pub(crate) fn ensure_replay_agrees(rule: &str, pos: usize, recognized: usize, replayed: usize) {
    assert_eq!(
        recognized, replayed,
        "phase disagreement on {rule}@{pos}: recognizer ended at {recognized}, replay at {replayed}"
    );
}

#[inline]
pub(crate) fn ensure_err_not_before_start(rule: &str, start: usize, err: usize) {
    assert!(
        err >= start,
        "failure offset {err} of {rule} is before its start {start}"
    );
}
