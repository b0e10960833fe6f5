//! Dense recognition memo with delta-encoded entries.
//!
//! One `Delta` per (offset, rule), laid out row by row so a rule's entries at
//! one offset sit next to each other. Both fields are relative to the entry's
//! start offset and shifted by one so that zero means "not computed":
//!
//! | field | 0            | `u32::MAX` | other `n`               |
//! |-------|--------------|------------|-------------------------|
//! | `pos` | not computed | no match   | matched `n - 1` bytes   |
//! | `err` | no failure   | -          | farthest failure `n - 1` bytes past start |

use memopeg_core::RuleId;

use super::error::RuntimeError;

const UNCOMPUTED: u32 = 0;
const NO_MATCH: u32 = u32::MAX;
const NO_ERR: u32 = 0;

/// Largest input whose deltas still fit below the sentinels.
pub(crate) const MAX_INPUT: usize = (u32::MAX - 2) as usize;

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub(crate) struct Delta {
    pos: u32,
    err: u32,
}

/// Decoded recognition result of one rule at one offset.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Recognized {
    /// End offset on a match.
    pub end: Option<usize>,
    /// Farthest offset at which any attempt inside the rule failed, even when
    /// the rule itself matched through another alternative.
    pub err: Option<usize>,
}

impl Recognized {
    pub(crate) const FAIL: Self = Self {
        end: None,
        err: None,
    };

    pub fn is_match(&self) -> bool {
        self.end.is_some()
    }
}

impl Delta {
    fn encode(start: usize, result: Recognized) -> Self {
        // Offsets never exceed the input length, which `Memo::new` bounded by MAX_INPUT.
        let pos = match result.end {
            Some(end) => (end - start) as u32 + 1,
            None => NO_MATCH,
        };
        let err = match result.err {
            Some(err) => (err - start) as u32 + 1,
            None => NO_ERR,
        };
        Self { pos, err }
    }

    fn decode(self, start: usize) -> Recognized {
        let end = match self.pos {
            NO_MATCH => None,
            n => Some(start + (n - 1) as usize),
        };
        let err = match self.err {
            NO_ERR => None,
            n => Some(start + (n - 1) as usize),
        };
        Recognized { end, err }
    }
}

/// Recognition table sized `(len + 1) × rules` up front.
pub(crate) struct Memo {
    deltas: Vec<Delta>,
    rules: usize,
    computed: usize,
}

impl Memo {
    pub(crate) fn new(len: usize, rules: usize) -> Result<Self, RuntimeError> {
        if len > MAX_INPUT {
            return Err(RuntimeError::InputTooLarge(len));
        }
        let size = (len + 1)
            .checked_mul(rules)
            .ok_or(RuntimeError::InputTooLarge(len))?;
        Ok(Self {
            deltas: vec![Delta::default(); size],
            rules,
            computed: 0,
        })
    }

    #[inline]
    fn slot(&self, pos: usize, rule: RuleId) -> usize {
        pos * self.rules + rule.index()
    }

    #[inline]
    pub(crate) fn get(&self, pos: usize, rule: RuleId) -> Option<Recognized> {
        let delta = self.deltas[self.slot(pos, rule)];
        (delta.pos != UNCOMPUTED).then(|| delta.decode(pos))
    }

    /// Store a result. Entries are written once; later writes are ignored.
    pub(crate) fn set(&mut self, pos: usize, rule: RuleId, result: Recognized) {
        let slot = self.slot(pos, rule);
        if self.deltas[slot].pos != UNCOMPUTED {
            return;
        }
        self.deltas[slot] = Delta::encode(pos, result);
        self.computed += 1;
    }

    pub(crate) fn computed(&self) -> usize {
        self.computed
    }
}
