//! Code point decoding over an immutable input buffer.
//!
//! Invalid UTF-8 and end-of-input decode to the same placeholder (`Scalar::NONE`,
//! width 0). Matchers only ever test `width > 0` before looking at the char, so
//! "ran past the end" and "hit garbage bytes" share one failure path.

/// One decoded code point and its encoded width in bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Scalar {
    pub ch: char,
    pub width: usize,
}

impl Scalar {
    /// Non-matching placeholder for end-of-input and invalid encoding.
    pub const NONE: Self = Self {
        ch: char::REPLACEMENT_CHARACTER,
        width: 0,
    };

    #[inline]
    pub fn is_none(&self) -> bool {
        self.width == 0
    }
}

/// Read-only view of the session's input.
#[derive(Clone, Copy, Debug)]
pub struct Cursor<'s> {
    bytes: &'s [u8],
}

impl<'s> Cursor<'s> {
    pub fn new(bytes: &'s [u8]) -> Self {
        Self { bytes }
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    #[inline]
    pub fn as_bytes(&self) -> &'s [u8] {
        self.bytes
    }

    /// Decode the code point starting at `pos`.
    pub fn next(&self, pos: usize) -> Scalar {
        let Some(&lead) = self.bytes.get(pos) else {
            return Scalar::NONE;
        };
        if lead < 0x80 {
            return Scalar {
                ch: lead as char,
                width: 1,
            };
        }
        let width = match lead {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Scalar::NONE,
        };
        let Some(encoded) = self.bytes.get(pos..pos + width) else {
            return Scalar::NONE;
        };
        // from_utf8 rejects overlong forms and surrogates the lead-byte table lets through
        match std::str::from_utf8(encoded) {
            Ok(s) => s.chars().next().map_or(Scalar::NONE, |ch| Scalar { ch, width }),
            Err(_) => Scalar::NONE,
        }
    }

    /// Whether the input at `pos` starts with `literal`.
    #[inline]
    pub fn starts_with(&self, pos: usize, literal: &[u8]) -> bool {
        self.bytes
            .get(pos..)
            .is_some_and(|rest| rest.starts_with(literal))
    }

    /// Text of `start..end`. Matched spans are always valid UTF-8, since every
    /// terminal only consumes complete code points or literal bytes.
    pub fn text(&self, start: usize, end: usize) -> &'s str {
        self.bytes
            .get(start..end)
            .and_then(|b| std::str::from_utf8(b).ok())
            .unwrap_or("")
    }
}
