//! Palette for `PrintTracer` output.
//!
//! Each slot names what it paints in a trace line, not a hue:
//! `rule` for phase headers and rule names, `matched` for consumed text and `✓` exits,
//! `failed` for `✗` exits, `meta` for offsets and memo-hit markers.

/// ANSI escapes per trace role; empty strings when color is off.
///
/// Sticks to the 16 standard codes so it reads in light and dark terminals.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Colors {
    pub rule: &'static str,
    pub matched: &'static str,
    pub failed: &'static str,
    pub meta: &'static str,
    pub reset: &'static str,
}

impl Default for Colors {
    fn default() -> Self {
        Self::OFF
    }
}

impl Colors {
    pub const ON: Self = Self {
        rule: "\x1b[34m",
        matched: "\x1b[32m",
        failed: "\x1b[31m",
        meta: "\x1b[2m",
        reset: "\x1b[0m",
    };

    pub const OFF: Self = Self {
        rule: "",
        matched: "",
        failed: "",
        meta: "",
        reset: "",
    };

    pub fn new(enabled: bool) -> Self {
        if enabled { Self::ON } else { Self::OFF }
    }

    pub fn is_enabled(&self) -> bool {
        !self.reset.is_empty()
    }
}
