//! One syntax error: where the parse stopped and what would have continued it.

use serde::Serialize;

use memopeg_core::Span;

/// 1-based line and column. Columns count characters, not bytes.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize)]
pub struct LineCol {
    pub line: usize,
    pub col: usize,
}

impl LineCol {
    /// Position of byte `offset` in `source`.
    ///
    /// An offset past the end maps to the end; one inside a multi-byte
    /// character maps to that character.
    pub fn of(source: &str, offset: usize) -> Self {
        let mut offset = offset.min(source.len());
        while !source.is_char_boundary(offset) {
            offset -= 1;
        }
        let before = &source[..offset];
        let line_start = before.rfind('\n').map_or(0, |i| i + 1);
        Self {
            line: before.matches('\n').count() + 1,
            col: before[line_start..].chars().count() + 1,
        }
    }
}

impl std::fmt::Display for LineCol {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.col)
    }
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct Diagnostic {
    /// Master-document range shown to the user.
    pub(crate) span: Span,
    /// Line and column within the parsed text.
    pub(crate) at: LineCol,
    pub(crate) message: String,
    /// Sorted, distinct descriptions of what would have matched.
    pub(crate) expected: Vec<String>,
}

impl Diagnostic {
    pub fn new(span: Span, at: LineCol, message: impl Into<String>) -> Self {
        Self {
            span,
            at,
            message: message.into(),
            expected: Vec::new(),
        }
    }

    /// "expected X" / "expected one of X, Y" diagnostic.
    pub fn expected(span: Span, at: LineCol, mut expected: Vec<String>) -> Self {
        expected.sort();
        expected.dedup();
        Self {
            span,
            at,
            message: expected_message(&expected),
            expected,
        }
    }

    pub fn span(&self) -> Span {
        self.span
    }

    pub fn line_col(&self) -> LineCol {
        self.at
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub fn expected_items(&self) -> &[String] {
        &self.expected
    }
}

fn expected_message(expected: &[String]) -> String {
    match expected {
        [] => "unexpected input".to_string(),
        [one] => format!("expected {one}"),
        many => format!("expected one of {}", many.join(", ")),
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "error at {}..{} ({}): {}",
            self.span.start, self.span.end, self.at, self.message
        )
    }
}
