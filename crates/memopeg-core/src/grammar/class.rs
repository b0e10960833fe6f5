//! Character classes over code points.

/// Set of code point ranges, optionally negated.
///
/// Written in bracket notation without the brackets: `"a-zA-Z_"`. A `-` between
/// two characters forms a range; leading or trailing `-` is literal. Escapes:
/// `\n \t \r \0`, any other escaped character stands for itself.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CharClass {
    ranges: Vec<(char, char)>,
    negated: bool,
}

enum Atom {
    Char(char),
    Dash,
}

impl CharClass {
    pub fn new(spec: &str) -> Self {
        Self {
            ranges: parse_ranges(spec),
            negated: false,
        }
    }

    pub fn negated(spec: &str) -> Self {
        Self {
            ranges: parse_ranges(spec),
            negated: true,
        }
    }

    pub fn is_negated(&self) -> bool {
        self.negated
    }

    pub fn ranges(&self) -> &[(char, char)] {
        &self.ranges
    }

    #[inline]
    pub fn matches(&self, ch: char) -> bool {
        let hit = self.ranges.iter().any(|&(lo, hi)| lo <= ch && ch <= hi);
        hit != self.negated
    }
}

fn parse_ranges(spec: &str) -> Vec<(char, char)> {
    let mut atoms = Vec::new();
    let mut chars = spec.chars();
    while let Some(c) = chars.next() {
        let atom = match c {
            '\\' => match chars.next() {
                Some('n') => Atom::Char('\n'),
                Some('t') => Atom::Char('\t'),
                Some('r') => Atom::Char('\r'),
                Some('0') => Atom::Char('\0'),
                Some(other) => Atom::Char(other),
                None => Atom::Char('\\'),
            },
            '-' => Atom::Dash,
            other => Atom::Char(other),
        };
        atoms.push(atom);
    }

    let mut ranges = Vec::new();
    let mut i = 0;
    while i < atoms.len() {
        match (&atoms[i], atoms.get(i + 1), atoms.get(i + 2)) {
            (Atom::Char(lo), Some(Atom::Dash), Some(Atom::Char(hi))) => {
                ranges.push(((*lo).min(*hi), (*lo).max(*hi)));
                i += 3;
            }
            (Atom::Char(c), _, _) => {
                ranges.push((*c, *c));
                i += 1;
            }
            (Atom::Dash, _, _) => {
                ranges.push(('-', '-'));
                i += 1;
            }
        }
    }
    ranges
}

fn push_escaped(out: &mut String, c: char) {
    match c {
        '\n' => out.push_str("\\n"),
        '\t' => out.push_str("\\t"),
        '\r' => out.push_str("\\r"),
        '\0' => out.push_str("\\0"),
        '\\' | ']' | '-' | '^' => {
            out.push('\\');
            out.push(c);
        }
        _ => out.push(c),
    }
}

impl std::fmt::Display for CharClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let mut out = String::from("[");
        if self.negated {
            out.push('^');
        }
        for &(lo, hi) in &self.ranges {
            push_escaped(&mut out, lo);
            if lo != hi {
                out.push('-');
                push_escaped(&mut out, hi);
            }
        }
        out.push(']');
        f.write_str(&out)
    }
}
