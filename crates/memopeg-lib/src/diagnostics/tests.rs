use memopeg_core::Span;

use super::*;

fn diag(start: usize, end: usize, source: &str, expected: &[&str]) -> Diagnostic {
    Diagnostic::expected(
        Span::new(start, end),
        LineCol::of(source, start),
        expected.iter().map(|s| s.to_string()).collect(),
    )
}

#[test]
fn line_col_ascii() {
    let source = "ab\ncd\n\nef";

    assert_eq!(LineCol::of(source, 0), LineCol { line: 1, col: 1 });
    assert_eq!(LineCol::of(source, 2), LineCol { line: 1, col: 3 });
    assert_eq!(LineCol::of(source, 3), LineCol { line: 2, col: 1 });
    assert_eq!(LineCol::of(source, 6), LineCol { line: 3, col: 1 });
    assert_eq!(LineCol::of(source, 9), LineCol { line: 4, col: 3 });
}

#[test]
fn line_col_counts_characters() {
    let source = "é→x";

    assert_eq!(LineCol::of(source, 2), LineCol { line: 1, col: 2 });
    assert_eq!(LineCol::of(source, 5), LineCol { line: 1, col: 3 });
    // Inside `→`, and past the end.
    assert_eq!(LineCol::of(source, 3), LineCol { line: 1, col: 2 });
    assert_eq!(LineCol::of(source, 100), LineCol { line: 1, col: 4 });
}

#[test]
fn expected_messages() {
    insta::assert_snapshot!(diag(0, 0, "", &[]).message(), @"unexpected input");
    insta::assert_snapshot!(diag(0, 0, "", &["number"]).message(), @"expected number");
    insta::assert_snapshot!(
        diag(0, 0, "", &["word", r#"")""#, "word"]).message(),
        @r#"expected one of ")", word"#
    );
}

#[test]
fn display_plain() {
    let source = "foo\n  bar";
    let d = diag(6, 9, source, &["end of input"]);

    insta::assert_snapshot!(d.to_string(), @"error at 6..9 (2:3): expected end of input");
}

#[test]
fn diagnostics_collection_methods() {
    let source = "hello world";
    let mut diagnostics = Diagnostics::new();
    assert!(diagnostics.is_empty());

    diagnostics.push(diag(0, 5, source, &["a"]));
    diagnostics.push(diag(6, 11, source, &["b"]));

    assert_eq!(diagnostics.len(), 2);
    assert_eq!(diagnostics.first().unwrap().message(), "expected a");
    let messages: Vec<&str> = diagnostics.iter().map(|d| d.message()).collect();
    assert_eq!(messages, ["expected a", "expected b"]);

    let collected: Diagnostics = diagnostics.clone().into_iter().collect();
    assert_eq!(collected, diagnostics);
}

#[test]
fn printer_without_source() {
    let source = "hello world";
    let diagnostics: Diagnostics = [diag(0, 5, source, &["a"]), diag(6, 11, source, &["b"])]
        .into_iter()
        .collect();

    insta::assert_snapshot!(diagnostics.printer().render(), @r"
    error at 0..5 (1:1): expected a
    error at 6..11 (1:7): expected b
    ");
}

#[test]
fn printer_with_source() {
    let source = "hello world!";
    let diagnostics: Diagnostics = [diag(6, 11, source, &["greeting"])].into_iter().collect();

    insta::assert_snapshot!(diagnostics.render(source), @r"
    error: expected greeting
      |
    1 | hello world!
      |       ^^^^^
    ");
}

#[test]
fn printer_with_path() {
    let source = "hello world";
    let diagnostics: Diagnostics = [diag(0, 5, source, &["x"])].into_iter().collect();

    let result = diagnostics.printer().source(source).path("test.tt").render();
    insta::assert_snapshot!(result, @r"
    error: expected x
     --> test.tt:1:1
      |
    1 | hello world
      | ^^^^^
    ");
}

#[test]
fn printer_zero_width_span() {
    let source = "hello";
    let diagnostics: Diagnostics = [diag(0, 0, source, &["y"])].into_iter().collect();

    insta::assert_snapshot!(diagnostics.render(source), @r"
    error: expected y
      |
    1 | hello
      | ^
    ");
}

#[test]
fn printer_zero_width_at_end() {
    let source = "[";
    let diagnostics: Diagnostics = [diag(1, 1, source, &["]"])].into_iter().collect();

    let result = diagnostics.render(source);
    assert!(result.starts_with("error: expected ]"));
    assert!(result.contains("1 | ["));
}

#[test]
fn printer_multiple_diagnostics() {
    let source = "hello world!";
    let diagnostics: Diagnostics = [diag(0, 5, source, &["a"]), diag(6, 10, source, &["b"])]
        .into_iter()
        .collect();

    insta::assert_snapshot!(diagnostics.render(source), @r"
    error: expected a
      |
    1 | hello world!
      | ^^^^^

    error: expected b
      |
    1 | hello world!
      |       ^^^^
    ");
}

#[test]
fn printer_colored() {
    let source = "hello";
    let diagnostics: Diagnostics = [diag(0, 5, source, &["z"])].into_iter().collect();

    let result = diagnostics.render_colored(source, true);
    assert!(result.contains("expected z"));
    assert!(result.contains('\x1b'));
}

#[test]
fn printer_empty_diagnostics() {
    let diagnostics = Diagnostics::new();
    assert!(diagnostics.render("source").is_empty());
}
