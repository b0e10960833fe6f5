use crate::Span;

#[test]
fn shift_and_cover() {
    let span = Span::new(2, 5);

    assert_eq!(span.len(), 3);
    assert_eq!(span.shift(10), Span::new(12, 15));
    assert_eq!(span.cover(Span::new(7, 9)), Span::new(2, 9));
    assert_eq!(Span::new(7, 9).cover(span), Span::new(2, 9));
    assert!(Span::empty(4).is_empty());
    assert_eq!(span.as_range(), 2..5);
}

#[test]
fn display_and_serialize() {
    let span = Span::new(3, 8);

    assert_eq!(span.to_string(), "3..8");
    assert_eq!(
        serde_json::to_value(span).unwrap(),
        serde_json::json!({ "start": 3, "end": 8 })
    );
}
