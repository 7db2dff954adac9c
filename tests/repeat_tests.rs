use braid::parser::{ch, integer, many, satisfy, ws, Code, ParseContext, Shape, Value};

#[test]
fn zero_or_more_never_fails() {
    let input: Vec<char> = "bbb".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    let value = ch('a').many().parse_in(&mut ctx).unwrap();
    assert_eq!(value, Value::text(""));
    assert_eq!(ctx.consumed(), 0);
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn repeated_chars_become_a_string() {
    let letters = satisfy(|c| c.is_ascii_lowercase(), "a letter");
    assert_eq!(letters.clone().many().shape(), &Shape::scalar::<String>());
    assert_eq!(letters.many1().parse_as::<String>("abc1"), Ok("abc".to_string()));
}

#[test]
fn repeated_values_become_a_list() {
    let number = integer::<i32>() - ws().ignore().many();
    assert_eq!(
        number.many().parse_as::<Vec<i32>>("1 22 333"),
        Ok(vec![1, 22, 333])
    );
}

#[test]
fn repeated_nothing_is_nothing() {
    let spaces = many(ws().ignore());
    assert_eq!(spaces.shape(), &Shape::Nothing);
    assert_eq!(spaces.parse("   x"), Ok(Value::Nothing));
}

#[test]
fn one_or_more_reports_the_first_miss() {
    let failure = ch('a').many1().parse("b").unwrap_err();
    assert_eq!(failure.len(), 1);
    assert_eq!(failure.diagnostics[0].code, Code::UnexpectedInput);
    assert_eq!(failure.diagnostics[0].expected, "'a'");
}

#[test]
fn bounded_repetition_stops_at_the_maximum() {
    let input: Vec<char> = "aaaaa".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    let value = ch('a').repeat(2..=3).parse_in(&mut ctx).unwrap();
    assert_eq!(value, Value::text("aaa"));
    assert_eq!(ctx.rest(), "aa");
}

#[test]
fn exclusive_upper_bound() {
    assert_eq!(ch('a').repeat(..2).parse_as::<String>("aaa"), Ok("a".to_string()));
}

#[test]
fn missing_minimum_leaves_cursor_at_failing_attempt() {
    let pair = ch('a') >> ch('b');
    let input: Vec<char> = "abac".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    assert!(pair.repeat(2..).parse_in(&mut ctx).is_err());
    assert_eq!(ctx.consumed(), 3);
    assert_eq!(ctx.diagnostics().len(), 1);
    assert_eq!(ctx.diagnostics()[0].expected, "'b'");
}

#[test]
fn extra_repetitions_are_speculative() {
    let pair = ch('a') >> ch('b');
    let input: Vec<char> = "ababac".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    let value = pair.many().parse_in(&mut ctx).unwrap();
    assert_eq!(
        value,
        Value::List(vec![
            Value::Record(vec![Value::scalar('a'), Value::scalar('b')]),
            Value::Record(vec![Value::scalar('a'), Value::scalar('b')]),
        ])
    );
    assert_eq!(ctx.rest(), "ac");
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn repetition_that_consumes_nothing_terminates() {
    let parser = ch('a').optional().many();
    assert_eq!(
        parser.parse("b"),
        Ok(Value::List(vec![Value::Optional(None)]))
    );
}

#[test]
#[should_panic(expected = "empty repetition range")]
fn empty_range_panics() {
    #[allow(clippy::reversed_empty_ranges)]
    let _ = ch('a').repeat(3..=2);
}
