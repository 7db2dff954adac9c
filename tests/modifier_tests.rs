use braid::parser::{
    ch, integer, literal, optional, satisfy, ws, Code, GrammarError, ParseContext, Shape, Value,
};

#[test]
fn optional_absent_leaves_input_untouched() {
    let input: Vec<char> = "b".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    let value = ch('a').optional().parse_in(&mut ctx).unwrap();
    assert_eq!(value, Value::Optional(None));
    assert_eq!(ctx.rest(), "b");
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn optional_present_wraps_the_value() {
    assert_eq!(
        optional(integer::<i32>()).parse_as::<Option<i32>>("9"),
        Ok(Some(9))
    );
}

#[test]
fn optional_is_idempotent() {
    let twice = ch('a').optional().optional();
    assert_eq!(twice.shape(), &Shape::Optional(Box::new(Shape::scalar::<char>())));
}

#[test]
fn optional_of_nothing_stays_nothing() {
    let parser = ch(';').ignore().optional();
    assert_eq!(parser.shape(), &Shape::Nothing);
    assert_eq!(parser.parse(";"), Ok(Value::Nothing));
    assert_eq!(parser.parse("x"), Ok(Value::Nothing));
}

#[test]
fn ignore_discards_the_value() {
    let parser = integer::<i32>().ignore();
    assert_eq!(parser.shape(), &Shape::Nothing);
    assert_eq!(parser.parse("123"), Ok(Value::Nothing));
    assert!(parser.parse("x").is_err());
}

#[test]
fn ignore_is_idempotent() {
    let once = literal("abc").ignore();
    let twice = once.clone().ignore();
    assert_eq!(format!("{once:?}"), format!("{twice:?}"));
    assert_eq!(twice.parse("abc"), Ok(Value::Nothing));
}

#[test]
fn label_replaces_expected_text_only() {
    let parser = literal("class").label("keyword");
    let failure = parser.parse("struct").unwrap_err();

    assert_eq!(failure.len(), 1);
    let diagnostic = &failure.diagnostics[0];
    assert_eq!(diagnostic.expected, "keyword");
    assert_eq!(diagnostic.code, Code::UnexpectedInput);
    assert_eq!(diagnostic.offset(), 0);
}

#[test]
fn relabeling_replaces_the_label() {
    let parser = ch('x').label("first").label("second");
    let failure = parser.parse("y").unwrap_err();
    assert_eq!(failure.diagnostics[0].expected, "second");
}

#[test]
fn label_applies_to_the_deepest_failure() {
    let parser = (ch('a') >> ch('b')).label("pair");
    let failure = parser.parse("ax").unwrap_err();
    assert_eq!(failure.diagnostics[0].expected, "pair");
    assert_eq!(failure.diagnostics[0].offset(), 1);
}

#[test]
fn label_does_not_touch_success() {
    assert_eq!(ch('a').label("letter a").parse_as::<char>("a"), Ok('a'));
}

#[test]
fn map_transforms_the_result() {
    let parser = (integer::<i32>() >> ch('+').ignore() >> integer::<i32>())
        .map(|(lhs, rhs): (i32, i32)| lhs + rhs);
    assert_eq!(parser.shape(), &Shape::scalar::<i32>());
    assert_eq!(parser.parse_as::<i32>("2+3"), Ok(5));
}

#[test]
fn map_failure_propagates_untouched() {
    let parser = integer::<i32>().map(|n: i32| n * 2);
    let failure = parser.parse("x").unwrap_err();
    assert_eq!(failure.diagnostics[0].expected, "an integer");
}

#[test]
fn map_rejects_a_mismatched_input_type() {
    let result = integer::<i32>().try_map(|s: String| s.len());
    assert!(matches!(result, Err(GrammarError::ShapeMismatch { .. })));
}

#[test]
#[should_panic(expected = "expected a parser producing")]
fn map_panics_on_mismatch() {
    let _ = ch('a').map(|n: u64| n + 1);
}

#[test]
fn map_can_take_the_raw_value() {
    let parser = (ch('a') | integer::<i32>()).map(|value: Value| match value {
        Value::Union { index, .. } => index,
        _ => usize::MAX,
    });
    assert_eq!(parser.parse_as::<usize>("7"), Ok(1));
}

#[test]
fn to_replaces_the_result() {
    let parser = literal("true").to(true) | literal("false").to(false);
    assert_eq!(parser.shape(), &Shape::scalar::<bool>());
    assert_eq!(parser.parse_as::<bool>("false"), Ok(false));
}

#[test]
fn wrap_skips_surroundings() {
    let blanks = ws().ignore().many();
    let input: Vec<char> = "  42 \n;".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    let value = integer::<i32>().wrap(blanks).parse_in(&mut ctx).unwrap();
    assert_eq!(value, Value::scalar(42i32));
    assert_eq!(ctx.rest(), ";");
}

#[test]
fn separated_by_collects_items() {
    let list = integer::<i32>().separated_by(ch(','));
    assert_eq!(list.parse_as::<Vec<i32>>("1,2,3"), Ok(vec![1, 2, 3]));
    assert_eq!(list.parse_as::<Vec<i32>>("7"), Ok(vec![7]));
}

#[test]
fn separated_by_leaves_a_dangling_separator() {
    let list = integer::<i32>().separated_by(ch(','));
    let input: Vec<char> = "1,2,".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    let value = list.parse_in(&mut ctx).unwrap();
    assert_eq!(value.extract::<Vec<i32>>(), Some(vec![1, 2]));
    assert_eq!(ctx.rest(), ",");
}

#[test]
fn separated_chars_join_into_a_string() {
    let letter = satisfy(|c| c.is_ascii_alphabetic(), "a letter");
    let word = letter.separated_by(ch('-'));
    assert_eq!(word.shape(), &Shape::scalar::<String>());
    assert_eq!(word.parse_as::<String>("a-b-c"), Ok("abc".to_string()));
}

#[test]
fn separated_by_keeps_records_intact() {
    let pair = ch('k') >> integer::<u8>();
    let pairs = pair.separated_by(ch(' '));
    assert_eq!(
        pairs.parse_as::<Vec<(char, u8)>>("k1 k2"),
        Ok(vec![('k', 1), ('k', 2)])
    );
}
