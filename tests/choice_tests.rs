use braid::parser::{ch, integer, literal, Code, ParseContext, Shape, Value};

#[test]
fn only_the_last_branch_reports() {
    let parser = integer::<u32>() | literal("value");
    let failure = parser.parse("").unwrap_err();

    assert_eq!(failure.len(), 1);
    assert_eq!(failure.diagnostics[0].code, Code::UnexpectedEndOfInput);
    assert_eq!(failure.diagnostics[0].expected, "'value'");
}

#[test]
fn successful_branch_is_injected_into_the_union() {
    let parser = integer::<u32>() | literal("value");
    let input: Vec<char> = "value".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    let value = parser.parse_in(&mut ctx).unwrap();
    assert_eq!(
        value,
        Value::Union {
            index: 1,
            value: Box::new(Value::text("value")),
        }
    );
    assert!(ctx.is_at_end());
    assert!(ctx.diagnostics().is_empty());
}

#[test]
fn first_branch_lands_in_slot_zero() {
    let parser = integer::<u32>() | literal("value");
    assert_eq!(
        parser.parse("12"),
        Ok(Value::Union {
            index: 0,
            value: Box::new(Value::scalar(12u32)),
        })
    );
}

#[test]
fn identical_branch_types_are_not_wrapped() {
    let parser = ch('a') | ch('b') | ch('c');
    assert_eq!(parser.shape(), &Shape::scalar::<char>());
    assert_eq!(parser.parse_as::<char>("c"), Ok('c'));
}

#[test]
fn nested_choices_flatten() {
    let parser = (ch('a') | literal("bb")) | (integer::<i32>() | ch('z'));
    assert_eq!(
        parser.shape(),
        &Shape::Union(vec![
            Shape::scalar::<char>(),
            Shape::scalar::<String>(),
            Shape::scalar::<i32>(),
        ])
    );
    assert_eq!(
        parser.parse("z"),
        Ok(Value::Union {
            index: 0,
            value: Box::new(Value::scalar('z')),
        })
    );
}

#[test]
fn branch_producing_nothing_is_an_empty_variant() {
    let parser = ch('a') | ch('b').ignore();
    assert_eq!(
        parser.shape(),
        &Shape::Union(vec![Shape::scalar::<char>(), Shape::Nothing])
    );
    assert_eq!(
        parser.parse("b"),
        Ok(Value::Union {
            index: 1,
            value: Box::new(Value::Nothing),
        })
    );
}

#[test]
fn failed_branches_leave_no_trace() {
    let parser = literal("abc") | literal("abd");
    let input: Vec<char> = "abd!".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    assert_eq!(parser.parse_in(&mut ctx), Ok(Value::text("abd")));
    assert_eq!(ctx.rest(), "!");
    assert!(ctx.diagnostics().is_empty());
    assert_eq!(ctx.saved_states(), 0);
}

#[test]
fn last_branch_failure_leaves_cursor_where_it_failed() {
    let parser = literal("xy") | (ch('a') >> ch('b'));
    let input: Vec<char> = "ac".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    assert!(parser.parse_in(&mut ctx).is_err());
    assert_eq!(ctx.rest(), "c");
    assert_eq!(ctx.diagnostics().len(), 1);
    assert_eq!(ctx.diagnostics()[0].expected, "'b'");
}

#[test]
fn reporting_state_survives_a_choice() {
    let parser = ch('a') | ch('b');
    let input: Vec<char> = "b".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());
    ctx.set_reporting(false);

    assert!(parser.parse_in(&mut ctx).is_ok());
    assert!(!ctx.is_reporting());
}
