use braid::parser::{ch, integer, literal, Code, ParseContext, Position, Shape, Value};

#[test]
fn sequence_does_not_roll_back_on_failure() {
    let parser = literal("template") >> ch(' ') >> literal("class");
    let input: Vec<char> = "template struct".chars().collect();
    let mut ctx = ParseContext::new(input.as_slice());

    assert!(parser.parse_in(&mut ctx).is_err());
    assert_eq!(ctx.rest(), "struct");

    let diagnostics = ctx.diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].code, Code::UnexpectedInput);
    assert_eq!(diagnostics[0].expected, "'class'");
    assert_eq!(diagnostics[0].position, Position::new(9, 1, 10));
}

#[test]
fn chained_sequences_flatten_into_one_record() {
    let left = ch('a') >> ch('b');
    let right = ch('c') >> ch('d');
    let parser = left >> right >> integer::<i32>();

    assert_eq!(
        parser.shape(),
        &Shape::Record(vec![
            Shape::scalar::<char>(),
            Shape::scalar::<char>(),
            Shape::scalar::<char>(),
            Shape::scalar::<char>(),
            Shape::scalar::<i32>(),
        ])
    );
    assert_eq!(
        parser.parse_as::<(char, char, char, char, i32)>("abcd5"),
        Ok(('a', 'b', 'c', 'd', 5))
    );
}

#[test]
fn ignored_parts_drop_out_of_the_result() {
    let parser = ch('(').ignore() >> integer::<i32>() >> ch(')').ignore();
    assert_eq!(parser.shape(), &Shape::scalar::<i32>());
    assert_eq!(parser.parse("(12)"), Ok(Value::scalar(12i32)));
}

#[test]
fn sequence_of_ignored_parts_produces_nothing() {
    let parser = ch('a').ignore() >> ch('b').ignore();
    assert_eq!(parser.shape(), &Shape::Nothing);
    assert_eq!(parser.parse("ab"), Ok(Value::Nothing));
}

#[test]
fn text_operands_build_leaves() {
    let parser = '[' >> integer::<i32>() >> "..";
    assert_eq!(
        parser.parse_as::<(char, i32, String)>("[3.."),
        Ok(('[', 3, "..".to_string()))
    );
}

#[test]
fn keep_left_and_keep_right() {
    assert_eq!((ch('a') - ch('b')).parse_as::<char>("ab"), Ok('a'));
    assert_eq!((ch('a') * ch('b')).parse_as::<char>("ab"), Ok('b'));
    assert!((ch('a') - ch('b')).parse("aa").is_err());
}

#[test]
fn parse_does_not_require_full_consumption() {
    assert_eq!(ch('a').parse_as::<char>("abc"), Ok('a'));
}

#[test]
fn later_failure_reports_position_of_failing_part() {
    let parser = literal("let") >> ch('\n') >> literal("x");
    let failure = parser.parse("let\ny").unwrap_err();
    assert_eq!(failure.diagnostics[0].line(), 2);
    assert_eq!(failure.diagnostics[0].column(), 1);
    assert_eq!(failure.diagnostics[0].offset(), 4);
}
