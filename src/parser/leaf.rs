//! Terminal parsers: the only places diagnostics are created.

use std::fmt;
use std::num::IntErrorKind;
use std::sync::Arc;

use super::combinators::Parser;
use super::context::{Element, Failure, ParseContext, ParseResult};
use super::diagnostic::Code;
use super::value::{IntoValue, Shape, Value};

/// A leaf parser.
///
/// On empty input a terminal reports [`Code::UnexpectedEndOfInput`], on a
/// mismatch [`Code::UnexpectedInput`], and in both cases leaves the cursor
/// where it was.
pub trait Terminal<E>: Send + Sync {
    fn shape(&self) -> Shape;

    fn parse(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<Value>;

    /// Same as [`parse`](Terminal::parse) without building the value.
    fn recognize(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<()> {
        self.parse(ctx).map(drop)
    }
}

/// Matches exactly `element`.
struct Exact<E> {
    element: E,
    expected: String,
}

impl<E: Element> Exact<E> {
    fn matches(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<()> {
        match ctx.input().first() {
            None => {
                ctx.report(Code::UnexpectedEndOfInput, self.expected.as_str());
                Err(Failure::Mismatch)
            }
            Some(found) if *found != self.element => {
                ctx.report(Code::UnexpectedInput, self.expected.as_str());
                Err(Failure::Mismatch)
            }
            Some(_) => {
                ctx.consume(1);
                Ok(())
            }
        }
    }
}

impl<E: Element> Terminal<E> for Exact<E> {
    fn shape(&self) -> Shape {
        Shape::scalar::<E>()
    }

    fn parse(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<Value> {
        self.matches(ctx)?;
        Ok(Value::scalar(self.element.clone()))
    }

    fn recognize(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<()> {
        self.matches(ctx)
    }
}

type Predicate<E> = Arc<dyn Fn(&E) -> bool + Send + Sync>;

/// Matches any single element the predicate accepts.
struct Satisfy<E> {
    predicate: Predicate<E>,
    expected: String,
}

impl<E: Element> Terminal<E> for Satisfy<E> {
    fn shape(&self) -> Shape {
        Shape::scalar::<E>()
    }

    fn parse(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<Value> {
        match ctx.input().first() {
            None => {
                ctx.report(Code::UnexpectedEndOfInput, self.expected.as_str());
                Err(Failure::Mismatch)
            }
            Some(found) if !(self.predicate)(found) => {
                ctx.report(Code::UnexpectedInput, self.expected.as_str());
                Err(Failure::Mismatch)
            }
            Some(found) => {
                let value = Value::scalar(found.clone());
                ctx.consume(1);
                Ok(value)
            }
        }
    }
}

/// Matches a run of elements.
struct Literal<E> {
    elements: Vec<E>,
    expected: String,
    value: Value,
}

impl<E: Element> Literal<E> {
    fn matches(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<()> {
        let input = ctx.input();
        if input.is_empty() && !self.elements.is_empty() {
            ctx.report(Code::UnexpectedEndOfInput, self.expected.as_str());
            return Err(Failure::Mismatch);
        }
        if !input.starts_with(&self.elements) {
            ctx.report(Code::UnexpectedInput, self.expected.as_str());
            return Err(Failure::Mismatch);
        }
        ctx.consume(self.elements.len());
        Ok(())
    }
}

impl<E: Element> Terminal<E> for Literal<E> {
    fn shape(&self) -> Shape {
        if self.value.as_scalar::<String>().is_some() {
            Shape::scalar::<String>()
        } else {
            Shape::List(Box::new(Shape::scalar::<E>()))
        }
    }

    fn parse(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<Value> {
        self.matches(ctx)?;
        Ok(self.value.clone())
    }

    fn recognize(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<()> {
        self.matches(ctx)
    }
}

/// Primitive integer types the [`integer`] leaf can produce.
pub trait Integer: IntoValue + Copy + fmt::Debug + Send + Sync {
    const SIGNED: bool;

    fn from_digits(digits: &str, radix: u32) -> Result<Self, IntErrorKind>;
}

macro_rules! integer_impl {
    ($signed:literal => $($ty:ty),+) => {
        $(
            impl Integer for $ty {
                const SIGNED: bool = $signed;

                fn from_digits(digits: &str, radix: u32) -> Result<Self, IntErrorKind> {
                    <$ty>::from_str_radix(digits, radix).map_err(|err| err.kind().clone())
                }
            }
        )+
    };
}

integer_impl!(true => i8, i16, i32, i64, i128, isize);
integer_impl!(false => u8, u16, u32, u64, u128, usize);

struct IntegerLeaf<T> {
    radix: u32,
    _marker: std::marker::PhantomData<fn() -> T>,
}

const EXPECTED_INTEGER: &str = "an integer";

impl<T: Integer> IntegerLeaf<T> {
    /// Length of the longest prefix that looks like an integer: an optional
    /// minus sign (signed types only) followed by digits of the radix.
    fn scan(&self, input: &[char]) -> Option<usize> {
        let sign = usize::from(T::SIGNED && input.first() == Some(&'-'));
        let digits = input[sign..]
            .iter()
            .take_while(|c| c.is_digit(self.radix))
            .count();
        (digits > 0).then_some(sign + digits)
    }

    fn read(&self, ctx: &mut ParseContext<'_, char>) -> ParseResult<T> {
        let input = ctx.input();
        if input.is_empty() {
            ctx.report(Code::UnexpectedEndOfInput, EXPECTED_INTEGER);
            return Err(Failure::Mismatch);
        }
        let Some(len) = self.scan(input) else {
            ctx.report(Code::UnexpectedInput, EXPECTED_INTEGER);
            return Err(Failure::Mismatch);
        };
        let digits: String = input[..len].iter().collect();
        match T::from_digits(&digits, self.radix) {
            Ok(value) => {
                ctx.consume(len);
                Ok(value)
            }
            Err(IntErrorKind::PosOverflow | IntErrorKind::NegOverflow) => {
                ctx.report(
                    Code::OutOfRange,
                    format!(
                        "an integer in range of {}",
                        std::any::type_name::<T>()
                    ),
                );
                Err(Failure::Mismatch)
            }
            Err(_) => {
                ctx.report(Code::UnexpectedInput, EXPECTED_INTEGER);
                Err(Failure::Mismatch)
            }
        }
    }
}

impl<T: Integer> Terminal<char> for IntegerLeaf<T> {
    fn shape(&self) -> Shape {
        T::shape()
    }

    fn parse(&self, ctx: &mut ParseContext<'_, char>) -> ParseResult<Value> {
        self.read(ctx).map(IntoValue::into_value)
    }

    fn recognize(&self, ctx: &mut ParseContext<'_, char>) -> ParseResult<()> {
        self.read(ctx).map(drop)
    }
}

/// Produces a value without looking at the input.
struct Constant {
    value: Value,
    shape: Shape,
}

impl<E: Element> Terminal<E> for Constant {
    fn shape(&self) -> Shape {
        self.shape.clone()
    }

    fn parse(&self, _: &mut ParseContext<'_, E>) -> ParseResult<Value> {
        Ok(self.value.clone())
    }

    fn recognize(&self, _: &mut ParseContext<'_, E>) -> ParseResult<()> {
        Ok(())
    }
}

/// Succeeds only once the input is exhausted.
struct End;

impl<E: Element> Terminal<E> for End {
    fn shape(&self) -> Shape {
        Shape::Nothing
    }

    fn parse(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<Value> {
        if ctx.is_at_end() {
            Ok(Value::Nothing)
        } else {
            ctx.report(Code::UnexpectedInput, "end of input");
            Err(Failure::Mismatch)
        }
    }
}

/// Matches the character `c`.
pub fn ch(c: char) -> Parser<char> {
    Parser::terminal(Exact {
        element: c,
        expected: format!("'{c}'"),
    })
}

/// Matches one character accepted by `predicate`; `what` names it in
/// diagnostics.
pub fn satisfy<F>(predicate: F, what: &str) -> Parser<char>
where
    F: Fn(char) -> bool + Send + Sync + 'static,
{
    Parser::terminal(Satisfy {
        predicate: Arc::new(move |c: &char| predicate(*c)),
        expected: what.to_string(),
    })
}

/// One whitespace character: space, tab, carriage return or line feed.
pub fn ws() -> Parser<char> {
    satisfy(|c| matches!(c, ' ' | '\t' | '\n' | '\r'), "whitespace")
}

/// Matches `text` exactly and produces it as a `String`.
pub fn literal(text: &str) -> Parser<char> {
    Parser::terminal(Literal {
        elements: text.chars().collect(),
        expected: format!("'{text}'"),
        value: Value::text(text),
    })
}

/// A decimal integer of type `T`; signed types accept a leading `-`.
pub fn integer<T: Integer>() -> Parser<char> {
    integer_radix::<T>(10)
}

/// An integer of type `T` written in `radix` (2..=36).
///
/// # Panics
///
/// Panics if `radix` is outside `2..=36`.
pub fn integer_radix<T: Integer>(radix: u32) -> Parser<char> {
    assert!(
        (2..=36).contains(&radix),
        "integer radix must be in 2..=36, got {radix}"
    );
    Parser::terminal(IntegerLeaf::<T> {
        radix,
        _marker: std::marker::PhantomData,
    })
}

/// Produces `value` without consuming input.
pub fn constant<E: Element, T: IntoValue>(value: T) -> Parser<E> {
    Parser::terminal(Constant {
        value: value.into_value(),
        shape: T::shape(),
    })
}

/// Matches exactly `element`.
pub fn element<E: Element>(element: E) -> Parser<E> {
    let expected = format!("'{}'", element.describe());
    Parser::terminal(Exact { element, expected })
}

/// Matches any one element accepted by `predicate`.
pub fn element_if<E, F>(predicate: F, what: &str) -> Parser<E>
where
    E: Element,
    F: Fn(&E) -> bool + Send + Sync + 'static,
{
    Parser::terminal(Satisfy {
        predicate: Arc::new(predicate),
        expected: what.to_string(),
    })
}

/// Matches the run `elements` and produces them as a list.
pub fn sequence_of<E: Element>(elements: Vec<E>) -> Parser<E> {
    let expected = format!(
        "'{}'",
        elements
            .iter()
            .map(Element::describe)
            .collect::<Vec<_>>()
            .join(" ")
    );
    let value = Value::List(elements.iter().cloned().map(Value::scalar).collect());
    Parser::terminal(Literal {
        elements,
        expected,
        value,
    })
}

/// Succeeds at the end of input, produces nothing.
pub fn end<E: Element>() -> Parser<E> {
    Parser::terminal(End)
}
