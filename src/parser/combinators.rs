use std::any::type_name;
use std::borrow::Cow;
use std::fmt;
use std::iter;
use std::ops::{BitOr, Bound, Mul, RangeBounds, Shr, Sub};
use std::sync::Arc;

use tracing::debug;

use super::config::ParseConfig;
use super::context::{Element, Failure, ParseContext, ParseResult};
use super::diagnostic::ParseFailure;
use super::error::GrammarError;
use super::leaf::{ch, literal, Terminal};
use super::reference::Slot;
use super::value::{FromValue, IntoValue, Shape, Value};

type MapFn = Arc<dyn Fn(Value) -> Value + Send + Sync>;

pub(crate) enum Node<E> {
    Terminal(Box<dyn Terminal<E>>),
    Sequence(Vec<Parser<E>>),
    /// `slots[i]` is where branch `i` lands in the union result.
    Choice {
        branches: Vec<Parser<E>>,
        slots: Vec<usize>,
    },
    Repeat {
        item: Parser<E>,
        min: usize,
        max: usize,
    },
    Optional(Parser<E>),
    Ignore(Parser<E>),
    Label {
        inner: Parser<E>,
        label: String,
    },
    Map {
        inner: Parser<E>,
        map: MapFn,
    },
    To {
        inner: Parser<E>,
        value: Value,
    },
    Reference(Arc<Slot<E>>),
}

impl<E> Node<E> {
    fn kind(&self) -> &'static str {
        match self {
            Node::Terminal(_) => "terminal",
            Node::Sequence(_) => "sequence",
            Node::Choice { .. } => "choice",
            Node::Repeat { .. } => "repeat",
            Node::Optional(_) => "optional",
            Node::Ignore(_) => "ignore",
            Node::Label { .. } => "label",
            Node::Map { .. } => "map",
            Node::To { .. } => "to",
            Node::Reference(_) => "reference",
        }
    }
}

/// An immutable, cheaply clonable parser over elements of type `E`.
///
/// Clones share the same node, so a grammar can be assembled once and used
/// from many places (and threads).
pub struct Parser<E> {
    pub(crate) node: Arc<Node<E>>,
    pub(crate) shape: Shape,
}

impl<E> Clone for Parser<E> {
    fn clone(&self) -> Self {
        Parser {
            node: Arc::clone(&self.node),
            shape: self.shape.clone(),
        }
    }
}

impl<E> fmt::Debug for Parser<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Parser")
            .field("kind", &self.node.kind())
            .field("shape", &self.shape)
            .finish()
    }
}

/// Input a parser can run over.
pub trait Source<E: Clone> {
    fn elements(&self) -> Cow<'_, [E]>;
}

impl Source<char> for str {
    fn elements(&self) -> Cow<'_, [char]> {
        Cow::Owned(self.chars().collect())
    }
}

impl Source<char> for String {
    fn elements(&self) -> Cow<'_, [char]> {
        self.as_str().elements()
    }
}

impl<E: Clone> Source<E> for [E] {
    fn elements(&self) -> Cow<'_, [E]> {
        Cow::Borrowed(self)
    }
}

impl<E: Clone> Source<E> for Vec<E> {
    fn elements(&self) -> Cow<'_, [E]> {
        Cow::Borrowed(self.as_slice())
    }
}

// === Construction ===

impl<E: Element> Parser<E> {
    pub(crate) fn new(node: Node<E>, shape: Shape) -> Self {
        Parser {
            node: Arc::new(node),
            shape,
        }
    }

    /// Wraps a custom leaf.
    pub fn terminal<T: Terminal<E> + 'static>(terminal: T) -> Self {
        let shape = terminal.shape();
        Parser::new(Node::Terminal(Box::new(terminal)), shape)
    }

    /// The result type this parser produces.
    pub fn shape(&self) -> &Shape {
        &self.shape
    }

    /// All `parts` in order. Nested sequences are spliced in rather than
    /// nested, so `a >> b >> c` is one flat sequence of three.
    pub fn sequence(parts: impl IntoIterator<Item = Parser<E>>) -> Self {
        let mut children = Vec::new();
        for part in parts {
            if let Node::Sequence(inner) = &*part.node {
                children.extend(inner.iter().cloned());
                continue;
            }
            children.push(part);
        }
        if children.len() == 1 {
            if let Some(only) = children.pop() {
                return only;
            }
        }
        let shape = Shape::sequence(children.iter().map(|child| &child.shape));
        Parser::new(Node::Sequence(children), shape)
    }

    /// Ordered choice between `branches`; nested choices are spliced in.
    ///
    /// # Panics
    ///
    /// Panics if `branches` is empty.
    pub fn choice(branches: impl IntoIterator<Item = Parser<E>>) -> Self {
        let mut flat = Vec::new();
        for branch in branches {
            if let Node::Choice { branches: inner, .. } = &*branch.node {
                flat.extend(inner.iter().cloned());
                continue;
            }
            flat.push(branch);
        }
        assert!(!flat.is_empty(), "a choice needs at least one branch");
        if flat.len() == 1 {
            if let Some(only) = flat.pop() {
                return only;
            }
        }
        let (shape, slots) = Shape::choice(flat.iter().map(|branch| &branch.shape));
        Parser::new(
            Node::Choice {
                branches: flat,
                slots,
            },
            shape,
        )
    }

    /// Sequence: parse `self` then `next`.
    pub fn then(self, next: Parser<E>) -> Self {
        Parser::sequence([self, next])
    }

    /// Choice: try `self`, if it fails try `other`.
    pub fn or(self, other: Parser<E>) -> Self {
        Parser::choice([self, other])
    }

    /// Keep left: parse `self` then `other`, discard `other`'s result.
    pub fn skip(self, other: Parser<E>) -> Self {
        self.then(other.ignore())
    }

    /// Keep right: parse `self` then `other`, discard `self`'s result.
    pub fn skip_left(self, other: Parser<E>) -> Self {
        self.ignore().then(other)
    }

    /// Between `range.start` and `range.end` repetitions, as many as match.
    ///
    /// # Panics
    ///
    /// Panics if the range is empty.
    pub fn repeat(self, range: impl RangeBounds<usize>) -> Self {
        let min = match range.start_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_add(1),
            Bound::Unbounded => 0,
        };
        let max = match range.end_bound() {
            Bound::Included(&n) => n,
            Bound::Excluded(&n) => n.saturating_sub(1),
            Bound::Unbounded => usize::MAX,
        };
        assert!(min <= max, "empty repetition range {min}..={max}");
        let shape = Shape::repeated(&self.shape);
        Parser::new(
            Node::Repeat {
                item: self,
                min,
                max,
            },
            shape,
        )
    }

    /// Zero or more.
    pub fn many(self) -> Self {
        self.repeat(..)
    }

    /// One or more.
    pub fn many1(self) -> Self {
        self.repeat(1..)
    }

    /// Zero or one; never fails on a mismatch.
    pub fn optional(self) -> Self {
        if matches!(&*self.node, Node::Optional(_)) {
            return self;
        }
        let shape = Shape::optional(&self.shape);
        Parser::new(Node::Optional(self), shape)
    }

    /// Parse, but produce nothing.
    pub fn ignore(self) -> Self {
        if matches!(&*self.node, Node::Ignore(_)) {
            return self;
        }
        Parser::new(Node::Ignore(self), Shape::Nothing)
    }

    /// On failure, report `label` as what was expected.
    pub fn label(self, label: &str) -> Self {
        if let Node::Label { inner, .. } = &*self.node {
            return inner.clone().label(label);
        }
        let shape = self.shape.clone();
        Parser::new(
            Node::Label {
                inner: self,
                label: label.to_string(),
            },
            shape,
        )
    }

    /// Transforms the result. The produced shape is `Out`'s.
    ///
    /// # Panics
    ///
    /// Panics if this parser's result does not convert into `In`; see
    /// [`try_map`](Parser::try_map).
    pub fn map<In, Out, F>(self, f: F) -> Self
    where
        In: FromValue + 'static,
        Out: IntoValue,
        F: Fn(In) -> Out + Send + Sync + 'static,
    {
        match self.try_map(f) {
            Ok(parser) => parser,
            Err(err) => panic!("{err}"),
        }
    }

    /// Like [`map`](Parser::map), but reports a closure whose argument type
    /// does not match this parser's result instead of panicking.
    pub fn try_map<In, Out, F>(self, f: F) -> Result<Self, GrammarError>
    where
        In: FromValue + 'static,
        Out: IntoValue,
        F: Fn(In) -> Out + Send + Sync + 'static,
    {
        if !In::accepts(&self.shape) {
            return Err(GrammarError::ShapeMismatch {
                expected: type_name::<In>().to_string(),
                found: self.shape.to_string(),
            });
        }
        Ok(self.map_value(Out::shape(), move |value| match In::from_value(value) {
            Some(input) => f(input).into_value(),
            None => unreachable!("value does not match the shape of its parser"),
        }))
    }

    fn map_value<F>(self, shape: Shape, map: F) -> Self
    where
        F: Fn(Value) -> Value + Send + Sync + 'static,
    {
        Parser::new(
            Node::Map {
                inner: self,
                map: Arc::new(map),
            },
            shape,
        )
    }

    /// Parse, then produce `value` instead of whatever was matched.
    pub fn to<T: IntoValue>(self, value: T) -> Self {
        Parser::new(
            Node::To {
                inner: self,
                value: value.into_value(),
            },
            T::shape(),
        )
    }

    /// `around`, then `self`, then `around` again; only `self` is kept.
    pub fn wrap(self, around: Parser<E>) -> Self {
        around.clone().ignore() >> self >> around.ignore()
    }

    /// One or more `self` separated by `separator`, aggregated like a
    /// repetition.
    pub fn separated_by(self, separator: Parser<E>) -> Self {
        let item = self.shape.clone();
        let rest = (separator.ignore() >> self.clone()).many();
        let shape = Shape::sequence([&self.shape, &rest.shape]);
        let joined = Parser::new(Node::Sequence(vec![self, rest]), shape);
        joined.map_value(Shape::repeated(&item), move |value| {
            join_separated(value, &item)
        })
    }
}

fn join_separated(value: Value, item: &Shape) -> Value {
    let Value::Record(mut parts) = value else {
        return value;
    };
    let (Some(rest), Some(first)) = (parts.pop(), parts.pop()) else {
        return Value::Nothing;
    };
    match (first, rest) {
        (Value::Scalar(head), Value::Scalar(tail)) if item.is_scalar::<char>() => {
            let mut text = String::new();
            text.extend(head.downcast_ref::<char>());
            text.push_str(tail.downcast_ref::<String>().map_or("", String::as_str));
            Value::text(text)
        }
        (first, Value::List(rest)) => Value::List(iter::once(first).chain(rest).collect()),
        (first, _) => Value::List(vec![first]),
    }
}

// === Running ===

impl<E: Element> Parser<E> {
    /// Runs against an existing context, producing the value.
    pub fn parse_in(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<Value> {
        self.run(ctx, true)
    }

    /// Runs against an existing context without building a value.
    pub fn recognize_in(&self, ctx: &mut ParseContext<'_, E>) -> ParseResult<()> {
        self.run(ctx, false).map(drop)
    }

    /// Parses `input` with the default [`ParseConfig`].
    ///
    /// The input does not have to be consumed entirely; end the grammar
    /// with [`end`](super::end) to demand that.
    pub fn parse(&self, input: &(impl Source<E> + ?Sized)) -> Result<Value, ParseFailure> {
        self.parse_with(input, ParseConfig::default())
    }

    pub fn parse_with(
        &self,
        input: &(impl Source<E> + ?Sized),
        config: ParseConfig,
    ) -> Result<Value, ParseFailure> {
        let elements = input.elements();
        let mut ctx = ParseContext::with_config(&*elements, config);
        debug!(elements = elements.len(), shape = %self.shape, "parse started");

        let result = self.run(&mut ctx, true);

        debug!(
            consumed = ctx.consumed(),
            diagnostics = ctx.diagnostics().len(),
            success = result.is_ok(),
            "parse finished"
        );
        match result {
            Ok(value) => Ok(value),
            Err(_) => Err(ParseFailure::new(ctx.into_diagnostics())),
        }
    }

    /// Parses `input` and converts the result into `T`.
    ///
    /// # Panics
    ///
    /// Panics if this parser's shape does not convert into `T`.
    pub fn parse_as<T: FromValue>(
        &self,
        input: &(impl Source<E> + ?Sized),
    ) -> Result<T, ParseFailure> {
        assert!(
            T::accepts(&self.shape),
            "parser produces `{}`, which does not convert into `{}`",
            self.shape,
            type_name::<T>()
        );
        match T::from_value(self.parse(input)?) {
            Some(value) => Ok(value),
            None => unreachable!("value does not match the shape of its parser"),
        }
    }

    pub(crate) fn run(&self, ctx: &mut ParseContext<'_, E>, want: bool) -> ParseResult<Value> {
        match &*self.node {
            Node::Terminal(terminal) => {
                if want {
                    terminal.parse(ctx)
                } else {
                    terminal.recognize(ctx).map(|()| Value::Nothing)
                }
            }
            Node::Sequence(children) => {
                let mut values = Vec::new();
                for child in children {
                    let keep = want && !child.shape.is_nothing();
                    let value = child.run(ctx, keep)?;
                    if keep {
                        values.push(value);
                    }
                }
                Ok(match values.len() {
                    0 => Value::Nothing,
                    1 => values.swap_remove(0),
                    _ => Value::Record(values),
                })
            }
            Node::Choice { branches, slots } => self.run_choice(ctx, want, branches, slots),
            Node::Repeat { item, min, max } => self.run_repeat(ctx, want, item, *min, *max),
            Node::Optional(inner) => {
                let keep = want && !self.shape.is_nothing();
                ctx.save_state();
                ctx.set_reporting(false);
                match inner.run(ctx, keep) {
                    Ok(value) => {
                        ctx.discard_saved_state();
                        Ok(if keep {
                            Value::Optional(Some(Box::new(value)))
                        } else {
                            Value::Nothing
                        })
                    }
                    Err(Failure::Mismatch) => {
                        ctx.restore_state();
                        Ok(if keep {
                            Value::Optional(None)
                        } else {
                            Value::Nothing
                        })
                    }
                    Err(Failure::Abort) => {
                        ctx.discard_saved_state();
                        Err(Failure::Abort)
                    }
                }
            }
            Node::Ignore(inner) => inner.run(ctx, false).map(|_| Value::Nothing),
            Node::Label { inner, label } => match inner.run(ctx, want) {
                Err(Failure::Mismatch) => {
                    ctx.relabel_last(label);
                    Err(Failure::Mismatch)
                }
                other => other,
            },
            Node::Map { inner, map } => {
                if want {
                    inner.run(ctx, true).map(|value| map(value))
                } else {
                    inner.run(ctx, false)
                }
            }
            Node::To { inner, value } => {
                inner.run(ctx, false)?;
                Ok(if want { value.clone() } else { Value::Nothing })
            }
            Node::Reference(slot) => slot.run(ctx, want),
        }
    }

    fn run_choice(
        &self,
        ctx: &mut ParseContext<'_, E>,
        want: bool,
        branches: &[Parser<E>],
        slots: &[usize],
    ) -> ParseResult<Value> {
        let Some((last, speculative)) = branches.split_last() else {
            return Err(Failure::Mismatch);
        };
        for (branch, &slot) in speculative.iter().zip(slots) {
            ctx.save_state();
            ctx.set_reporting(false);
            match branch.run(ctx, want) {
                Ok(value) => {
                    ctx.discard_saved_state();
                    return Ok(self.inject(slot, value, want));
                }
                Err(Failure::Mismatch) => ctx.restore_state(),
                Err(Failure::Abort) => {
                    ctx.discard_saved_state();
                    return Err(Failure::Abort);
                }
            }
        }
        let slot = slots.last().copied().unwrap_or_default();
        last.run(ctx, want)
            .map(|value| self.inject(slot, value, want))
    }

    fn inject(&self, slot: usize, value: Value, want: bool) -> Value {
        match &self.shape {
            Shape::Union(_) if want => Value::Union {
                index: slot,
                value: Box::new(value),
            },
            _ => value,
        }
    }

    fn run_repeat(
        &self,
        ctx: &mut ParseContext<'_, E>,
        want: bool,
        item: &Parser<E>,
        min: usize,
        max: usize,
    ) -> ParseResult<Value> {
        let keep = want && !self.shape.is_nothing();
        let mut items = Vec::new();
        for _ in 0..min {
            let value = item.run(ctx, keep)?;
            if keep {
                items.push(value);
            }
        }

        let mut count = min;
        while count < max {
            let before = ctx.consumed();
            ctx.save_state();
            ctx.set_reporting(false);
            match item.run(ctx, keep) {
                Ok(value) => {
                    ctx.discard_saved_state();
                    if keep {
                        items.push(value);
                    }
                    count += 1;
                    // An item that matched nothing would match forever.
                    if ctx.consumed() == before {
                        break;
                    }
                }
                Err(Failure::Mismatch) => {
                    ctx.restore_state();
                    break;
                }
                Err(Failure::Abort) => {
                    ctx.discard_saved_state();
                    return Err(Failure::Abort);
                }
            }
        }

        if !keep {
            return Ok(Value::Nothing);
        }
        if item.shape.is_scalar::<char>() {
            let text: String = items
                .iter()
                .filter_map(|value| value.as_scalar::<char>())
                .collect();
            return Ok(Value::text(text));
        }
        Ok(Value::List(items))
    }
}

// === Operator Overloading ===

/// `>>` for sequence: A >> B
impl<E: Element> Shr<Parser<E>> for Parser<E> {
    type Output = Parser<E>;

    fn shr(self, rhs: Parser<E>) -> Self::Output {
        self.then(rhs)
    }
}

/// `parser >> 'c'`
impl Shr<char> for Parser<char> {
    type Output = Parser<char>;

    fn shr(self, rhs: char) -> Self::Output {
        self.then(ch(rhs))
    }
}

/// `parser >> "text"`
impl<'a> Shr<&'a str> for Parser<char> {
    type Output = Parser<char>;

    fn shr(self, rhs: &'a str) -> Self::Output {
        self.then(literal(rhs))
    }
}

/// `'c' >> parser`
impl Shr<Parser<char>> for char {
    type Output = Parser<char>;

    fn shr(self, rhs: Parser<char>) -> Self::Output {
        ch(self).then(rhs)
    }
}

/// `"text" >> parser`
impl<'a> Shr<Parser<char>> for &'a str {
    type Output = Parser<char>;

    fn shr(self, rhs: Parser<char>) -> Self::Output {
        literal(self).then(rhs)
    }
}

/// `|` for choice: A | B
impl<E: Element> BitOr<Parser<E>> for Parser<E> {
    type Output = Parser<E>;

    fn bitor(self, rhs: Parser<E>) -> Self::Output {
        self.or(rhs)
    }
}

/// `-` for keep left: A - B -> A (parse B, discard result)
impl<E: Element> Sub<Parser<E>> for Parser<E> {
    type Output = Parser<E>;

    fn sub(self, rhs: Parser<E>) -> Self::Output {
        self.skip(rhs)
    }
}

/// `*` for keep right: A * B -> B (parse A, discard result)
impl<E: Element> Mul<Parser<E>> for Parser<E> {
    type Output = Parser<E>;

    fn mul(self, rhs: Parser<E>) -> Self::Output {
        self.skip_left(rhs)
    }
}

// === Free-standing forms ===

/// Parse zero or more occurrences
pub fn many<E: Element>(parser: Parser<E>) -> Parser<E> {
    parser.many()
}

/// Parse one or more occurrences
pub fn many1<E: Element>(parser: Parser<E>) -> Parser<E> {
    parser.many1()
}

/// Optional: parse zero or one
pub fn optional<E: Element>(parser: Parser<E>) -> Parser<E> {
    parser.optional()
}

/// Parse and discard
pub fn ignore<E: Element>(parser: Parser<E>) -> Parser<E> {
    parser.ignore()
}
