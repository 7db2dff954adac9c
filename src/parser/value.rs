//! Runtime-typed parse results.
//!
//! Every parser carries a [`Shape`] computed when it is built and produces a
//! [`Value`] of that shape. The composition rules live on `Shape`:
//! sequences drop [`Shape::Nothing`] and collapse a single survivor, choices
//! deduplicate branch shapes, repetitions of `char` become `String`.

use std::any::{type_name, Any, TypeId};
use std::fmt;
use std::hash::{Hash, Hasher};
use std::sync::Arc;

/// Identity of a leaf value type.
#[derive(Clone, Copy)]
pub struct ScalarType {
    id: TypeId,
    name: &'static str,
}

impl ScalarType {
    pub fn of<T: Any>() -> Self {
        Self {
            id: TypeId::of::<T>(),
            name: type_name::<T>(),
        }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn is<T: Any>(&self) -> bool {
        self.id == TypeId::of::<T>()
    }
}

impl PartialEq for ScalarType {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id
    }
}

impl Eq for ScalarType {}

impl Hash for ScalarType {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.id.hash(state);
    }
}

impl fmt::Debug for ScalarType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name)
    }
}

/// The result type of a parser.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Shape {
    /// Consumes input, produces nothing.
    Nothing,
    Scalar(ScalarType),
    Record(Vec<Shape>),
    List(Box<Shape>),
    Optional(Box<Shape>),
    Union(Vec<Shape>),
}

impl Shape {
    pub fn scalar<T: Any>() -> Self {
        Shape::Scalar(ScalarType::of::<T>())
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Shape::Nothing)
    }

    pub fn is_scalar<T: Any>(&self) -> bool {
        matches!(self, Shape::Scalar(ty) if ty.is::<T>())
    }

    /// Result of running parsers of the given shapes one after another.
    pub fn sequence<'s>(children: impl IntoIterator<Item = &'s Shape>) -> Shape {
        let mut kept: Vec<Shape> = children
            .into_iter()
            .filter(|shape| !shape.is_nothing())
            .cloned()
            .collect();
        match kept.len() {
            0 => Shape::Nothing,
            1 => kept.remove(0),
            _ => Shape::Record(kept),
        }
    }

    /// Result of an ordered choice, together with the slot each branch's
    /// value lands in when the result is a [`Shape::Union`].
    pub fn choice<'s>(branches: impl IntoIterator<Item = &'s Shape>) -> (Shape, Vec<usize>) {
        let mut distinct: Vec<Shape> = Vec::new();
        let mut slots = Vec::new();
        for shape in branches {
            let slot = match distinct.iter().position(|known| known == shape) {
                Some(slot) => slot,
                None => {
                    distinct.push(shape.clone());
                    distinct.len() - 1
                }
            };
            slots.push(slot);
        }
        let shape = match distinct.len() {
            0 => Shape::Nothing,
            1 => distinct.remove(0),
            _ => Shape::Union(distinct),
        };
        (shape, slots)
    }

    /// Aggregate of repeating a parser of shape `item`.
    pub fn repeated(item: &Shape) -> Shape {
        if item.is_nothing() {
            Shape::Nothing
        } else if item.is_scalar::<char>() {
            Shape::scalar::<String>()
        } else {
            Shape::List(Box::new(item.clone()))
        }
    }

    pub fn optional(item: &Shape) -> Shape {
        if item.is_nothing() {
            Shape::Nothing
        } else {
            Shape::Optional(Box::new(item.clone()))
        }
    }
}

impl fmt::Display for Shape {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Shape::Nothing => f.write_str("()"),
            Shape::Scalar(ty) => f.write_str(ty.name()),
            Shape::Record(items) => {
                f.write_str("(")?;
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(", ")?;
                    }
                    write!(f, "{item}")?;
                }
                f.write_str(")")
            }
            Shape::List(item) => write!(f, "[{item}]"),
            Shape::Optional(item) => write!(f, "{item}?"),
            Shape::Union(items) => {
                for (i, item) in items.iter().enumerate() {
                    if i > 0 {
                        f.write_str(" | ")?;
                    }
                    write!(f, "{item}")?;
                }
                Ok(())
            }
        }
    }
}

type ErasedEq = fn(&(dyn Any + Send + Sync), &(dyn Any + Send + Sync)) -> bool;
type ErasedDebug = fn(&(dyn Any + Send + Sync), &mut fmt::Formatter<'_>) -> fmt::Result;

/// A type-erased leaf value: a character, an integer, a string, an AST node.
#[derive(Clone)]
pub struct Scalar {
    value: Arc<dyn Any + Send + Sync>,
    ty: ScalarType,
    eq: ErasedEq,
    debug: ErasedDebug,
}

impl Scalar {
    pub fn new<T>(value: T) -> Self
    where
        T: Any + Send + Sync + PartialEq + fmt::Debug,
    {
        Self {
            value: Arc::new(value),
            ty: ScalarType::of::<T>(),
            eq: erased_eq::<T>,
            debug: erased_debug::<T>,
        }
    }

    pub fn scalar_type(&self) -> ScalarType {
        self.ty
    }

    pub fn downcast_ref<T: Any>(&self) -> Option<&T> {
        self.value.downcast_ref::<T>()
    }

    /// Moves the value out, cloning only if the scalar is shared.
    pub fn take<T: Any + Send + Sync + Clone>(self) -> Option<T> {
        let arc = self.value.downcast::<T>().ok()?;
        Some(Arc::try_unwrap(arc).unwrap_or_else(|shared| (*shared).clone()))
    }
}

fn erased_eq<T: Any + PartialEq>(
    lhs: &(dyn Any + Send + Sync),
    rhs: &(dyn Any + Send + Sync),
) -> bool {
    match (lhs.downcast_ref::<T>(), rhs.downcast_ref::<T>()) {
        (Some(lhs), Some(rhs)) => lhs == rhs,
        _ => false,
    }
}

fn erased_debug<T: Any + fmt::Debug>(
    value: &(dyn Any + Send + Sync),
    f: &mut fmt::Formatter<'_>,
) -> fmt::Result {
    match value.downcast_ref::<T>() {
        Some(value) => value.fmt(f),
        None => f.write_str("<?>"),
    }
}

impl PartialEq for Scalar {
    fn eq(&self, other: &Self) -> bool {
        self.ty == other.ty && (self.eq)(&*self.value, &*other.value)
    }
}

impl fmt::Debug for Scalar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        (self.debug)(&*self.value, f)
    }
}

/// What a parser produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    Nothing,
    Scalar(Scalar),
    Record(Vec<Value>),
    List(Vec<Value>),
    Optional(Option<Box<Value>>),
    Union { index: usize, value: Box<Value> },
}

impl Value {
    pub fn scalar<T>(value: T) -> Self
    where
        T: Any + Send + Sync + PartialEq + fmt::Debug,
    {
        Value::Scalar(Scalar::new(value))
    }

    pub fn text(value: impl Into<String>) -> Self {
        Value::scalar(value.into())
    }

    pub fn is_nothing(&self) -> bool {
        matches!(self, Value::Nothing)
    }

    pub fn as_scalar<T: Any>(&self) -> Option<&T> {
        match self {
            Value::Scalar(scalar) => scalar.downcast_ref::<T>(),
            _ => None,
        }
    }

    /// Converts into a typed value, `None` if the value has another shape.
    pub fn extract<T: FromValue>(self) -> Option<T> {
        T::from_value(self)
    }
}

/// Types a parser result can be converted into.
pub trait FromValue: Sized {
    /// Whether values of `shape` convert into `Self`.
    fn accepts(shape: &Shape) -> bool;

    fn from_value(value: Value) -> Option<Self>;
}

/// Types a transformation may produce. `shape` is the result type the
/// transformed parser advertises.
pub trait IntoValue: Sized + 'static {
    fn shape() -> Shape;

    fn into_value(self) -> Value;
}

/// Makes types usable as parser results: `scalar_value!(MyNode, MyOp);`
///
/// The types must be `Clone + PartialEq + Debug + Send + Sync + 'static`.
#[macro_export]
macro_rules! scalar_value {
    ($($ty:ty),+ $(,)?) => {
        $(
            impl $crate::parser::IntoValue for $ty {
                fn shape() -> $crate::parser::Shape {
                    $crate::parser::Shape::scalar::<$ty>()
                }

                fn into_value(self) -> $crate::parser::Value {
                    $crate::parser::Value::scalar(self)
                }
            }

            impl $crate::parser::FromValue for $ty {
                fn accepts(shape: &$crate::parser::Shape) -> bool {
                    shape.is_scalar::<$ty>()
                }

                fn from_value(value: $crate::parser::Value) -> Option<Self> {
                    match value {
                        $crate::parser::Value::Scalar(scalar) => scalar.take::<$ty>(),
                        _ => None,
                    }
                }
            }
        )+
    };
}

scalar_value!(
    char, String, bool, i8, i16, i32, i64, i128, isize, u8, u16, u32, u64, u128, usize,
);

impl FromValue for Value {
    fn accepts(_: &Shape) -> bool {
        true
    }

    fn from_value(value: Value) -> Option<Self> {
        Some(value)
    }
}

impl IntoValue for () {
    fn shape() -> Shape {
        Shape::Nothing
    }

    fn into_value(self) -> Value {
        Value::Nothing
    }
}

impl FromValue for () {
    fn accepts(shape: &Shape) -> bool {
        shape.is_nothing()
    }

    fn from_value(value: Value) -> Option<Self> {
        value.is_nothing().then_some(())
    }
}

impl<T: IntoValue> IntoValue for Option<T> {
    fn shape() -> Shape {
        Shape::optional(&T::shape())
    }

    fn into_value(self) -> Value {
        Value::Optional(self.map(|value| Box::new(value.into_value())))
    }
}

impl<T: FromValue> FromValue for Option<T> {
    fn accepts(shape: &Shape) -> bool {
        matches!(shape, Shape::Optional(item) if T::accepts(item))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::Optional(None) => Some(None),
            Value::Optional(Some(value)) => T::from_value(*value).map(Some),
            _ => None,
        }
    }
}

impl<T: IntoValue> IntoValue for Vec<T> {
    fn shape() -> Shape {
        Shape::List(Box::new(T::shape()))
    }

    fn into_value(self) -> Value {
        Value::List(self.into_iter().map(IntoValue::into_value).collect())
    }
}

impl<T: FromValue> FromValue for Vec<T> {
    fn accepts(shape: &Shape) -> bool {
        matches!(shape, Shape::List(item) if T::accepts(item))
    }

    fn from_value(value: Value) -> Option<Self> {
        match value {
            Value::List(items) => items.into_iter().map(T::from_value).collect(),
            _ => None,
        }
    }
}

macro_rules! record_value {
    ($len:literal => $($name:ident),+) => {
        impl<$($name: IntoValue),+> IntoValue for ($($name,)+) {
            fn shape() -> Shape {
                Shape::Record(vec![$($name::shape()),+])
            }

            #[allow(non_snake_case)]
            fn into_value(self) -> Value {
                let ($($name,)+) = self;
                Value::Record(vec![$($name.into_value()),+])
            }
        }

        impl<$($name: FromValue),+> FromValue for ($($name,)+) {
            fn accepts(shape: &Shape) -> bool {
                match shape {
                    Shape::Record(items) if items.len() == $len => {
                        let mut items = items.iter();
                        $(items.next().is_some_and(|item| $name::accepts(item)))&&+
                    }
                    _ => false,
                }
            }

            fn from_value(value: Value) -> Option<Self> {
                match value {
                    Value::Record(items) if items.len() == $len => {
                        let mut items = items.into_iter();
                        Some(($($name::from_value(items.next()?)?,)+))
                    }
                    _ => None,
                }
            }
        }
    };
}

record_value!(2 => A, B);
record_value!(3 => A, B, C);
record_value!(4 => A, B, C, D);
record_value!(5 => A, B, C, D, E);
record_value!(6 => A, B, C, D, E, F);
record_value!(7 => A, B, C, D, E, F, G);
record_value!(8 => A, B, C, D, E, F, G, H);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequence_drops_nothing() {
        let shapes = [Shape::Nothing, Shape::scalar::<char>(), Shape::Nothing];
        assert_eq!(Shape::sequence(&shapes), Shape::scalar::<char>());
    }

    #[test]
    fn test_sequence_of_nothing_is_nothing() {
        assert_eq!(
            Shape::sequence(&[Shape::Nothing, Shape::Nothing]),
            Shape::Nothing
        );
    }

    #[test]
    fn test_sequence_keeps_order() {
        let shapes = [
            Shape::scalar::<i32>(),
            Shape::Nothing,
            Shape::scalar::<String>(),
        ];
        assert_eq!(
            Shape::sequence(&shapes),
            Shape::Record(vec![Shape::scalar::<i32>(), Shape::scalar::<String>()])
        );
    }

    #[test]
    fn test_choice_collapses_identical_shapes() {
        let shapes = [Shape::scalar::<i32>(), Shape::scalar::<i32>()];
        let (shape, slots) = Shape::choice(&shapes);
        assert_eq!(shape, Shape::scalar::<i32>());
        assert_eq!(slots, vec![0, 0]);
    }

    #[test]
    fn test_choice_builds_union_over_distinct_shapes() {
        let shapes = [
            Shape::scalar::<u32>(),
            Shape::scalar::<String>(),
            Shape::scalar::<u32>(),
            Shape::Nothing,
        ];
        let (shape, slots) = Shape::choice(&shapes);
        assert_eq!(
            shape,
            Shape::Union(vec![
                Shape::scalar::<u32>(),
                Shape::scalar::<String>(),
                Shape::Nothing
            ])
        );
        assert_eq!(slots, vec![0, 1, 0, 2]);
    }

    #[test]
    fn test_repeated_char_is_string() {
        assert_eq!(
            Shape::repeated(&Shape::scalar::<char>()),
            Shape::scalar::<String>()
        );
        assert_eq!(Shape::repeated(&Shape::Nothing), Shape::Nothing);
        assert_eq!(
            Shape::repeated(&Shape::scalar::<i32>()),
            Shape::List(Box::new(Shape::scalar::<i32>()))
        );
    }

    #[test]
    fn test_optional_of_nothing_stays_nothing() {
        assert_eq!(Shape::optional(&Shape::Nothing), Shape::Nothing);
    }

    #[test]
    fn test_tuple_round_trip() {
        let value = (7i32, String::from("x")).into_value();
        assert!(<(i32, String)>::accepts(&<(i32, String)>::shape()));
        assert_eq!(value.extract::<(i32, String)>(), Some((7, "x".to_string())));
    }

    #[test]
    fn test_scalar_equality_is_typed() {
        assert_eq!(Value::scalar(1i32), Value::scalar(1i32));
        assert_ne!(Value::scalar(1i32), Value::scalar(1i64));
    }
}
