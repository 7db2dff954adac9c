//! Forward references for recursive grammars.
//!
//! ```
//! use braid::parser::{ch, reference};
//!
//! // nested := '(' nested ')' | 'x'
//! let nested = reference::<char, char>();
//! let body = (ch('(').ignore() >> nested.clone() >> ch(')').ignore()) | ch('x');
//! nested.assign(&body).unwrap();
//!
//! assert!(nested.parse("((x))").is_ok());
//! ```

use std::any::type_name;
use std::sync::{Arc, OnceLock};

use tracing::{trace, warn};

use super::combinators::{Node, Parser};
use super::context::{Element, Failure, ParseContext, ParseResult};
use super::error::GrammarError;
use super::value::{IntoValue, Value};

/// The write-once cell behind a reference parser.
pub(crate) struct Slot<E> {
    target: OnceLock<Parser<E>>,
    name: &'static str,
}

impl<E: Element> Slot<E> {
    pub(crate) fn run(&self, ctx: &mut ParseContext<'_, E>, want: bool) -> ParseResult<Value> {
        let Some(target) = self.target.get() else {
            panic!(
                "reference to `{}` parsed before it was assigned",
                self.name
            );
        };
        if !ctx.enter("references") {
            warn!(
                depth = ctx.depth(),
                target = self.name,
                offset = ctx.position().offset,
                "nesting ceiling reached, aborting parse"
            );
            return Err(Failure::Abort);
        }
        trace!(depth = ctx.depth(), target = self.name, "entering reference");
        let result = target.run(ctx, want);
        ctx.leave();
        result
    }
}

/// Declares a parser producing `T` whose definition is supplied later with
/// [`Parser::assign`].
pub fn reference<E: Element, T: IntoValue>() -> Parser<E> {
    Parser::new(
        Node::Reference(Arc::new(Slot {
            target: OnceLock::new(),
            name: type_name::<T>(),
        })),
        T::shape(),
    )
}

impl<E: Element> Parser<E> {
    /// Binds a reference created by [`reference`] to its definition.
    ///
    /// Every clone of the reference sees the binding.
    pub fn assign(&self, target: &Parser<E>) -> Result<(), GrammarError> {
        let Node::Reference(slot) = &*self.node else {
            return Err(GrammarError::NotAReference(self.shape.to_string()));
        };
        if target.shape != self.shape {
            return Err(GrammarError::ShapeMismatch {
                expected: self.shape.to_string(),
                found: target.shape.to_string(),
            });
        }
        slot.target
            .set(target.clone())
            .map_err(|_| GrammarError::AlreadyAssigned(slot.name))
    }

    /// `false` only for a reference that has not been assigned yet.
    pub fn is_assigned(&self) -> bool {
        match &*self.node {
            Node::Reference(slot) => slot.target.get().is_some(),
            _ => true,
        }
    }
}
