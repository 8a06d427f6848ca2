//! Lazy combination of two providers.
//!
//! `Zip` never evaluates anything at construction. Each `calculate_value`
//! reads the left input, then the right one, and only calls the combining
//! function once both are present:
//!
//! ```rust
//! use tether_core::*;
//!
//! let width = providers::fixed(3);
//! let height = providers::fixed(4);
//! let area = width.zip(&height, |w, h| w * h);
//!
//! assert_eq!(area.to_string(), "and(fixed(i32, 3), fixed(i32, 4))");
//! assert_eq!(area.get(), Ok(12));
//! ```
//!
//! A missing left input stops evaluation before the right input is read.

use std::fmt;
use std::rc::{Rc, Weak};

use crate::execution::ExecutionTimeValue;
use crate::producer::ValueProducer;
use crate::provider::{Provider, ProviderRef, TypeDescriptor, ValueConsumer};
use crate::side_effect::SideEffect;
use crate::value::Value;

type Combine<A, B, R> = Box<dyn Fn(&A, &B) -> R>;

pub struct Zip<A: 'static, B: 'static, R: 'static> {
    this: Weak<Zip<A, B, R>>,
    left: ProviderRef<A>,
    right: ProviderRef<B>,
    combine: Combine<A, B, R>,
}

impl<A: 'static, B: 'static, R: 'static> Zip<A, B, R> {
    pub fn new(
        left: ProviderRef<A>,
        right: ProviderRef<B>,
        combine: impl Fn(&A, &B) -> R + 'static,
    ) -> Rc<Self> {
        Rc::new_cyclic(|this| Zip {
            this: this.clone(),
            left,
            right,
            combine: Box::new(combine),
        })
    }

    pub fn left(&self) -> &ProviderRef<A> {
        &self.left
    }

    pub fn right(&self) -> &ProviderRef<B> {
        &self.right
    }
}

impl<A: 'static, B: 'static, R: 'static> Zip<A, B, R> {
    fn changing_self(&self) -> ExecutionTimeValue<R> {
        match self.this.upgrade() {
            Some(this) => ExecutionTimeValue::changing(this),
            // `new` is the only constructor and always places `Zip` behind an `Rc`.
            None => unreachable!("{} is not held by an Rc", self),
        }
    }
}

impl<A: 'static, B: 'static, R: 'static> Provider<R> for Zip<A, B, R> {
    fn value_type(&self) -> TypeDescriptor {
        TypeDescriptor::Unknown
    }

    fn calculate_value(&self, consumer: ValueConsumer) -> Value<R> {
        let (left_value, left_effect) = match self.left.calculate_value(consumer).into_parts() {
            Ok(parts) => parts,
            Err(missing) => {
                log::trace!("{}: left input missing", self);
                return Value::Missing(missing);
            }
        };
        let (right_value, right_effect) = match self.right.calculate_value(consumer).into_parts() {
            Ok(parts) => parts,
            Err(missing) => {
                log::trace!("{}: right input missing", self);
                return Value::Missing(missing);
            }
        };

        let combined = (self.combine)(&left_value, &right_value);

        // Each effect stays bound to its own input but now fires when the
        // combined value is consumed.
        let left_effect = left_effect.map(|effect| SideEffect::<R>::fixed(left_value, effect));
        let right_effect = right_effect.map(|effect| SideEffect::<R>::fixed(right_value, effect));
        let side_effect = match (left_effect, right_effect) {
            (Some(left), Some(right)) => Some(SideEffect::composite(left, right)),
            (left, right) => left.or(right),
        };
        if let Some(effect) = &side_effect {
            log::trace!("{}: attaching side effect ({} actions)", self, effect.len());
        }

        Value::of(combined).with_side_effect(side_effect)
    }

    fn calculate_execution_time_value(&self) -> ExecutionTimeValue<R> {
        let left = self.left.calculate_execution_time_value();
        if left.is_changing_value() {
            return self.changing_self();
        }
        let right = self.right.calculate_execution_time_value();
        if right.is_changing_value() {
            return self.changing_self();
        }

        let value = self.calculate_value(ValueConsumer::IgnoreUnsafeRead);
        let snapshot = ExecutionTimeValue::from_value(value);
        if left.has_changing_content() || right.has_changing_content() {
            snapshot.with_changing_content()
        } else {
            snapshot
        }
    }

    fn producer(&self) -> ValueProducer {
        ValueProducer::plus(self.left.producer(), self.right.producer())
    }
}

impl<A: 'static, B: 'static, R: 'static> fmt::Display for Zip<A, B, R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "and({}, {})", self.left, self.right)
    }
}
