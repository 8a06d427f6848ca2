use std::any::{TypeId, type_name};
use std::fmt;
use std::rc::Rc;

use crate::error::MissingValueError;
use crate::execution::ExecutionTimeValue;
use crate::producer::ValueProducer;
use crate::value::Value;
use crate::zip::Zip;

/// How the caller is reading a value. Forwarded unchanged through combinators.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum ValueConsumer {
    #[default]
    IgnoreUnsafeRead,
    DisallowUnsafeRead,
}

/// Static type of a provider's value, where it can be known.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TypeDescriptor {
    Known {
        name: &'static str,
        id: TypeId,
    },
    /// No inference is attempted. Derived providers whose result type is
    /// fixed only by a closure report this permanently.
    Unknown,
}

impl TypeDescriptor {
    pub fn of<T: 'static>() -> Self {
        TypeDescriptor::Known {
            name: type_name::<T>(),
            id: TypeId::of::<T>(),
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, TypeDescriptor::Known { .. })
    }
}

/// A value that may not exist yet.
///
/// Implementations compute a fresh [`Value`] on every call; any caching is
/// up to the implementation.
pub trait Provider<T: 'static>: fmt::Display {
    fn value_type(&self) -> TypeDescriptor;

    fn calculate_value(&self, consumer: ValueConsumer) -> Value<T>;

    /// Snapshot for execution time. Providers that must be re-read at the
    /// point of use override this to return a changing value.
    fn calculate_execution_time_value(&self) -> ExecutionTimeValue<T> {
        ExecutionTimeValue::from_value(self.calculate_value(ValueConsumer::IgnoreUnsafeRead))
    }

    fn producer(&self) -> ValueProducer {
        ValueProducer::NoProducer
    }
}

pub type ProviderRef<T> = Rc<dyn Provider<T>>;

/// Convenience surface over shared providers.
pub trait ProviderExt<T: 'static> {
    /// Combines this provider with `other` lazily. See [`Zip`].
    fn zip<B, R>(
        &self,
        other: &ProviderRef<B>,
        combine: impl Fn(&T, &B) -> R + 'static,
    ) -> ProviderRef<R>
    where
        B: 'static,
        R: 'static;

    fn is_present(&self) -> bool;

    /// Computes and consumes the value, running its side effect.
    fn get(&self) -> Result<T, MissingValueError>;

    fn get_or_none(&self) -> Option<T>;
}

impl<T: 'static> ProviderExt<T> for ProviderRef<T> {
    fn zip<B, R>(
        &self,
        other: &ProviderRef<B>,
        combine: impl Fn(&T, &B) -> R + 'static,
    ) -> ProviderRef<R>
    where
        B: 'static,
        R: 'static,
    {
        Zip::new(self.clone(), other.clone(), combine)
    }

    fn is_present(&self) -> bool {
        self.calculate_value(ValueConsumer::IgnoreUnsafeRead)
            .is_present()
    }

    fn get(&self) -> Result<T, MissingValueError> {
        self.calculate_value(ValueConsumer::DisallowUnsafeRead)
            .get()
            .map_err(|err| MissingValueError::new(self.to_string(), err.path))
    }

    fn get_or_none(&self) -> Option<T> {
        self.calculate_value(ValueConsumer::IgnoreUnsafeRead)
            .or_none()
    }
}
