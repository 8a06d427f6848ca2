//! Built-in providers.
//!
//! These are the leaves a provider graph is built from:
//!
//! - [`fixed`]: always present, never changes.
//! - [`not_defined`]: always missing.
//! - [`changing`]: re-reads a closure every time and never snapshots.
//! - [`with_side_effect`]: attaches an action run on consumption.
//! - [`produced_by`]: records which task produces the value.

use std::any::type_name;
use std::fmt;
use std::rc::{Rc, Weak};

use crate::execution::ExecutionTimeValue;
use crate::producer::{TaskId, ValueProducer};
use crate::provider::{Provider, ProviderRef, TypeDescriptor, ValueConsumer};
use crate::side_effect::SideEffect;
use crate::value::Value;

pub fn fixed<T: Clone + fmt::Debug + 'static>(value: T) -> ProviderRef<T> {
    Rc::new(Fixed { value })
}

pub fn not_defined<T: 'static>() -> ProviderRef<T> {
    Rc::new(NotDefined {
        _marker: std::marker::PhantomData,
    })
}

pub fn changing<T: 'static>(compute: impl Fn() -> Option<T> + 'static) -> ProviderRef<T> {
    Rc::new_cyclic(|this: &Weak<Changing<T>>| Changing {
        this: this.clone(),
        compute: Box::new(compute),
    })
}

pub fn with_side_effect<T: 'static>(
    provider: ProviderRef<T>,
    effect: SideEffect<T>,
) -> ProviderRef<T> {
    Rc::new_cyclic(|this: &Weak<WithSideEffect<T>>| WithSideEffect {
        this: this.clone(),
        provider,
        effect,
    })
}

pub fn produced_by<T: 'static>(task: TaskId, provider: ProviderRef<T>) -> ProviderRef<T> {
    Rc::new(ProducedBy { task, provider })
}

struct Fixed<T> {
    value: T,
}

impl<T: Clone + fmt::Debug + 'static> Provider<T> for Fixed<T> {
    fn value_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }

    fn calculate_value(&self, _consumer: ValueConsumer) -> Value<T> {
        Value::of(self.value.clone())
    }
}

impl<T: fmt::Debug> fmt::Display for Fixed<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "fixed({}, {:?})", type_name::<T>(), self.value)
    }
}

struct NotDefined<T> {
    _marker: std::marker::PhantomData<T>,
}

impl<T: 'static> Provider<T> for NotDefined<T> {
    fn value_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }

    fn calculate_value(&self, _consumer: ValueConsumer) -> Value<T> {
        Value::missing()
    }

    fn calculate_execution_time_value(&self) -> ExecutionTimeValue<T> {
        ExecutionTimeValue::Missing
    }
}

impl<T> fmt::Display for NotDefined<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("undefined")
    }
}

struct Changing<T: 'static> {
    this: Weak<Changing<T>>,
    compute: Box<dyn Fn() -> Option<T>>,
}

impl<T: 'static> Provider<T> for Changing<T> {
    fn value_type(&self) -> TypeDescriptor {
        TypeDescriptor::of::<T>()
    }

    fn calculate_value(&self, _consumer: ValueConsumer) -> Value<T> {
        match (self.compute)() {
            Some(value) => Value::of(value),
            None => Value::missing(),
        }
    }

    fn calculate_execution_time_value(&self) -> ExecutionTimeValue<T> {
        match self.this.upgrade() {
            Some(this) => ExecutionTimeValue::changing(this),
            None => ExecutionTimeValue::from_value(self.calculate_value(ValueConsumer::default())),
        }
    }
}

impl<T: 'static> fmt::Display for Changing<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "provider({})", type_name::<T>())
    }
}

struct WithSideEffect<T: 'static> {
    this: Weak<WithSideEffect<T>>,
    provider: ProviderRef<T>,
    effect: SideEffect<T>,
}

impl<T: 'static> WithSideEffect<T> {
    fn attach(&self, existing: Option<SideEffect<T>>) -> SideEffect<T> {
        match existing {
            Some(existing) => SideEffect::composite(existing, self.effect.clone()),
            None => self.effect.clone(),
        }
    }
}

impl<T: 'static> Provider<T> for WithSideEffect<T> {
    fn value_type(&self) -> TypeDescriptor {
        self.provider.value_type()
    }

    fn calculate_value(&self, consumer: ValueConsumer) -> Value<T> {
        match self.provider.calculate_value(consumer).into_parts() {
            Ok((value, existing)) => {
                let effect = self.attach(existing);
                Value::of(value).with_side_effect(Some(effect))
            }
            Err(missing) => Value::Missing(missing),
        }
    }

    fn calculate_execution_time_value(&self) -> ExecutionTimeValue<T> {
        match self.provider.calculate_execution_time_value() {
            ExecutionTimeValue::Fixed {
                value,
                side_effect,
                changing_content,
            } => ExecutionTimeValue::Fixed {
                value,
                side_effect: Some(self.attach(side_effect)),
                changing_content,
            },
            ExecutionTimeValue::Changing(inner) => match self.this.upgrade() {
                Some(this) => ExecutionTimeValue::changing(this),
                None => ExecutionTimeValue::Changing(inner),
            },
            ExecutionTimeValue::Missing => ExecutionTimeValue::Missing,
        }
    }

    fn producer(&self) -> ValueProducer {
        self.provider.producer()
    }
}

impl<T: 'static> fmt::Display for WithSideEffect<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "withSideEffect({})", self.provider)
    }
}

struct ProducedBy<T: 'static> {
    task: TaskId,
    provider: ProviderRef<T>,
}

impl<T: 'static> Provider<T> for ProducedBy<T> {
    fn value_type(&self) -> TypeDescriptor {
        self.provider.value_type()
    }

    fn calculate_value(&self, consumer: ValueConsumer) -> Value<T> {
        self.provider.calculate_value(consumer)
    }

    fn calculate_execution_time_value(&self) -> ExecutionTimeValue<T> {
        self.provider.calculate_execution_time_value()
    }

    fn producer(&self) -> ValueProducer {
        ValueProducer::task(self.task)
    }
}

impl<T: 'static> fmt::Display for ProducedBy<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.provider, f)
    }
}
