use std::fmt;

use crate::provider::{ProviderRef, ValueConsumer};
use crate::side_effect::SideEffect;
use crate::value::Value;

/// Classification of a deferred value ahead of execution.
pub enum ExecutionTimeValue<T: 'static> {
    Missing,
    /// A value that can be snapshotted now. With `changing_content` set the
    /// value is fixed for this evaluation only and its content may differ on
    /// a later one.
    Fixed {
        value: T,
        side_effect: Option<SideEffect<T>>,
        changing_content: bool,
    },
    /// Must be recomputed at the point of use; holds the provider to re-read.
    Changing(ProviderRef<T>),
}

impl<T: 'static> ExecutionTimeValue<T> {
    pub fn fixed(value: T) -> Self {
        ExecutionTimeValue::Fixed {
            value,
            side_effect: None,
            changing_content: false,
        }
    }

    pub fn changing(provider: ProviderRef<T>) -> Self {
        ExecutionTimeValue::Changing(provider)
    }

    pub fn from_value(value: Value<T>) -> Self {
        match value.into_parts() {
            Err(_) => ExecutionTimeValue::Missing,
            Ok((value, side_effect)) => ExecutionTimeValue::Fixed {
                value,
                side_effect,
                changing_content: false,
            },
        }
    }

    pub fn with_changing_content(self) -> Self {
        match self {
            ExecutionTimeValue::Fixed {
                value,
                side_effect,
                changing_content: _,
            } => ExecutionTimeValue::Fixed {
                value,
                side_effect,
                changing_content: true,
            },
            other => other,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, ExecutionTimeValue::Missing)
    }

    pub fn is_changing_value(&self) -> bool {
        matches!(self, ExecutionTimeValue::Changing(_))
    }

    pub fn has_fixed_value(&self) -> bool {
        matches!(self, ExecutionTimeValue::Fixed { .. })
    }

    pub fn has_changing_content(&self) -> bool {
        matches!(
            self,
            ExecutionTimeValue::Fixed {
                changing_content: true,
                ..
            }
        )
    }

    /// Turns the classification back into a value, re-reading changing
    /// providers.
    pub fn to_value(self) -> Value<T> {
        match self {
            ExecutionTimeValue::Missing => Value::missing(),
            ExecutionTimeValue::Fixed {
                value,
                side_effect,
                changing_content: _,
            } => Value::of(value).with_side_effect(side_effect),
            ExecutionTimeValue::Changing(provider) => {
                provider.calculate_value(ValueConsumer::IgnoreUnsafeRead)
            }
        }
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for ExecutionTimeValue<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ExecutionTimeValue::Missing => f.write_str("Missing"),
            ExecutionTimeValue::Fixed {
                value,
                side_effect,
                changing_content,
            } => f
                .debug_struct("Fixed")
                .field("value", value)
                .field("side_effect", side_effect)
                .field("changing_content", changing_content)
                .finish(),
            ExecutionTimeValue::Changing(provider) => write!(f, "Changing({provider})"),
        }
    }
}
