use std::fmt;

use crate::error::{MissingValueError, ValueError};
use crate::side_effect::SideEffect;

/// Marker for "no value configured", with the chain of display names the
/// missing value travelled through.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Missing {
    path: Vec<String>,
}

impl Missing {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn path_to_origin(&self) -> &[String] {
        &self.path
    }

    pub fn push_when_missing(mut self, display_name: impl Into<String>) -> Self {
        self.path.insert(0, display_name.into());
        self
    }
}

/// The result of computing a deferred value.
///
/// A missing value never carries a payload or a side effect. Present values
/// are never mutated; the builder-style methods consume and return.
pub enum Value<T: 'static> {
    Missing(Missing),
    Present {
        value: T,
        side_effect: Option<SideEffect<T>>,
    },
}

impl<T: 'static> Value<T> {
    pub fn of(value: T) -> Self {
        Value::Present {
            value,
            side_effect: None,
        }
    }

    pub fn missing() -> Self {
        Value::Missing(Missing::new())
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing(_))
    }

    pub fn is_present(&self) -> bool {
        !self.is_missing()
    }

    /// Borrows the payload without running the attached side effect.
    pub fn get_without_side_effect(&self) -> Result<&T, ValueError> {
        match self {
            Value::Missing(_) => Err(ValueError::Missing),
            Value::Present { value, .. } => Ok(value),
        }
    }

    pub fn side_effect(&self) -> Option<&SideEffect<T>> {
        match self {
            Value::Missing(_) => None,
            Value::Present { side_effect, .. } => side_effect.as_ref(),
        }
    }

    /// Replaces the side effect. Missing values stay side-effect free.
    pub fn with_side_effect(self, effect: Option<SideEffect<T>>) -> Self {
        match self {
            Value::Missing(missing) => Value::Missing(missing),
            Value::Present { value, .. } => Value::Present {
                value,
                side_effect: effect,
            },
        }
    }

    /// Reinterprets a missing value as a missing value of another type.
    pub fn as_type<U: 'static>(self) -> Result<Value<U>, ValueError> {
        match self {
            Value::Missing(missing) => Ok(Value::Missing(missing)),
            Value::Present { .. } => Err(ValueError::UnexpectedPresent),
        }
    }

    pub fn into_parts(self) -> Result<(T, Option<SideEffect<T>>), Missing> {
        match self {
            Value::Missing(missing) => Err(missing),
            Value::Present { value, side_effect } => Ok((value, side_effect)),
        }
    }

    pub fn push_when_missing(self, display_name: impl Into<String>) -> Self {
        match self {
            Value::Missing(missing) => Value::Missing(missing.push_when_missing(display_name)),
            present => present,
        }
    }

    pub fn path_to_origin(&self) -> &[String] {
        match self {
            Value::Missing(missing) => missing.path_to_origin(),
            Value::Present { .. } => &[],
        }
    }

    /// Consumes the value, running its side effect exactly once.
    pub fn get(self) -> Result<T, MissingValueError> {
        match self {
            Value::Missing(missing) => {
                let path = missing.path_to_origin().to_vec();
                Err(MissingValueError::new("this provider", path))
            }
            Value::Present { value, side_effect } => {
                if let Some(effect) = side_effect {
                    effect.execute(&value);
                }
                Ok(value)
            }
        }
    }

    /// Like [`Value::get`], but yields `None` instead of an error.
    pub fn or_none(self) -> Option<T> {
        self.get().ok()
    }
}

impl<T: fmt::Debug + 'static> fmt::Debug for Value<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Missing(missing) => f.debug_tuple("Missing").field(missing).finish(),
            Value::Present { value, side_effect } => f
                .debug_struct("Present")
                .field("value", value)
                .field("side_effect", side_effect)
                .finish(),
        }
    }
}
