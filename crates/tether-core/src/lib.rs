//! # Deferred values and lazy combination
//!
//! Tether models values that may not exist yet. There are four pieces:
//!
//! - `Provider<T>`: a deferred value, computed on request.
//! - `Value<T>`: the result of one computation: missing, or a payload with
//!   an optional `SideEffect`.
//! - `ExecutionTimeValue<T>`: whether a provider can be snapshotted ahead
//!   of execution or has to be re-read at the point of use.
//! - `ValueProducer`: which upstream work yields a value.
//!
//! ## Zipping
//!
//! `zip` combines two providers with a pure function without reading either
//! of them:
//!
//! ```rust
//! use tether_core::*;
//!
//! let greeting = providers::fixed("Hello".to_string());
//! let name = providers::fixed("Ada".to_string());
//!
//! let line = greeting.zip(&name, |g, n| format!("{g}, {n}!"));
//! assert_eq!(line.get(), Ok("Hello, Ada!".to_string()));
//! ```
//!
//! If either input is missing the result is missing and the function is
//! never called:
//!
//! ```rust
//! use tether_core::*;
//!
//! let left = providers::not_defined::<i32>();
//! let right = providers::fixed(4);
//! let sum = left.zip(&right, |a, b| a + b);
//!
//! assert!(!sum.is_present());
//! assert!(sum.get().is_err());
//! ```
//!
//! ## Side effects
//!
//! A side effect runs when the value it is attached to is consumed, not when
//! it is computed. Zipping keeps the effects of both inputs and runs them,
//! left first, when the combined value is consumed with `get()`.
//!
//! ## Changing values
//!
//! A provider built with `providers::changing` is never snapshotted. Any zip
//! over it classifies as changing too, and hands back itself so the caller
//! re-reads the whole combination at execution time.

pub mod error;
pub mod execution;
pub mod prelude;
pub mod producer;
pub mod provider;
pub mod providers;
pub mod side_effect;
pub mod tests;
pub mod value;
pub mod zip;

pub use error::*;
pub use execution::*;
pub use producer::*;
pub use provider::*;
pub use side_effect::*;
pub use value::*;
pub use zip::*;
