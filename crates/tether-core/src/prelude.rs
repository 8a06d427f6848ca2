pub use crate::error::{MissingValueError, ValueError};
pub use crate::execution::ExecutionTimeValue;
pub use crate::producer::{TaskId, ValueProducer, WorkGraph};
pub use crate::provider::{Provider, ProviderExt, ProviderRef, TypeDescriptor, ValueConsumer};
pub use crate::providers;
pub use crate::side_effect::SideEffect;
pub use crate::value::{Missing, Value};
pub use crate::zip::Zip;
