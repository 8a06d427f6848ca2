use thiserror::Error;

/// Contract violations on a [`Value`](crate::Value).
///
/// These are programming errors: callers are expected to check
/// `is_missing()` first, so hitting one aborts the current evaluation.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValueError {
    #[error("cannot unpack a missing value")]
    Missing,
    #[error("cannot reinterpret a present value as another type")]
    UnexpectedPresent,
}

/// Raised when a value is consumed but none is available.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error(
    "Cannot query the value of {description} because it has no value available.{}",
    format_path(.path)
)]
pub struct MissingValueError {
    pub description: String,
    pub path: Vec<String>,
}

impl MissingValueError {
    pub fn new(description: impl Into<String>, path: Vec<String>) -> Self {
        Self {
            description: description.into(),
            path,
        }
    }
}

fn format_path(path: &[String]) -> String {
    if path.is_empty() {
        return String::new();
    }
    let mut out = String::from("\nThe value of this provider is derived from:");
    for name in path {
        out.push_str("\n  - ");
        out.push_str(name);
    }
    out
}
