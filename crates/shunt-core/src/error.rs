use crate::shape::Shape;

/// All errors that can occur within shunt.
///
/// Every variant is a non-recoverable configuration or programming defect:
/// routing is validated before any data movement, and a failed check means
/// the host wired the layer incorrectly. Each variant carries the buffer or
/// sample index involved so the failure can be diagnosed without re-running.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// A buffer's shape disagrees with the shape the layer requires of it.
    #[error("shape mismatch on buffer {index}: expected {expected}, got {got}")]
    ShapeMismatch {
        index: usize,
        expected: Shape,
        got: Shape,
    },

    /// A selector value names a candidate/destination that does not exist.
    #[error("selector value {value} at sample {sample} out of range: must be < {limit}")]
    IndexOutOfRange {
        sample: usize,
        value: usize,
        limit: usize,
    },

    /// A selector value is fractional or negative.
    #[error("selector value {value} at sample {sample} is not a non-negative integer")]
    NonIntegerSelector { sample: usize, value: f64 },

    /// An output buffer shares storage with the primary input buffer.
    #[error("output buffer {output} aliases the primary input; in-place routing is not supported")]
    AliasingViolation { output: usize },

    /// Gradient was requested through (or withheld from) a buffer that the
    /// routing semantics forbid.
    #[error("non-differentiable input {input}: {reason}")]
    NonDifferentiableInput { input: usize, reason: &'static str },

    /// Post-reshape element counts disagree with the selector histogram.
    #[error(
        "reshape invariant violated on output {output}: expected {expected} elements, got {got}"
    )]
    ReshapeInvariantViolation {
        output: usize,
        expected: usize,
        got: usize,
    },

    /// Generic message for cases not covered above.
    #[error("{0}")]
    Msg(String),
}

impl Error {
    /// Create an error from any string message.
    pub fn msg(s: impl Into<String>) -> Self {
        Error::Msg(s.into())
    }
}

/// Convenience Result type used throughout shunt.
pub type Result<T> = std::result::Result<T, Error>;

/// Macro for early return with a formatted error message.
/// Usage: `bail!("something went wrong: {}", detail)`
#[macro_export]
macro_rules! bail {
    ($($arg:tt)*) => {
        return Err($crate::Error::Msg(format!($($arg)*)))
    };
}
