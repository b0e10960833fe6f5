//! Errors that end a session.

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RuntimeError {
    /// Execution fuel exhausted (too many production evaluation steps).
    #[error("runtime execution limit exceeded")]
    ExecFuelExhausted,

    /// Productions nested deeper than the recursion limit.
    #[error("runtime recursion limit exceeded")]
    RecursionLimitExceeded,

    /// Input does not fit the 32-bit delta encoding of the recognition memo.
    #[error("input of {0} bytes is too large to parse")]
    InputTooLarge(usize),
}
