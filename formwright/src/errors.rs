use thiserror::Error;

/// Errors produced while locating or driving web-form elements
#[derive(Error, Debug)]
pub enum AutomationError {
    /// Every strategy in the list timed out or errored without yielding a
    /// visible element.
    #[error("No element located: {0}")]
    StrategyExhausted(String),

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Invalid selector: {0}")]
    InvalidSelector(String),

    /// Driver/transport-level failure outside the polling loop (connect,
    /// navigation, script evaluation, element operation).
    #[error("Session error: {0}")]
    SessionError(String),

    #[error("Operation timed out: {0}")]
    Timeout(String),

    #[error("Unsupported operation: {0}")]
    UnsupportedOperation(String),
}
