use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IntentErrorKind {
    InvalidIntent,
    Unfulfillable,
    ListenerFailure,
    AggregateFailure,
    Internal,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IntentError {
    pub kind: IntentErrorKind,
    pub message: String,
}

impl IntentError {
    pub fn new(kind: IntentErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }
}

impl fmt::Display for IntentError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::error::Error for IntentError {}

pub fn invalid_intent(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::InvalidIntent, message)
}

pub fn unfulfillable(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::Unfulfillable, message)
}

pub fn listener_failure(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::ListenerFailure, message)
}

pub fn aggregate_failure(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::AggregateFailure, message)
}

pub fn internal_error(message: impl Into<String>) -> IntentError {
    IntentError::new(IntentErrorKind::Internal, message)
}
