use thiserror::Error;

use super::report::ConfigurationStep;

/// Errors that can occur while configuring the audio session.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SessionError {
    /// The OS declined one of the requested parameters.
    #[error("{step} rejected: {reason}")]
    ConfigurationRejected {
        step: ConfigurationStep,
        reason: String,
    },

    #[error("activation failed: {0}")]
    ActivationFailed(String),

    /// The session is held by another process or the hardware went away.
    #[error("session unavailable: {0}")]
    SessionUnavailable(String),

    #[error("invalid intent: {0}")]
    InvalidIntent(String),

    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl SessionError {
    /// Shorthand for a `ConfigurationRejected` error.
    pub fn rejected(step: ConfigurationStep, reason: impl Into<String>) -> Self {
        Self::ConfigurationRejected {
            step,
            reason: reason.into(),
        }
    }
}
