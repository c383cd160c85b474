//! Errors reported by a switch attempt.

use thiserror::Error;

/// Why a switch did not commit.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SwitchError {
    /// The requested key is not in the registry.
    #[error("effect '{effect}' is not registered")]
    NotFound { effect: String },

    /// The mount callback returned an error.
    #[error("effect '{effect}' failed to mount: {message}")]
    CallbackFailure { effect: String, message: String },
}

impl SwitchError {
    pub(crate) fn callback(effect: impl Into<String>, err: &anyhow::Error) -> Self {
        Self::CallbackFailure {
            effect: effect.into(),
            message: format!("{err:#}"),
        }
    }

    /// The effect the failed switch was aiming for.
    pub fn effect(&self) -> &str {
        match self {
            Self::NotFound { effect } | Self::CallbackFailure { effect, .. } => effect,
        }
    }
}

/// Why a switch request was dropped without doing anything.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// Another switch is still in flight.
    Transitioning,
    /// The target is already the active effect.
    AlreadyActive,
    /// Index outside the registry.
    OutOfRange,
    /// Nothing registered.
    Empty,
    /// Click on a control whose key is not registered.
    Unregistered,
    /// The switcher was destroyed before the mount finished.
    Destroyed,
}

/// Result of one switch request. Failures are reported here and through the
/// notifier, never as a panic or an `Err` the caller has to handle.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SwitchOutcome {
    Committed,
    Skipped(SkipReason),
    Failed(SwitchError),
}

impl SwitchOutcome {
    pub fn is_committed(&self) -> bool {
        matches!(self, Self::Committed)
    }
}
