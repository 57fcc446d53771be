//! Error types for the goal wizard and its backend collaborator.

use thiserror::Error;

use crate::catalog::CatalogKind;
use crate::step::WizardStep;

/// Failure reported by a [`GoalsBackend`](crate::backend::GoalsBackend) call
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BackendError {
    /// The session is missing or expired (HTTP 401)
    #[error("Not authenticated")]
    Unauthenticated,

    /// The backend answered with an error; the message is shown verbatim
    #[error("{0}")]
    Rejected(String),

    /// Network failure or an unreadable response body
    #[error("Network error: {0}")]
    Transport(String),
}

/// Errors surfaced by wizard operations.
///
/// Every variant renders as a user-facing message. Only [`WizardError::Unauthenticated`]
/// stops the wizard; everything else leaves its state usable.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WizardError {
    #[error("You need to sign in to create goals")]
    Unauthenticated,

    #[error("{message}")]
    Validation { field: String, message: String },

    #[error("Could not create goal: {0}")]
    BackendRejection(String),

    #[error("Could not load {catalog}: {message}")]
    TransientFetchFailure { catalog: CatalogKind, message: String },

    #[error("Cannot {operation} at step {step}")]
    InvalidStep { operation: &'static str, step: WizardStep },

    #[error("Goal is already being created")]
    SubmissionInProgress,

    #[error("The goal wizard is not open")]
    NotOpen,
}

impl WizardError {
    pub(crate) fn validation(field: &str, message: impl Into<String>) -> Self {
        WizardError::Validation {
            field: field.to_string(),
            message: message.into(),
        }
    }

    /// Field named by a validation error
    pub fn field(&self) -> Option<&str> {
        match self {
            WizardError::Validation { field, .. } => Some(field),
            _ => None,
        }
    }

    /// Whether the wizard refuses further operations until re-authentication
    pub fn is_fatal(&self) -> bool {
        matches!(self, WizardError::Unauthenticated)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_messages() {
        let err = WizardError::validation("goal_type", "goal type required");
        assert_eq!(err.to_string(), "goal type required");
        assert_eq!(err.field(), Some("goal_type"));
        assert!(!err.is_fatal());

        let err = WizardError::TransientFetchFailure {
            catalog: CatalogKind::StoreItems,
            message: "timeout".to_string(),
        };
        assert_eq!(err.to_string(), "Could not load store items: timeout");

        let err = WizardError::InvalidStep {
            operation: "select executor",
            step: WizardStep::SelectGoalType,
        };
        assert_eq!(err.to_string(), "Cannot select executor at step 2");

        assert!(WizardError::Unauthenticated.is_fatal());
        assert_eq!(BackendError::Transport("reset".into()).to_string(), "Network error: reset");
    }
}
