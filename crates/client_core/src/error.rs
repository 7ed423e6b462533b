use shared::domain::BookId;
use thiserror::Error;

use crate::action::Action;

/// Ways a single action can end without success. `Display` is the notice text.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ActionError {
    #[error("{0}")]
    Validation(String),
    #[error("Book ID [{id}] {}.", .action.absence())]
    NotFound { action: Action, id: BookId },
    #[error("Error {}: {message}", .action.in_progress())]
    Transport { action: Action, message: String },
}

impl ActionError {
    pub fn validation(message: impl Into<String>) -> Self {
        Self::Validation(message.into())
    }

    pub fn transport(action: Action, message: impl Into<String>) -> Self {
        Self::Transport {
            action,
            message: message.into(),
        }
    }
}
