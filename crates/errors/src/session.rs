//! Progress session error types

use std::borrow::Cow;

use crate::UserFacingError;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[non_exhaustive]
pub enum SessionError {
    #[error("activity description must not be empty")]
    EmptyActivity,

    #[error("progress session already completed: {activity}")]
    AlreadyCompleted { activity: String },
}

impl UserFacingError for SessionError {
    fn user_message(&self) -> Cow<'_, str> {
        Cow::Owned(self.to_string())
    }

    fn user_hint(&self) -> Option<&'static str> {
        match self {
            Self::EmptyActivity => Some("Pass a non-empty --activity description."),
            Self::AlreadyCompleted { .. } => {
                Some("Start a new progress session for each activity.")
            }
        }
    }

    fn user_code(&self) -> Option<&'static str> {
        Some(match self {
            Self::EmptyActivity => "session.empty_activity",
            Self::AlreadyCompleted { .. } => "session.already_completed",
        })
    }
}
