//! Learner-facing feedback.

use serde::{Deserialize, Serialize};

pub const CORRECT_MESSAGE: &str = "Correct! Well done!";
pub const INCORRECT_MESSAGE: &str = "Not quite right. Try again or check hints.";
pub const LOAD_ERROR_MESSAGE: &str = "Error loading sentence. Make sure the server is running.";

/// How a feedback line should be presented.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum FeedbackKind {
    Positive,
    Corrective,
    Error,
}

/// A feedback line plus its kind.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Feedback {
    pub kind: FeedbackKind,
    pub message: String,
}

impl Feedback {
    pub fn correct() -> Self {
        Self {
            kind: FeedbackKind::Positive,
            message: CORRECT_MESSAGE.to_string(),
        }
    }

    pub fn incorrect() -> Self {
        Self::corrective(INCORRECT_MESSAGE)
    }

    pub fn corrective(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Corrective,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            kind: FeedbackKind::Error,
            message: message.into(),
        }
    }

    pub fn is_positive(&self) -> bool {
        self.kind == FeedbackKind::Positive
    }
}

impl std::fmt::Display for Feedback {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}
