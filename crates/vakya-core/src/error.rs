//! Error types for the core crate.
//!
//! Every message here is shown to the learner as-is, so the `Display`
//! strings are written as user-facing sentences where that matters.

use thiserror::Error;

use crate::model::Role;

/// Errors raised by the session gate.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The durable token store could not be read or written.
    #[error("token storage failed: {0}")]
    Storage(String),

    /// A blank token was offered at login.
    #[error("refusing to store an empty token")]
    EmptyToken,
}

/// Errors raised by the sentence exercise engine.
#[derive(Debug, Error)]
pub enum ExerciseError {
    /// The engine has no ready round (still loading, or the load failed).
    #[error("no sentence is ready yet")]
    NotReady,

    /// The learner asked to analyze a role the sentence has no word for.
    #[error("this sentence has no {0}")]
    NoWordForRole(Role),

    /// A sentence record broke the model invariants.
    #[error("invalid sentence record: {0}")]
    InvalidSentence(String),

    /// A role name did not parse.
    #[error("unknown role: {0}")]
    UnknownRole(String),

    /// A property name did not parse.
    #[error("unknown property: {0}")]
    UnknownProperty(String),
}

/// Errors raised by the verb quiz.
#[derive(Debug, Error)]
pub enum QuizError {
    /// The chosen answer is not one of the offered options.
    #[error("'{0}' is not one of the options")]
    UnknownOption(String),
}

/// Errors surfaced by the login and registration flows.
///
/// `Display` yields the exact message shown to the learner.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AuthError {
    /// The form failed local validation; no request was sent.
    #[error("{0}")]
    Validation(String),

    /// The auth service rejected the request with its own message.
    #[error("{0}")]
    Rejected(String),

    /// The auth service could not be reached.
    #[error("Cannot connect to server. Please check if the server is running.")]
    Unreachable,

    /// Anything else: unparseable body, unexpected status without a message.
    #[error("An error occurred. Please try again.")]
    Unexpected,
}

impl AuthError {
    /// Returns `true` if the failure happened before any request was made.
    pub fn is_local(&self) -> bool {
        matches!(self, AuthError::Validation(_))
    }
}
