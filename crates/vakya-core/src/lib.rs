//! vakya-core — the exercise engine and its grammar model.
//!
//! This crate holds everything about the game that does not touch the
//! network: the sentence data model, the role-placement exercise, the
//! word-analysis drill, the verb quiz, and the authentication gate.

pub mod analysis;
pub mod auth;
pub mod error;
pub mod exercise;
pub mod fallback;
pub mod feedback;
pub mod model;
pub mod session;
pub mod shuffle;
pub mod traits;
pub mod verb_quiz;
