//! Trait seams between the engine and the outside world.
//!
//! The sentence service is implemented over HTTP by `vakya-client`; tests
//! and offline play plug in their own sources.

use async_trait::async_trait;

use crate::model::SentenceRecord;
use crate::verb_quiz::VerbQuiz;

/// Anything that can hand the engine a fresh sentence.
#[async_trait]
pub trait SentenceSource: Send + Sync {
    /// Human-readable source name (e.g. "http").
    fn name(&self) -> &str;

    /// Fetch one random sentence.
    async fn fetch_sentence(&self) -> anyhow::Result<SentenceRecord>;
}

/// Anything that can hand out verb-form quizzes.
#[async_trait]
pub trait VerbQuizSource: Send + Sync {
    /// Fetch one quiz.
    async fn fetch_verb_quiz(&self) -> anyhow::Result<VerbQuiz>;
}
