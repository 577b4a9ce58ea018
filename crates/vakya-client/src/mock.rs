//! Mock sentence source for offline play and tests.

use std::sync::atomic::{AtomicU32, Ordering};

use async_trait::async_trait;

use vakya_core::fallback::fallback_sentence;
use vakya_core::model::SentenceRecord;
use vakya_core::traits::SentenceSource;

/// Serves a fixed sentence, or fails every fetch.
pub struct MockSentenceSource {
    /// `None` makes every fetch fail.
    record: Option<SentenceRecord>,
    /// Number of calls made.
    call_count: AtomicU32,
}

impl MockSentenceSource {
    /// A source that always returns `record`.
    pub fn with_record(record: SentenceRecord) -> Self {
        Self {
            record: Some(record),
            call_count: AtomicU32::new(0),
        }
    }

    /// A source that behaves like a sentence service that is down.
    pub fn unavailable() -> Self {
        Self {
            record: None,
            call_count: AtomicU32::new(0),
        }
    }

    /// Get the number of calls made to this source.
    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }
}

impl Default for MockSentenceSource {
    fn default() -> Self {
        Self::with_record(fallback_sentence())
    }
}

#[async_trait]
impl SentenceSource for MockSentenceSource {
    fn name(&self) -> &str {
        "mock"
    }

    async fn fetch_sentence(&self) -> anyhow::Result<SentenceRecord> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        match &self.record {
            Some(record) => Ok(record.clone()),
            None => anyhow::bail!("sentence service unavailable"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use vakya_core::exercise::{EngineConfig, EngineState, ExerciseEngine};

    #[tokio::test]
    async fn counts_calls() {
        let source = MockSentenceSource::default();
        assert_eq!(source.name(), "mock");
        let record = source.fetch_sentence().await.unwrap();
        assert_eq!(record.sentence, "रामः गच्छति");
        source.fetch_sentence().await.unwrap();
        assert_eq!(source.call_count(), 2);
    }

    #[tokio::test]
    async fn unavailable_source_drives_engine_to_fallback() {
        let source = MockSentenceSource::unavailable();
        let mut engine = ExerciseEngine::new(EngineConfig::default());
        let mut rng = StdRng::seed_from_u64(7);

        let state = engine.load_next(&source, &mut rng).await;
        assert_eq!(state, EngineState::Ready);
        assert!(engine.round().unwrap().is_fallback());
        assert_eq!(source.call_count(), 1);
    }

    #[tokio::test]
    async fn unavailable_source_without_fallback_is_an_error() {
        let source = MockSentenceSource::unavailable();
        let mut engine = ExerciseEngine::new(EngineConfig {
            offline_fallback: false,
        });
        let mut rng = StdRng::seed_from_u64(7);

        assert_eq!(engine.load_next(&source, &mut rng).await, EngineState::Error);
        assert!(engine.round().is_none());
        assert!(engine.error_message().is_some());
    }
}
