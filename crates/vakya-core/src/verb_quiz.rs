//! The verb-form quiz.
//!
//! A sentence is shown with its verb blanked out; the learner picks the
//! right verb form from a handful of conjugations of the same root.

use serde::{Deserialize, Serialize};

use crate::error::QuizError;

/// One quiz as served by the verb game service.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VerbQuiz {
    /// The sentence with the verb replaced by `_____`.
    pub sentence: String,
    /// Candidate verb forms, already shuffled by the service.
    pub options: Vec<String>,
    /// The correct form.
    pub correct: String,
    #[serde(default)]
    pub explanation: String,
    #[serde(default)]
    pub hint: String,
}

/// Result of one answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QuizOutcome {
    pub correct: bool,
    /// The explanation on success, the hint otherwise.
    pub message: String,
}

/// A quiz being played.
#[derive(Debug, Clone)]
pub struct VerbQuizRound {
    quiz: VerbQuiz,
    attempts: Vec<String>,
    solved: bool,
}

impl VerbQuizRound {
    pub fn new(quiz: VerbQuiz) -> Self {
        Self {
            quiz,
            attempts: Vec::new(),
            solved: false,
        }
    }

    pub fn quiz(&self) -> &VerbQuiz {
        &self.quiz
    }

    pub fn attempts(&self) -> &[String] {
        &self.attempts
    }

    pub fn is_solved(&self) -> bool {
        self.solved
    }

    /// Submits `choice`, which must be one of the offered options.
    pub fn answer(&mut self, choice: &str) -> Result<QuizOutcome, QuizError> {
        let choice = choice.trim();
        if !self.quiz.options.iter().any(|o| o == choice) {
            return Err(QuizError::UnknownOption(choice.to_string()));
        }
        self.attempts.push(choice.to_string());

        let correct = choice == self.quiz.correct;
        if correct {
            self.solved = true;
        }
        Ok(QuizOutcome {
            correct,
            message: if correct {
                self.quiz.explanation.clone()
            } else {
                self.quiz.hint.clone()
            },
        })
    }

    /// Submits the option at zero-based `index`.
    pub fn answer_index(&mut self, index: usize) -> Result<QuizOutcome, QuizError> {
        let choice = self
            .quiz
            .options
            .get(index)
            .cloned()
            .ok_or_else(|| QuizError::UnknownOption(format!("#{}", index + 1)))?;
        self.answer(&choice)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn quiz() -> VerbQuiz {
        serde_json::from_value(serde_json::json!({
            "sentence": "रामः _____",
            "options": ["गच्छसि", "गच्छति", "गच्छामि"],
            "correct": "गच्छति",
            "explanation": "The subject 'रामः' is in third person singular form.",
            "hint": "Hint: Subject 'रामः' is Third person singular."
        }))
        .unwrap()
    }

    #[test]
    fn wrong_then_right() {
        let mut round = VerbQuizRound::new(quiz());
        let outcome = round.answer("गच्छसि").unwrap();
        assert!(!outcome.correct);
        assert!(outcome.message.starts_with("Hint:"));
        assert!(!round.is_solved());

        let outcome = round.answer_index(1).unwrap();
        assert!(outcome.correct);
        assert!(outcome.message.contains("third person singular"));
        assert!(round.is_solved());
        assert_eq!(round.attempts().len(), 2);
    }

    #[test]
    fn unknown_option_is_rejected() {
        let mut round = VerbQuizRound::new(quiz());
        assert!(matches!(
            round.answer("गच्छन्ति"),
            Err(QuizError::UnknownOption(_))
        ));
        assert!(round.answer_index(7).is_err());
        assert!(round.attempts().is_empty());
    }
}
