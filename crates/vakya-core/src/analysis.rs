//! The word-analysis sub-exercise.
//!
//! For one word of the sentence the learner gets a shuffled pool of
//! `{property, value}` options and one slot per grammatical property. An
//! option only fits the slot of the same property.

use std::collections::{BTreeMap, BTreeSet};

use rand::Rng;
use serde::{Deserialize, Serialize};

use crate::feedback::Feedback;
use crate::model::{Property, PropertyValue, Role, Word};
use crate::shuffle::shuffle;

/// One draggable property value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisOption {
    pub property: Property,
    pub text: String,
}

/// Builds the option list for `word`, unshuffled: one option per property
/// the word defines, with class and meaning only for verbs.
pub fn analysis_options(word: &Word) -> Vec<AnalysisOption> {
    word.checked_properties()
        .iter()
        .filter_map(|&property| {
            word.property(property).defined().map(|text| AnalysisOption {
                property,
                text: text.to_string(),
            })
        })
        .collect()
}

/// State of one analysis sub-round.
#[derive(Debug, Clone)]
pub struct WordAnalysis {
    role: Role,
    word: Word,
    options: Vec<AnalysisOption>,
    placements: BTreeMap<Property, AnalysisOption>,
    revealed: BTreeSet<Property>,
    feedback: Option<Feedback>,
}

impl WordAnalysis {
    /// Opens a sub-round for `word`, which plays `role` in the sentence.
    pub fn new<R: Rng + ?Sized>(role: Role, word: Word, rng: &mut R) -> Self {
        let mut options = analysis_options(&word);
        shuffle(&mut options, rng);
        Self {
            role,
            word,
            options,
            placements: BTreeMap::new(),
            revealed: BTreeSet::new(),
            feedback: None,
        }
    }

    /// E.g. "Verb Analysis".
    pub fn title(&self) -> String {
        format!("{} Analysis", self.role.title())
    }

    pub fn role(&self) -> Role {
        self.role
    }

    pub fn word(&self) -> &Word {
        &self.word
    }

    /// Options not yet placed, in display order.
    pub fn options(&self) -> &[AnalysisOption] {
        &self.options
    }

    /// Slots offered for this word, in display order.
    pub fn slots(&self) -> Vec<Property> {
        self.word.slots()
    }

    pub fn placement(&self, slot: Property) -> Option<&AnalysisOption> {
        self.placements.get(&slot)
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// Drops the option at `index` onto `slot`.
    ///
    /// Accepted only when the option's property names the slot and the slot
    /// exists for this word. A rejected drop changes nothing and returns
    /// `false`.
    pub fn place_option(&mut self, index: usize, slot: Property) -> bool {
        let Some(option) = self.options.get(index) else {
            tracing::debug!(index, "analysis drop ignored: no such option");
            return false;
        };
        if option.property != slot || !self.word.slots().contains(&slot) {
            tracing::debug!(
                option = %option.property,
                %slot,
                "analysis drop ignored: property does not match slot"
            );
            return false;
        }
        if self.placements.contains_key(&slot) {
            return false;
        }
        let option = self.options.remove(index);
        self.placements.insert(slot, option);
        true
    }

    /// Compares every placed, defined property with the word.
    ///
    /// Properties the word leaves undefined are skipped, as are empty
    /// slots.
    pub fn check_answers(&mut self) -> &Feedback {
        let incorrect: Vec<Property> = self
            .word
            .checked_properties()
            .iter()
            .copied()
            .filter(|&property| {
                match (self.word.property(property), self.placements.get(&property)) {
                    (PropertyValue::Defined(expected), Some(placed)) => placed.text != expected,
                    _ => false,
                }
            })
            .collect();

        let feedback = if incorrect.is_empty() {
            Feedback::correct()
        } else {
            Feedback::corrective(
                incorrect
                    .iter()
                    .map(|p| format!("{p} is incorrect"))
                    .collect::<Vec<_>>()
                    .join(", "),
            )
        };
        self.feedback.insert(feedback)
    }

    /// Flips answer visibility for `slot` and returns the new state.
    /// Has no effect on scoring.
    pub fn toggle_reveal(&mut self, slot: Property) -> bool {
        if self.revealed.remove(&slot) {
            false
        } else {
            self.revealed.insert(slot);
            true
        }
    }

    pub fn is_revealed(&self, slot: Property) -> bool {
        self.revealed.contains(&slot)
    }

    /// The expected value for `slot`, as shown when revealed.
    pub fn answer(&self, slot: Property) -> String {
        match self.word.property(slot) {
            PropertyValue::Defined(v) => v.to_string(),
            PropertyValue::Missing => "N/A".to_string(),
            PropertyValue::NotApplicable => "Not applicable".to_string(),
        }
    }

    /// `true` once every option has been placed.
    pub fn is_complete(&self) -> bool {
        self.options.is_empty()
    }
}
