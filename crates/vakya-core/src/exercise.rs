//! The sentence exercise engine.
//!
//! The engine runs one round at a time:
//!
//! ```text
//!   Idle ──begin_load──→ Loading ──finish_load──→ Ready
//!                           ↑                      │
//!                           └──────begin_load──────┘
//!                           │
//!                           └──(fetch failed, no fallback)──→ Error
//! ```
//!
//! A round owns the sentence record, the token pool, the role placements
//! and the hint/feedback readout. Placements are evaluated live: whenever
//! subject and verb are both filled the feedback is recomputed.

use std::collections::BTreeMap;

use rand::Rng;

use crate::analysis::WordAnalysis;
use crate::error::ExerciseError;
use crate::fallback::fallback_sentence;
use crate::feedback::{Feedback, LOAD_ERROR_MESSAGE};
use crate::model::{NounHint, Role, SentenceRecord, Token};
use crate::shuffle::shuffle;
use crate::traits::SentenceSource;

/// Configuration for the exercise engine.
#[derive(Debug, Clone)]
pub struct EngineConfig {
    /// Substitute the built-in sentence when the source fails.
    pub offline_fallback: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            offline_fallback: true,
        }
    }
}

/// Coarse engine state for rendering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EngineState {
    /// No round requested yet.
    Idle,
    /// A sentence has been requested and not yet applied.
    Loading,
    /// A round is in progress.
    Ready,
    /// The last load failed and no fallback was available.
    Error,
}

/// Where the current round's sentence came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RoundOrigin {
    Service,
    Fallback,
}

/// Identifies one load request. Only the newest ticket may install a round.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundTicket {
    generation: u64,
}

impl RoundTicket {
    pub fn generation(&self) -> u64 {
        self.generation
    }
}

// ---------------------------------------------------------------------------
// Hints
// ---------------------------------------------------------------------------

/// Descriptive hint text for each role.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hints {
    pub subject: String,
    pub object: String,
    pub verb: String,
}

fn or_na(value: &Option<String>) -> &str {
    value.as_deref().unwrap_or("N/A")
}

fn noun_hint_text(hint: Option<&NounHint>, role: Role) -> String {
    match hint {
        Some(h) => format!("Gender: {}, Number: {}", or_na(&h.gender), or_na(&h.number)),
        None => format!("No {role} in this sentence"),
    }
}

impl Hints {
    /// Renders the hint metadata of `record`.
    pub fn from_record(record: &SentenceRecord) -> Self {
        let hint = &record.hint;
        let verb = match &hint.verb {
            Some(v) => format!(
                "Class: {}, Meaning: \"{}\", Person: {}, Number: {}",
                or_na(&v.class),
                or_na(&v.meaning),
                or_na(&v.person),
                or_na(&v.number)
            ),
            None => "Class: N/A, Meaning: \"N/A\", Person: N/A, Number: N/A".to_string(),
        };
        Self {
            subject: noun_hint_text(hint.subject.as_ref(), Role::Subject),
            object: noun_hint_text(hint.object.as_ref(), Role::Object),
            verb,
        }
    }

    pub fn get(&self, role: Role) -> &str {
        match role {
            Role::Subject => &self.subject,
            Role::Object => &self.object,
            Role::Verb => &self.verb,
        }
    }
}

// ---------------------------------------------------------------------------
// Round
// ---------------------------------------------------------------------------

/// State of one exercise round.
#[derive(Debug, Clone)]
pub struct Round {
    record: SentenceRecord,
    origin: RoundOrigin,
    /// All tokens, indexed by their position in the sentence.
    tokens: Vec<Token>,
    /// Ids of unplaced tokens, in display order.
    pool: Vec<usize>,
    placements: BTreeMap<Role, usize>,
    selected: Option<usize>,
    hints: Option<Hints>,
    feedback: Option<Feedback>,
    analysis: Option<WordAnalysis>,
}

impl Round {
    /// Starts a round over `record` with a freshly shuffled pool.
    pub fn new<R: Rng + ?Sized>(record: SentenceRecord, origin: RoundOrigin, rng: &mut R) -> Self {
        let tokens: Vec<Token> = record
            .tokens()
            .into_iter()
            .enumerate()
            .map(|(id, text)| Token {
                id,
                text: text.to_string(),
            })
            .collect();
        let mut pool: Vec<usize> = (0..tokens.len()).collect();
        shuffle(&mut pool, rng);

        Self {
            record,
            origin,
            tokens,
            pool,
            placements: BTreeMap::new(),
            selected: None,
            hints: None,
            feedback: None,
            analysis: None,
        }
    }

    pub fn record(&self) -> &SentenceRecord {
        &self.record
    }

    pub fn sentence(&self) -> &str {
        &self.record.sentence
    }

    pub fn origin(&self) -> RoundOrigin {
        self.origin
    }

    pub fn is_fallback(&self) -> bool {
        self.origin == RoundOrigin::Fallback
    }

    pub fn token(&self, id: usize) -> Option<&Token> {
        self.tokens.get(id)
    }

    /// Unplaced tokens, in display order.
    pub fn available(&self) -> Vec<&Token> {
        self.pool.iter().map(|&id| &self.tokens[id]).collect()
    }

    /// The token currently placed in `role`.
    pub fn placed(&self, role: Role) -> Option<&Token> {
        self.placements.get(&role).map(|&id| &self.tokens[id])
    }

    pub fn selected(&self) -> Option<&Token> {
        self.selected.map(|id| &self.tokens[id])
    }

    /// Hint text, once revealed.
    pub fn hints(&self) -> Option<&Hints> {
        self.hints.as_ref()
    }

    pub fn feedback(&self) -> Option<&Feedback> {
        self.feedback.as_ref()
    }

    /// `true` once the current placements evaluated as fully correct.
    pub fn is_solved(&self) -> bool {
        self.feedback.as_ref().is_some_and(Feedback::is_positive)
    }

    /// Finds the first token with surface form `text`, preferring one that
    /// is still in the pool.
    pub fn find_token(&self, text: &str) -> Option<&Token> {
        self.pool
            .iter()
            .map(|&id| &self.tokens[id])
            .find(|t| t.text == text)
            .or_else(|| self.tokens.iter().find(|t| t.text == text))
    }

    /// Places token `token_id` into `role`.
    ///
    /// The token leaves the pool and any role it held. A token already in
    /// `role` goes back to the pool. Unknown ids are ignored and return
    /// `false`.
    pub fn place_word(&mut self, token_id: usize, role: Role) -> bool {
        if token_id >= self.tokens.len() {
            tracing::debug!(token_id, %role, "drop ignored: no such token");
            return false;
        }
        self.selected = None;
        if self.placements.get(&role) == Some(&token_id) {
            return true;
        }

        self.pool.retain(|&id| id != token_id);
        self.placements.retain(|_, id| *id != token_id);
        if let Some(displaced) = self.placements.insert(role, token_id) {
            self.pool.push(displaced);
        }

        self.refresh_feedback();
        true
    }

    /// Moves whatever sits in `role` back to the pool. Returns `false` if the
    /// role was empty.
    pub fn clear_role(&mut self, role: Role) -> bool {
        let Some(id) = self.placements.remove(&role) else {
            return false;
        };
        self.pool.push(id);
        self.refresh_feedback();
        true
    }

    /// First half of the two-step "select token, select slot" interaction.
    pub fn select_token(&mut self, token_id: usize) -> bool {
        if token_id >= self.tokens.len() {
            return false;
        }
        self.selected = Some(token_id);
        true
    }

    /// Second half: places the selected token into `role`.
    pub fn place_selected(&mut self, role: Role) -> bool {
        match self.selected.take() {
            Some(id) => self.place_word(id, role),
            None => false,
        }
    }

    /// Reveals the hint text. Idempotent within a round.
    pub fn show_hints(&mut self) -> &Hints {
        let record = &self.record;
        self.hints.get_or_insert_with(|| Hints::from_record(record))
    }

    /// Opens the word-analysis sub-round for the word playing `role`.
    pub fn analyze_word<R: Rng + ?Sized>(
        &mut self,
        role: Role,
        rng: &mut R,
    ) -> Result<&mut WordAnalysis, ExerciseError> {
        let word = self
            .record
            .word(role)
            .ok_or(ExerciseError::NoWordForRole(role))?;
        Ok(self.analysis.insert(WordAnalysis::new(role, word, rng)))
    }

    pub fn analysis(&self) -> Option<&WordAnalysis> {
        self.analysis.as_ref()
    }

    pub fn analysis_mut(&mut self) -> Option<&mut WordAnalysis> {
        self.analysis.as_mut()
    }

    pub fn close_analysis(&mut self) {
        self.analysis = None;
    }

    fn mandatory_roles_filled(&self) -> bool {
        self.placements.contains_key(&Role::Subject) && self.placements.contains_key(&Role::Verb)
    }

    fn role_correct(&self, role: Role) -> bool {
        let placed = self.placed(role).map(|t| t.text.as_str());
        placed == self.record.answer_form(role)
    }

    /// Feedback exists only while subject and verb are both filled.
    fn refresh_feedback(&mut self) {
        if self.mandatory_roles_filled() {
            self.evaluate();
        } else {
            self.feedback = None;
        }
    }

    fn evaluate(&mut self) {
        let all_correct = Role::ALL.iter().all(|&role| self.role_correct(role));
        self.feedback = Some(if all_correct {
            Feedback::correct()
        } else {
            Feedback::incorrect()
        });
        tracing::debug!(correct = all_correct, "placements evaluated");
    }
}

// ---------------------------------------------------------------------------
// Engine
// ---------------------------------------------------------------------------

/// Drives rounds: loading, fallback, and delegation to the active round.
pub struct ExerciseEngine {
    config: EngineConfig,
    state: EngineState,
    generation: u64,
    round: Option<Round>,
    error: Option<Feedback>,
}

impl ExerciseEngine {
    pub fn new(config: EngineConfig) -> Self {
        Self {
            config,
            state: EngineState::Idle,
            generation: 0,
            round: None,
            error: None,
        }
    }

    pub fn state(&self) -> EngineState {
        self.state
    }

    pub fn round(&self) -> Option<&Round> {
        self.round.as_ref()
    }

    pub fn round_mut(&mut self) -> Option<&mut Round> {
        self.round.as_mut()
    }

    /// The feedback line to render: the round's feedback, or the load error.
    pub fn feedback(&self) -> Option<&Feedback> {
        match self.state {
            EngineState::Error => self.error.as_ref(),
            _ => self.round.as_ref().and_then(Round::feedback),
        }
    }

    pub fn error_message(&self) -> Option<&str> {
        match self.state {
            EngineState::Error => self.error.as_ref().map(|f| f.message.as_str()),
            _ => None,
        }
    }

    /// Starts a new round request. Any earlier outstanding request becomes
    /// stale.
    pub fn begin_load(&mut self) -> RoundTicket {
        self.generation += 1;
        self.state = EngineState::Loading;
        self.round = None;
        self.error = None;
        RoundTicket {
            generation: self.generation,
        }
    }

    /// Applies the outcome of the request identified by `ticket`.
    ///
    /// Returns `false` if the ticket is stale; the outcome is dropped. A
    /// failed or invalid fetch installs the built-in sentence when the
    /// fallback is enabled, and moves to [`EngineState::Error`] otherwise.
    pub fn finish_load<R: Rng + ?Sized>(
        &mut self,
        ticket: RoundTicket,
        outcome: anyhow::Result<SentenceRecord>,
        rng: &mut R,
    ) -> bool {
        if ticket.generation != self.generation || self.state != EngineState::Loading {
            tracing::debug!(
                ticket = ticket.generation,
                current = self.generation,
                "discarding stale sentence response"
            );
            return false;
        }

        let checked = outcome.and_then(|record| {
            record.validate()?;
            Ok(record)
        });

        match checked {
            Ok(record) => {
                tracing::info!(sentence = %record.sentence, "round ready");
                self.install(Round::new(record, RoundOrigin::Service, rng));
            }
            Err(e) if self.config.offline_fallback => {
                tracing::warn!("sentence service unavailable, using built-in sentence: {e:#}");
                self.install(Round::new(fallback_sentence(), RoundOrigin::Fallback, rng));
            }
            Err(e) => {
                tracing::error!("failed to load sentence: {e:#}");
                self.state = EngineState::Error;
                self.error = Some(Feedback::error(LOAD_ERROR_MESSAGE));
            }
        }
        true
    }

    /// Fetches a sentence from `source` and starts a round with it.
    pub async fn load_next<R: Rng + ?Sized>(
        &mut self,
        source: &dyn SentenceSource,
        rng: &mut R,
    ) -> EngineState {
        let ticket = self.begin_load();
        let outcome = source.fetch_sentence().await;
        self.finish_load(ticket, outcome, rng);
        self.state
    }

    fn install(&mut self, round: Round) {
        self.round = Some(round);
        self.state = EngineState::Ready;
    }

    /// The round in progress, or [`ExerciseError::NotReady`] outside the
    /// `Ready` state.
    pub fn ready_round(&mut self) -> Result<&mut Round, ExerciseError> {
        match (self.state, self.round.as_mut()) {
            (EngineState::Ready, Some(round)) => Ok(round),
            _ => Err(ExerciseError::NotReady),
        }
    }

    /// See [`Round::place_word`]. A no-op returning `false` when no round is
    /// ready.
    pub fn place_word(&mut self, token_id: usize, role: Role) -> bool {
        self.ready_round()
            .map(|round| round.place_word(token_id, role))
            .unwrap_or(false)
    }

    /// See [`Round::clear_role`].
    pub fn clear_role(&mut self, role: Role) -> bool {
        self.ready_round()
            .map(|round| round.clear_role(role))
            .unwrap_or(false)
    }

    /// See [`Round::show_hints`].
    pub fn show_hints(&mut self) -> Result<&Hints, ExerciseError> {
        Ok(self.ready_round()?.show_hints())
    }

    /// See [`Round::analyze_word`].
    pub fn analyze_word<R: Rng + ?Sized>(
        &mut self,
        role: Role,
        rng: &mut R,
    ) -> Result<&mut WordAnalysis, ExerciseError> {
        self.ready_round()?.analyze_word(role, rng)
    }
}
