//! The single owned match session and every named transition that mutates it.
//!
//! Timer-driven transitions take the `epoch` they were scheduled under. The
//! epoch is bumped on every context change (new question, answer, timeout,
//! quit...), so a callback that fires late is reported as stale instead of
//! corrupting the score or advancing twice.

use std::time::SystemTime;

use rand::Rng;
use serde::Serialize;
use thiserror::Error;
use tracing::{debug, info};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::state::{
    levels::LevelSettings,
    outcome::{self, Winner},
    questions::{Level, OPTION_COUNT, Question, QuestionBank},
    state_machine::{InvalidTransition, MatchEvent, Stage, StageMachine},
};

/// Transient verdict displayed after a question is resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Feedback {
    /// Selected option was the right one.
    Correct,
    /// Selected option was wrong, or the countdown expired.
    Wrong,
}

/// Errors raised by user intents that cannot be honoured.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MatchError {
    /// Matchmaking requires a non-blank player name.
    #[error("please enter your name")]
    EmptyPlayerName,
    /// Only options `0..4` exist.
    #[error("option {0} does not exist")]
    OptionOutOfRange(usize),
    /// The intent is only meaningful in another stage.
    #[error("{action} is not available while in {stage:?}")]
    WrongStage {
        /// Intent that was rejected.
        action: &'static str,
        /// Stage the session was in.
        stage: Stage,
    },
    /// Underlying stage machine refused the event.
    #[error(transparent)]
    Transition(#[from] InvalidTransition),
}

/// Outcome of one countdown tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountdownTick {
    /// One second elapsed; carries the seconds left.
    Ticked(u32),
    /// Time ran out; the question was resolved as wrong.
    Expired,
    /// The tick belongs to a question that is no longer pending.
    Stale,
}

/// Outcome of advancing past a resolved question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Advance {
    /// Moved to the next question.
    NextQuestion,
    /// Last question done; the session is now at the result screen.
    Finished,
    /// The advance belongs to a context that no longer exists.
    Stale,
}

/// Figures displayed on the result screen, recomputed from the current scores.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MatchOutcome {
    /// Who won.
    pub winner: Winner,
    /// Capped rank score.
    pub rank: i64,
    /// Streak value.
    pub streak: u32,
}

/// Player's session: stage, questions, scores and the transient per-question state.
#[derive(Debug, Clone)]
pub struct MatchSession {
    machine: StageMachine,
    epoch: u64,
    player_name: String,
    level: Level,
    settings: LevelSettings,
    match_id: Option<Uuid>,
    opponent_name: String,
    questions: Vec<Question>,
    current_index: usize,
    player_score: u32,
    opponent_score: u32,
    selected_option: Option<usize>,
    feedback: Option<Feedback>,
    remaining_seconds: u32,
    updated_at: SystemTime,
}

impl MatchSession {
    /// Fresh session at the home screen for `level`.
    pub fn new(level: Level, settings: LevelSettings) -> Self {
        Self {
            machine: StageMachine::new(),
            epoch: 0,
            player_name: String::new(),
            level,
            settings,
            match_id: None,
            opponent_name: String::new(),
            questions: Vec::new(),
            current_index: 0,
            player_score: 0,
            opponent_score: 0,
            selected_option: None,
            feedback: None,
            remaining_seconds: settings.countdown_seconds,
            updated_at: SystemTime::now(),
        }
    }

    /// Stage the session is in.
    pub fn stage(&self) -> Stage {
        self.machine.stage()
    }

    /// Number of stage transitions applied so far.
    pub fn version(&self) -> usize {
        self.machine.version()
    }

    /// Token identifying the current timer context.
    pub fn epoch(&self) -> u64 {
        self.epoch
    }

    /// Name typed on the home screen.
    pub fn player_name(&self) -> &str {
        &self.player_name
    }

    /// Selected difficulty.
    pub fn level(&self) -> Level {
        self.level
    }

    /// Countdown and opponent strength of the selected level.
    pub fn settings(&self) -> LevelSettings {
        self.settings
    }

    /// Identifier of the running or last finished match.
    pub fn match_id(&self) -> Option<Uuid> {
        self.match_id
    }

    /// Simulated opponent, empty until matchmaking completes.
    pub fn opponent_name(&self) -> &str {
        &self.opponent_name
    }

    /// Questions sampled for the current match.
    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    /// Zero-based index of the question on screen.
    pub fn current_index(&self) -> usize {
        self.current_index
    }

    /// Question currently displayed, if a match is running.
    pub fn current_question(&self) -> Option<&Question> {
        match self.stage() {
            Stage::Playing => self.questions.get(self.current_index),
            _ => None,
        }
    }

    /// Questions the player answered correctly.
    pub fn player_score(&self) -> u32 {
        self.player_score
    }

    /// Points scored by the simulated opponent.
    pub fn opponent_score(&self) -> u32 {
        self.opponent_score
    }

    /// Option picked for the current question, if any.
    pub fn selected_option(&self) -> Option<usize> {
        self.selected_option
    }

    /// Verdict shown once the current question is resolved.
    pub fn feedback(&self) -> Option<Feedback> {
        self.feedback
    }

    /// Seconds left on the current question's countdown.
    pub fn remaining_seconds(&self) -> u32 {
        self.remaining_seconds
    }

    /// Time of the last mutation.
    pub fn updated_at(&self) -> SystemTime {
        self.updated_at
    }

    /// True while the current question still accepts an answer and its countdown runs.
    pub fn is_awaiting_answer(&self) -> bool {
        self.stage() == Stage::Playing && self.feedback.is_none()
    }

    /// Result-screen figures; only available once the match has finished.
    pub fn outcome(&self) -> Option<MatchOutcome> {
        if self.stage() != Stage::Result {
            return None;
        }
        Some(MatchOutcome {
            winner: Winner::from_scores(self.player_score, self.opponent_score),
            rank: outcome::rank(self.player_score, self.questions.len()),
            streak: outcome::streak(self.player_score, self.opponent_score),
        })
    }

    /// Share line for the current score and level.
    pub fn share_text(&self) -> String {
        outcome::share_text(self.player_score, self.level)
    }

    /// Update the player name typed on the home screen.
    pub fn set_name(&mut self, name: impl Into<String>) -> Result<(), MatchError> {
        self.ensure_stage(Stage::Home, "changing the name")?;
        self.player_name = name.into();
        self.touch();
        Ok(())
    }

    /// Pick a `Guest{n}` name on behalf of the player.
    pub fn set_random_name<R: Rng + ?Sized>(&mut self, rng: &mut R) -> Result<(), MatchError> {
        let name = format!("Guest{}", rng.random_range(0..999));
        self.set_name(name)
    }

    /// Select a level on the home screen; the displayed countdown follows it.
    pub fn set_level(&mut self, level: Level, settings: LevelSettings) -> Result<(), MatchError> {
        self.ensure_stage(Stage::Home, "changing the level")?;
        self.level = level;
        self.settings = settings;
        self.remaining_seconds = settings.countdown_seconds;
        self.touch();
        Ok(())
    }

    /// Home → Searching. Returns the epoch the matchmaking delay must carry.
    pub fn find_opponent(&mut self) -> Result<u64, MatchError> {
        self.ensure_stage(Stage::Home, "finding an opponent")?;
        if self.player_name.trim().is_empty() {
            return Err(MatchError::EmptyPlayerName);
        }
        self.machine.apply(MatchEvent::FindOpponent)?;
        self.bump_epoch();
        info!(player = %self.player_name, level = %self.level, "searching for an opponent");
        Ok(self.epoch)
    }

    /// Searching → Playing once matchmaking completes.
    ///
    /// Returns the new match identifier, or `None` when the matchmaking delay is stale.
    pub fn begin_match<R: Rng + ?Sized>(
        &mut self,
        epoch: u64,
        bank: &QuestionBank,
        rng: &mut R,
    ) -> Result<Option<Uuid>, MatchError> {
        if epoch != self.epoch || self.stage() != Stage::Searching {
            debug!(epoch, current = self.epoch, "ignoring stale matchmaking completion");
            return Ok(None);
        }

        self.machine.apply(MatchEvent::OpponentFound)?;
        let match_id = Uuid::new_v4();
        self.match_id = Some(match_id);
        self.opponent_name = format!("Player_{}", rng.random_range(100..=999));
        self.questions = bank.sample(self.level, rng);
        self.current_index = 0;
        self.player_score = 0;
        self.opponent_score = 0;
        self.selected_option = None;
        self.feedback = None;
        self.remaining_seconds = self.settings.countdown_seconds;
        self.bump_epoch();

        info!(
            %match_id,
            opponent = %self.opponent_name,
            questions = self.questions.len(),
            "match started"
        );
        Ok(Some(match_id))
    }

    /// Record the player's answer for the current question.
    ///
    /// Returns `None` when the question was already resolved: a question is answered at most once.
    pub fn select_option(&mut self, index: usize) -> Result<Option<Feedback>, MatchError> {
        self.ensure_stage(Stage::Playing, "answering")?;
        if index >= OPTION_COUNT {
            return Err(MatchError::OptionOutOfRange(index));
        }
        if self.selected_option.is_some() || self.feedback.is_some() {
            debug!(index, "question already resolved; ignoring selection");
            return Ok(None);
        }
        let Some(question) = self.questions.get(self.current_index) else {
            return Ok(None);
        };

        let feedback = if question.is_correct(index) {
            self.player_score += 1;
            Feedback::Correct
        } else {
            Feedback::Wrong
        };
        self.selected_option = Some(index);
        self.feedback = Some(feedback);
        self.bump_epoch();
        debug!(index, ?feedback, question = self.current_index, "answer recorded");
        Ok(Some(feedback))
    }

    /// Count one second off the current question.
    pub fn tick_countdown(&mut self, epoch: u64) -> CountdownTick {
        if epoch != self.epoch || !self.is_awaiting_answer() {
            return CountdownTick::Stale;
        }

        if self.remaining_seconds <= 1 {
            self.remaining_seconds = 0;
            self.selected_option = None;
            self.feedback = Some(Feedback::Wrong);
            self.bump_epoch();
            debug!(question = self.current_index, "countdown expired");
            return CountdownTick::Expired;
        }

        self.remaining_seconds -= 1;
        self.touch();
        CountdownTick::Ticked(self.remaining_seconds)
    }

    /// Leave a resolved question: next one, or the result screen after the last.
    pub fn advance(&mut self, epoch: u64) -> Result<Advance, MatchError> {
        if epoch != self.epoch || self.stage() != Stage::Playing || self.feedback.is_none() {
            debug!(epoch, current = self.epoch, "ignoring stale advance");
            return Ok(Advance::Stale);
        }

        if self.current_index + 1 >= self.questions.len() {
            self.machine.apply(MatchEvent::QuestionsExhausted)?;
            self.bump_epoch();
            info!(
                player_score = self.player_score,
                opponent_score = self.opponent_score,
                "match finished"
            );
            return Ok(Advance::Finished);
        }

        self.machine.apply(MatchEvent::NextQuestion)?;
        self.current_index += 1;
        self.selected_option = None;
        self.feedback = None;
        self.remaining_seconds = self.settings.countdown_seconds;
        self.bump_epoch();
        Ok(Advance::NextQuestion)
    }

    /// One opponent-simulation tick for `match_id`.
    ///
    /// Returns `None` when the match is over or was replaced, otherwise whether
    /// the opponent scored.
    pub fn opponent_tick<R: Rng + ?Sized>(&mut self, match_id: Uuid, rng: &mut R) -> Option<bool> {
        if self.stage() != Stage::Playing || self.match_id != Some(match_id) {
            return None;
        }

        if !rng.random_bool(self.settings.opponent_tick_probability) {
            return Some(false);
        }

        let cap = u32::try_from(self.questions.len()).unwrap_or(u32::MAX);
        let next = (self.opponent_score + 1).min(cap);
        let scored = next != self.opponent_score;
        self.opponent_score = next;
        if scored {
            self.touch();
        }
        Some(scored)
    }

    /// Playing → Home, discarding the rest of the match. Name and level are kept.
    pub fn quit(&mut self) -> Result<(), MatchError> {
        self.machine.apply(MatchEvent::Quit)?;
        self.clear_match();
        info!(player = %self.player_name, "match abandoned");
        Ok(())
    }

    /// Result → Home with a blank name, ready for another round.
    pub fn play_again(&mut self) -> Result<(), MatchError> {
        self.machine.apply(MatchEvent::PlayAgain)?;
        self.player_name.clear();
        self.clear_match();
        Ok(())
    }

    /// Result → Home; resets the same fields as [`MatchSession::play_again`].
    pub fn go_home(&mut self) -> Result<(), MatchError> {
        self.machine.apply(MatchEvent::GoHome)?;
        self.player_name.clear();
        self.clear_match();
        Ok(())
    }

    fn clear_match(&mut self) {
        self.match_id = None;
        self.opponent_name.clear();
        self.questions.clear();
        self.current_index = 0;
        self.player_score = 0;
        self.opponent_score = 0;
        self.selected_option = None;
        self.feedback = None;
        self.remaining_seconds = self.settings.countdown_seconds;
        self.bump_epoch();
    }

    fn ensure_stage(&self, expected: Stage, action: &'static str) -> Result<(), MatchError> {
        let stage = self.stage();
        if stage == expected {
            Ok(())
        } else {
            Err(MatchError::WrongStage { action, stage })
        }
    }

    fn bump_epoch(&mut self) {
        self.epoch += 1;
        self.touch();
    }

    fn touch(&mut self) {
        self.updated_at = SystemTime::now();
    }
}
