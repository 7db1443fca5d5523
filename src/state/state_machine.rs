use thiserror::Error;

/// Top-level phases a match can be in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Stage {
    /// Player picks a name and a level; no match is running.
    #[default]
    Home,
    /// Waiting for the simulated matchmaking delay to elapse.
    Searching,
    /// Questions are being asked; countdown and opponent ticker are live.
    Playing,
    /// Final scores and outcome are displayed.
    Result,
}

/// Events that can be applied to the stage machine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchEvent {
    /// Player asked to be matched against an opponent.
    FindOpponent,
    /// Matchmaking delay elapsed and a synthetic opponent was assigned.
    OpponentFound,
    /// Current question resolved and another one remains.
    NextQuestion,
    /// Last question resolved.
    QuestionsExhausted,
    /// Player left the match before it finished.
    Quit,
    /// Player asked for another round from the result screen.
    PlayAgain,
    /// Player went back to the home screen from the result screen.
    GoHome,
}

/// Error returned when attempting to apply an invalid transition.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid transition: {event:?} cannot be applied while in {from:?}")]
pub struct InvalidTransition {
    /// The stage the machine was in when the invalid event was received.
    pub from: Stage,
    /// The event that cannot be applied from this stage.
    pub event: MatchEvent,
}

/// State machine implementing the Home → Searching → Playing → Result loop.
#[derive(Debug, Clone, Default)]
pub struct StageMachine {
    stage: Stage,
    version: usize,
}

impl StageMachine {
    /// Create a new state machine initialised at the home screen.
    pub fn new() -> Self {
        Self::default()
    }

    /// Inspect the current stage.
    pub fn stage(&self) -> Stage {
        self.stage
    }

    /// Number of transitions applied so far.
    pub fn version(&self) -> usize {
        self.version
    }

    /// Check whether `event` would be accepted from the current stage without applying it.
    pub fn can_apply(&self, event: MatchEvent) -> bool {
        self.compute_transition(event).is_ok()
    }

    /// Apply an event, moving the machine to the next stage.
    pub fn apply(&mut self, event: MatchEvent) -> Result<Stage, InvalidTransition> {
        let next = self.compute_transition(event)?;
        self.stage = next;
        self.version += 1;
        Ok(next)
    }

    fn compute_transition(&self, event: MatchEvent) -> Result<Stage, InvalidTransition> {
        let next = match (self.stage, event) {
            (Stage::Home, MatchEvent::FindOpponent) => Stage::Searching,
            (Stage::Searching, MatchEvent::OpponentFound) => Stage::Playing,
            (Stage::Playing, MatchEvent::NextQuestion) => Stage::Playing,
            (Stage::Playing, MatchEvent::QuestionsExhausted) => Stage::Result,
            (Stage::Playing, MatchEvent::Quit) => Stage::Home,
            (Stage::Result, MatchEvent::PlayAgain) => Stage::Home,
            (Stage::Result, MatchEvent::GoHome) => Stage::Home,
            (from, event) => return Err(InvalidTransition { from, event }),
        };

        Ok(next)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_stage_is_home() {
        let sm = StageMachine::new();
        assert_eq!(sm.stage(), Stage::Home);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn full_happy_path_through_match() {
        let mut sm = StageMachine::new();

        assert_eq!(sm.apply(MatchEvent::FindOpponent), Ok(Stage::Searching));
        assert_eq!(sm.apply(MatchEvent::OpponentFound), Ok(Stage::Playing));
        assert_eq!(sm.apply(MatchEvent::NextQuestion), Ok(Stage::Playing));
        assert_eq!(sm.apply(MatchEvent::QuestionsExhausted), Ok(Stage::Result));
        assert_eq!(sm.apply(MatchEvent::PlayAgain), Ok(Stage::Home));
        assert_eq!(sm.version(), 5);
    }

    #[test]
    fn quit_only_allowed_while_playing() {
        let mut sm = StageMachine::new();
        assert!(!sm.can_apply(MatchEvent::Quit));

        sm.apply(MatchEvent::FindOpponent).unwrap();
        assert!(!sm.can_apply(MatchEvent::Quit));

        sm.apply(MatchEvent::OpponentFound).unwrap();
        assert_eq!(sm.apply(MatchEvent::Quit), Ok(Stage::Home));
    }

    #[test]
    fn invalid_transition_returns_error_and_keeps_stage() {
        let mut sm = StageMachine::new();
        let err = sm.apply(MatchEvent::OpponentFound).unwrap_err();
        assert_eq!(err.from, Stage::Home);
        assert_eq!(err.event, MatchEvent::OpponentFound);
        assert_eq!(sm.stage(), Stage::Home);
        assert_eq!(sm.version(), 0);
    }

    #[test]
    fn result_returns_home_through_either_intent() {
        for event in [MatchEvent::PlayAgain, MatchEvent::GoHome] {
            let mut sm = StageMachine::new();
            sm.apply(MatchEvent::FindOpponent).unwrap();
            sm.apply(MatchEvent::OpponentFound).unwrap();
            sm.apply(MatchEvent::QuestionsExhausted).unwrap();
            assert_eq!(sm.apply(event), Ok(Stage::Home));
        }
    }
}
