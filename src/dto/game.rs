use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationErrors};

use crate::{
    dto::{format_system_time, stage::VisibleStage, validation::validate_player_name},
    state::{
        levels::LevelSettings,
        outcome::Winner,
        questions::{Level, OPTION_COUNT, Question},
        session::{Feedback, MatchSession},
    },
};

/// Payload replacing the player name on the home screen.
#[derive(Debug, Deserialize, ToSchema)]
pub struct SetNameRequest {
    pub name: String,
}

impl Validate for SetNameRequest {
    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();

        if let Err(e) = validate_player_name(&self.name) {
            errors.add("name", e);
        }

        if errors.is_empty() {
            Ok(())
        } else {
            Err(errors)
        }
    }
}

/// Payload selecting the difficulty on the home screen.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SetLevelRequest {
    pub level: Level,
}

/// Payload answering the current question.
#[derive(Debug, Deserialize, ToSchema, Validate)]
pub struct SelectOptionRequest {
    /// Zero-based index of the chosen option (0 = A ... 3 = D).
    #[validate(range(max = 3))]
    pub index: usize,
}

/// Question as displayed to the player.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct QuestionView {
    pub prompt: String,
    pub options: Vec<String>,
    /// Revealed only once the question has been resolved.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub correct_option: Option<usize>,
}

impl QuestionView {
    fn from_question(question: &Question, revealed: bool) -> Self {
        Self {
            prompt: question.prompt.clone(),
            options: question.options.to_vec(),
            correct_option: revealed.then_some(question.correct_option),
        }
    }
}

/// Result-screen figures.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct ResultSummary {
    pub winner: Winner,
    pub rank: i64,
    pub streak: u32,
    pub share_text: String,
}

/// Full observable state of the match session, re-emitted after every transition.
#[derive(Debug, Serialize, ToSchema, Clone)]
pub struct MatchSnapshot {
    pub stage: VisibleStage,
    /// Number of stage transitions applied so far.
    pub version: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub match_id: Option<Uuid>,
    pub player_name: String,
    pub level: Level,
    /// Seconds granted per question at the current level.
    pub countdown_seconds: u32,
    pub remaining_seconds: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opponent_name: Option<String>,
    pub question_index: usize,
    pub question_count: usize,
    /// Present while playing.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub question: Option<QuestionView>,
    pub selected_option: Option<usize>,
    pub feedback: Option<Feedback>,
    pub player_score: u32,
    pub opponent_score: u32,
    /// Present on the result screen.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub result: Option<ResultSummary>,
    pub updated_at: String,
}

impl From<&MatchSession> for MatchSnapshot {
    fn from(session: &MatchSession) -> Self {
        let revealed = session.feedback().is_some();
        let opponent_name = Some(session.opponent_name())
            .filter(|name| !name.is_empty())
            .map(str::to_string);

        Self {
            stage: session.stage().into(),
            version: session.version(),
            match_id: session.match_id(),
            player_name: session.player_name().to_string(),
            level: session.level(),
            countdown_seconds: session.settings().countdown_seconds,
            remaining_seconds: session.remaining_seconds(),
            opponent_name,
            question_index: session.current_index(),
            question_count: session.questions().len(),
            question: session
                .current_question()
                .map(|question| QuestionView::from_question(question, revealed)),
            selected_option: session.selected_option(),
            feedback: session.feedback(),
            player_score: session.player_score(),
            opponent_score: session.opponent_score(),
            result: session.outcome().map(|outcome| ResultSummary {
                winner: outcome.winner,
                rank: outcome.rank,
                streak: outcome.streak,
                share_text: session.share_text(),
            }),
            updated_at: format_system_time(session.updated_at()),
        }
    }
}

/// Share line returned by `/match/share`.
#[derive(Debug, Serialize, ToSchema)]
pub struct ShareResponse {
    pub text: String,
}

/// Public description of one level.
#[derive(Debug, Serialize, ToSchema)]
pub struct LevelSummary {
    pub level: Level,
    pub label: String,
    pub countdown_seconds: u32,
    pub opponent_tick_probability: f64,
    /// Questions available in this level's pool.
    pub question_count: usize,
    pub options_per_question: usize,
}

impl LevelSummary {
    /// Describe `level` with its settings and pool size.
    pub fn new(level: Level, settings: LevelSettings, question_count: usize) -> Self {
        Self {
            level,
            label: level.label().to_string(),
            countdown_seconds: settings.countdown_seconds,
            opponent_tick_probability: settings.opponent_tick_probability,
            question_count,
            options_per_question: OPTION_COUNT,
        }
    }
}

/// Response listing all levels.
#[derive(Debug, Serialize, ToSchema)]
pub struct LevelsResponse {
    pub levels: Vec<LevelSummary>,
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::state::{levels::LevelTable, questions::QuestionBank};

    fn playing_session() -> MatchSession {
        let mut rng = StdRng::seed_from_u64(3);
        let mut session = MatchSession::new(Level::Easy, LevelTable::default().get(Level::Easy));
        session.set_name("Ada").unwrap();
        let epoch = session.find_opponent().unwrap();
        session
            .begin_match(epoch, &QuestionBank::default(), &mut rng)
            .unwrap();
        session
    }

    #[test]
    fn home_snapshot_hides_match_details() {
        let session = MatchSession::new(Level::Hard, LevelTable::default().get(Level::Hard));
        let snapshot = MatchSnapshot::from(&session);

        assert_eq!(snapshot.stage, VisibleStage::Home);
        assert!(snapshot.question.is_none());
        assert!(snapshot.opponent_name.is_none());
        assert!(snapshot.result.is_none());
        assert_eq!(snapshot.remaining_seconds, 9);
    }

    #[test]
    fn correct_option_is_revealed_only_after_resolution() {
        let mut session = playing_session();
        let snapshot = MatchSnapshot::from(&session);
        let question = snapshot.question.unwrap();
        assert!(question.correct_option.is_none());
        assert_eq!(question.options.len(), OPTION_COUNT);

        session.select_option(0).unwrap();
        let snapshot = MatchSnapshot::from(&session);
        assert!(snapshot.question.unwrap().correct_option.is_some());
        assert_eq!(snapshot.selected_option, Some(0));
    }

    #[test]
    fn snapshot_serialises_snake_case_enums() {
        let session = playing_session();
        let json = serde_json::to_value(MatchSnapshot::from(&session)).unwrap();
        assert_eq!(json["stage"], "playing");
        assert_eq!(json["level"], "easy");
        assert_eq!(json["feedback"], serde_json::Value::Null);
    }

    #[test]
    fn option_index_is_range_checked() {
        assert!(SelectOptionRequest { index: 3 }.validate().is_ok());
        assert!(SelectOptionRequest { index: 4 }.validate().is_err());
    }

    #[test]
    fn name_request_uses_player_name_rules() {
        let ok = SetNameRequest {
            name: "StarPlayer".into(),
        };
        assert!(ok.validate().is_ok());

        let too_long = SetNameRequest {
            name: "x".repeat(64),
        };
        assert!(too_long.validate().is_err());
    }
}
