//! Result-screen figures. Everything here is a pure function of the final scores.

use serde::Serialize;
use utoipa::ToSchema;

use crate::state::questions::Level;

/// Who won the match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum Winner {
    /// The player scored more.
    You,
    /// The simulated opponent scored more.
    Opponent,
    /// Both scores are equal.
    Draw,
}

impl Winner {
    /// Compare final scores.
    pub fn from_scores(player_score: u32, opponent_score: u32) -> Self {
        if player_score == opponent_score {
            Winner::Draw
        } else if player_score > opponent_score {
            Winner::You
        } else {
            Winner::Opponent
        }
    }
}

/// Rank shown on the result screen: 100 minus 5 per missed question, capped at 100.
pub fn rank(player_score: u32, question_count: usize) -> i64 {
    let missed = question_count as i64 - i64::from(player_score);
    (100 - missed * 5).min(100)
}

/// Streak shown on the result screen.
pub fn streak(player_score: u32, opponent_score: u32) -> u32 {
    player_score.saturating_sub(opponent_score / 2)
}

/// Plain-text brag line the frontend can copy to the clipboard.
pub fn share_text(player_score: u32, level: Level) -> String {
    format!(
        "I scored {player_score} in Game Quiz Arena (Level: {})! Try it yourself.",
        level.label()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn equal_scores_are_a_draw() {
        assert_eq!(Winner::from_scores(7, 7), Winner::Draw);
        assert_eq!(Winner::from_scores(0, 0), Winner::Draw);
    }

    #[test]
    fn higher_score_wins() {
        assert_eq!(Winner::from_scores(8, 3), Winner::You);
        assert_eq!(Winner::from_scores(2, 9), Winner::Opponent);
    }

    #[test]
    fn rank_loses_five_points_per_miss() {
        assert_eq!(rank(10, 10), 100);
        assert_eq!(rank(7, 10), 85);
        assert_eq!(rank(0, 10), 50);
        assert_eq!(rank(4, 4), 100);
    }

    #[test]
    fn streak_discounts_half_the_opponent_score() {
        assert_eq!(streak(7, 7), 4);
        assert_eq!(streak(10, 0), 10);
        assert_eq!(streak(1, 9), 0);
    }

    #[test]
    fn share_text_uses_capitalized_level() {
        assert_eq!(
            share_text(8, Level::Hard),
            "I scored 8 in Game Quiz Arena (Level: Hard)! Try it yourself."
        );
    }
}
