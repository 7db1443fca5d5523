use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::state::questions::Level;

/// Timing and opponent parameters attached to a level.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LevelSettings {
    /// Seconds granted per question.
    pub countdown_seconds: u32,
    /// Chance the opponent scores on each of its ticks.
    pub opponent_tick_probability: f64,
}

impl LevelSettings {
    /// Reject zero-length countdowns and probabilities outside `[0, 1]`.
    pub fn validate(&self) -> Result<(), LevelSettingsError> {
        if self.countdown_seconds == 0 {
            return Err(LevelSettingsError::ZeroCountdown);
        }
        if !(0.0..=1.0).contains(&self.opponent_tick_probability) {
            return Err(LevelSettingsError::ProbabilityOutOfRange(
                self.opponent_tick_probability,
            ));
        }
        Ok(())
    }
}

/// Reasons a [`LevelSettings`] entry is unusable.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum LevelSettingsError {
    /// Countdown must last at least one second.
    #[error("countdown must be at least one second")]
    ZeroCountdown,
    /// Probability must be within `[0, 1]`.
    #[error("opponent tick probability {0} is outside [0, 1]")]
    ProbabilityOutOfRange(f64),
}

/// Settings for every level.
#[derive(Debug, Clone, PartialEq)]
pub struct LevelTable {
    entries: IndexMap<Level, LevelSettings>,
}

impl LevelTable {
    /// Build a table, filling levels absent from `overrides` with their defaults.
    pub fn with_overrides(overrides: IndexMap<Level, LevelSettings>) -> Self {
        let mut table = Self::default();
        for (level, settings) in overrides {
            table.entries.insert(level, settings);
        }
        table
    }

    /// Settings for `level`.
    pub fn get(&self, level: Level) -> LevelSettings {
        self.entries
            .get(&level)
            .copied()
            .unwrap_or_else(|| default_settings(level))
    }

    /// Iterate over levels in display order.
    pub fn iter(&self) -> impl Iterator<Item = (Level, LevelSettings)> + '_ {
        Level::ALL.into_iter().map(|level| (level, self.get(level)))
    }
}

impl Default for LevelTable {
    fn default() -> Self {
        Self {
            entries: Level::ALL
                .into_iter()
                .map(|level| (level, default_settings(level)))
                .collect(),
        }
    }
}

fn default_settings(level: Level) -> LevelSettings {
    match level {
        Level::Easy => LevelSettings {
            countdown_seconds: 15,
            opponent_tick_probability: 0.35,
        },
        Level::Intermediate => LevelSettings {
            countdown_seconds: 12,
            opponent_tick_probability: 0.55,
        },
        Level::Hard => LevelSettings {
            countdown_seconds: 9,
            opponent_tick_probability: 0.72,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_get_harder_with_level() {
        let table = LevelTable::default();
        assert_eq!(table.get(Level::Easy).countdown_seconds, 15);
        assert_eq!(table.get(Level::Intermediate).countdown_seconds, 12);
        assert_eq!(table.get(Level::Hard).countdown_seconds, 9);
        assert!(
            table.get(Level::Easy).opponent_tick_probability
                < table.get(Level::Hard).opponent_tick_probability
        );
    }

    #[test]
    fn overrides_replace_only_listed_levels() {
        let mut overrides = IndexMap::new();
        overrides.insert(
            Level::Hard,
            LevelSettings {
                countdown_seconds: 5,
                opponent_tick_probability: 0.9,
            },
        );
        let table = LevelTable::with_overrides(overrides);
        assert_eq!(table.get(Level::Hard).countdown_seconds, 5);
        assert_eq!(table.get(Level::Easy).countdown_seconds, 15);
        assert_eq!(table.iter().count(), 3);
    }

    #[test]
    fn validation_rejects_bad_entries() {
        let zero = LevelSettings {
            countdown_seconds: 0,
            opponent_tick_probability: 0.5,
        };
        assert_eq!(zero.validate(), Err(LevelSettingsError::ZeroCountdown));

        let too_likely = LevelSettings {
            countdown_seconds: 10,
            opponent_tick_probability: 1.5,
        };
        assert!(matches!(
            too_likely.validate(),
            Err(LevelSettingsError::ProbabilityOutOfRange(_))
        ));
    }
}
