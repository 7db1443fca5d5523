//! Application-level configuration loading: level settings, match timings and the question bank.

use std::{env, fs, io::ErrorKind, path::PathBuf, time::Duration};

use indexmap::IndexMap;
use serde::Deserialize;
use serde_with::{DurationMilliSeconds, serde_as};
use thiserror::Error;
use tracing::{info, warn};

use crate::state::{
    levels::{LevelSettings, LevelSettingsError, LevelTable},
    questions::{Level, OPTION_COUNT, Question, QuestionBank},
};

/// Default location on disk where the server looks for the JSON configuration.
const DEFAULT_CONFIG_PATH: &str = "config/app.json";
/// Environment variable that overrides [`DEFAULT_CONFIG_PATH`].
const CONFIG_PATH_ENV: &str = "QUIZ_ARENA_CONFIG_PATH";

#[derive(Debug, Clone, Default)]
/// Immutable runtime configuration shared across the application.
pub struct AppConfig {
    /// Countdown and opponent strength per level.
    pub levels: LevelTable,
    /// Delays used by the match runtime.
    pub timings: MatchTimings,
    /// Question pools per level.
    pub questions: QuestionBank,
    /// Fixed RNG seed, for reproducible sessions.
    pub seed: Option<u64>,
}

/// Delays driving matchmaking, feedback display and the background tickers.
#[serde_as]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct MatchTimings {
    /// Lower bound of the simulated matchmaking latency.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "matchmaking_min_ms")]
    pub matchmaking_min: Duration,
    /// Exclusive upper bound of the simulated matchmaking latency.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "matchmaking_max_ms")]
    pub matchmaking_max: Duration,
    /// How long the verdict stays on screen after an answer.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "answer_feedback_ms")]
    pub answer_feedback: Duration,
    /// How long the verdict stays on screen after a timeout.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "timeout_feedback_ms")]
    pub timeout_feedback: Duration,
    /// Lower bound between two opponent ticks.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "opponent_tick_min_ms")]
    pub opponent_tick_min: Duration,
    /// Exclusive upper bound between two opponent ticks.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "opponent_tick_max_ms")]
    pub opponent_tick_max: Duration,
    /// Period of the per-question countdown.
    #[serde_as(as = "DurationMilliSeconds<u64>")]
    #[serde(rename = "countdown_tick_ms")]
    pub countdown_tick: Duration,
}

impl Default for MatchTimings {
    fn default() -> Self {
        Self {
            matchmaking_min: Duration::from_millis(900),
            matchmaking_max: Duration::from_millis(1_800),
            answer_feedback: Duration::from_millis(900),
            timeout_feedback: Duration::from_millis(800),
            opponent_tick_min: Duration::from_millis(1_200),
            opponent_tick_max: Duration::from_millis(2_400),
            countdown_tick: Duration::from_secs(1),
        }
    }
}

impl MatchTimings {
    fn validate(&self) -> Result<(), ConfigError> {
        if self.matchmaking_min >= self.matchmaking_max {
            return Err(ConfigError::Timings("matchmaking range is empty"));
        }
        if self.opponent_tick_min >= self.opponent_tick_max {
            return Err(ConfigError::Timings("opponent tick range is empty"));
        }
        if self.opponent_tick_min.is_zero() {
            return Err(ConfigError::Timings("opponent tick must be positive"));
        }
        if self.countdown_tick.is_zero() {
            return Err(ConfigError::Timings("countdown tick must be positive"));
        }
        Ok(())
    }
}

/// Reasons a configuration file is rejected.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// File is not valid JSON for [`RawConfig`].
    #[error("invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    /// A level entry is unusable.
    #[error("invalid settings for level {level}: {source}")]
    Level {
        /// Offending level.
        level: Level,
        /// Why it was rejected.
        #[source]
        source: LevelSettingsError,
    },
    /// A question pool is unusable.
    #[error("invalid questions for level {level}: {reason}")]
    Questions {
        /// Offending level.
        level: Level,
        /// Why it was rejected.
        reason: String,
    },
    /// Timing ranges are inconsistent.
    #[error("invalid timings: {0}")]
    Timings(&'static str),
}

impl AppConfig {
    /// Load the application configuration from disk, falling back to the built-in defaults.
    pub fn load() -> Self {
        let path = resolve_config_path();
        match fs::read_to_string(&path) {
            Ok(contents) => match Self::from_json_str(&contents) {
                Ok(app_config) => {
                    info!(
                        path = %path.display(),
                        seeded = app_config.seed.is_some(),
                        "loaded match settings from config"
                    );
                    app_config
                }
                Err(err) => {
                    warn!(
                        path = %path.display(),
                        error = %err,
                        "failed to parse config; falling back to defaults"
                    );
                    Self::default()
                }
            },
            Err(err) if err.kind() == ErrorKind::NotFound => {
                info!(
                    path = %path.display(),
                    "config file not found; using built-in defaults"
                );
                Self::default()
            }
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "failed to read config; falling back to defaults"
                );
                Self::default()
            }
        }
    }

    /// Parse and validate a JSON configuration document.
    pub fn from_json_str(contents: &str) -> Result<Self, ConfigError> {
        let raw: RawConfig = serde_json::from_str(contents)?;
        raw.try_into()
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
/// JSON representation of the configuration file located at [`DEFAULT_CONFIG_PATH`].
struct RawConfig {
    levels: IndexMap<Level, LevelSettings>,
    timings: MatchTimings,
    questions: IndexMap<Level, Vec<Question>>,
    seed: Option<u64>,
}

impl TryFrom<RawConfig> for AppConfig {
    type Error = ConfigError;

    fn try_from(value: RawConfig) -> Result<Self, Self::Error> {
        for (level, settings) in &value.levels {
            settings.validate().map_err(|source| ConfigError::Level {
                level: *level,
                source,
            })?;
        }
        value.timings.validate()?;

        let questions = if value.questions.is_empty() {
            QuestionBank::default()
        } else {
            let mut pools = default_bank_pools();
            for (level, pool) in value.questions {
                validate_pool(level, &pool)?;
                pools.insert(level, pool);
            }
            QuestionBank::new(pools)
        };

        Ok(Self {
            levels: LevelTable::with_overrides(value.levels),
            timings: value.timings,
            questions,
            seed: value.seed,
        })
    }
}

fn default_bank_pools() -> IndexMap<Level, Vec<Question>> {
    let bank = QuestionBank::default();
    Level::ALL
        .into_iter()
        .map(|level| (level, bank.pool(level).to_vec()))
        .collect()
}

fn validate_pool(level: Level, pool: &[Question]) -> Result<(), ConfigError> {
    if pool.is_empty() {
        return Err(ConfigError::Questions {
            level,
            reason: "pool must contain at least one question".into(),
        });
    }

    for question in pool {
        if question.prompt.trim().is_empty() {
            return Err(ConfigError::Questions {
                level,
                reason: "question prompt must not be empty".into(),
            });
        }
        if question.correct_option >= OPTION_COUNT {
            return Err(ConfigError::Questions {
                level,
                reason: format!(
                    "`{}` points at option {} out of {OPTION_COUNT}",
                    question.prompt, question.correct_option
                ),
            });
        }
    }

    Ok(())
}

/// Resolve the configuration path taking the environment override into account.
fn resolve_config_path() -> PathBuf {
    env::var_os(CONFIG_PATH_ENV)
        .map(PathBuf::from)
        .filter(|path| !path.as_os_str().is_empty())
        .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_PATH))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_document_yields_defaults() {
        let config = AppConfig::from_json_str("{}").unwrap();
        assert_eq!(config.levels, LevelTable::default());
        assert_eq!(config.timings, MatchTimings::default());
        assert_eq!(config.questions.pool(Level::Easy).len(), 10);
        assert!(config.seed.is_none());
    }

    #[test]
    fn level_and_timing_overrides_are_applied() {
        let config = AppConfig::from_json_str(
            r#"{
                "levels": { "easy": { "countdown_seconds": 20, "opponent_tick_probability": 0.1 } },
                "timings": { "answer_feedback_ms": 500 },
                "seed": 42
            }"#,
        )
        .unwrap();

        assert_eq!(config.levels.get(Level::Easy).countdown_seconds, 20);
        assert_eq!(config.levels.get(Level::Hard).countdown_seconds, 9);
        assert_eq!(config.timings.answer_feedback, Duration::from_millis(500));
        assert_eq!(config.timings.timeout_feedback, Duration::from_millis(800));
        assert_eq!(config.seed, Some(42));
    }

    #[test]
    fn question_pool_override_replaces_one_level() {
        let config = AppConfig::from_json_str(
            r#"{
                "questions": {
                    "hard": [
                        { "prompt": "Rust's package manager?", "options": ["cargo", "npm", "pip", "gem"], "correct_option": 0 }
                    ]
                }
            }"#,
        )
        .unwrap();

        assert_eq!(config.questions.pool(Level::Hard).len(), 1);
        assert_eq!(config.questions.pool(Level::Easy).len(), 10);
    }

    #[test]
    fn invalid_probability_is_rejected() {
        let err = AppConfig::from_json_str(
            r#"{ "levels": { "hard": { "countdown_seconds": 9, "opponent_tick_probability": 2.0 } } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Level { level: Level::Hard, .. }));
    }

    #[test]
    fn out_of_range_answer_is_rejected() {
        let err = AppConfig::from_json_str(
            r#"{ "questions": { "easy": [ { "prompt": "?", "options": ["a", "b", "c", "d"], "correct_option": 4 } ] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Questions { level: Level::Easy, .. }));
    }

    #[test]
    fn wrong_option_count_fails_to_parse() {
        let err = AppConfig::from_json_str(
            r#"{ "questions": { "easy": [ { "prompt": "?", "options": ["a", "b"], "correct_option": 0 } ] } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
    }

    #[test]
    fn empty_timing_range_is_rejected() {
        let err = AppConfig::from_json_str(
            r#"{ "timings": { "matchmaking_min_ms": 2000, "matchmaking_max_ms": 1000 } }"#,
        )
        .unwrap_err();
        assert!(matches!(err, ConfigError::Timings(_)));
    }
}
