use serde::Serialize;
use utoipa::ToSchema;

use crate::state::state_machine::Stage;

/// Publicly visible match stage exposed to clients (REST/SSE).
#[derive(Debug, Serialize, ToSchema, Clone, Copy, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum VisibleStage {
    /// Name and level selection.
    Home,
    /// Matchmaking in progress.
    Searching,
    /// Questions are being answered.
    Playing,
    /// Final scores.
    Result,
}

impl From<Stage> for VisibleStage {
    fn from(value: Stage) -> Self {
        match value {
            Stage::Home => VisibleStage::Home,
            Stage::Searching => VisibleStage::Searching,
            Stage::Playing => VisibleStage::Playing,
            Stage::Result => VisibleStage::Result,
        }
    }
}
