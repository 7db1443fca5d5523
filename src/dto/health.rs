use serde::Serialize;
use utoipa::ToSchema;

use super::stage::VisibleStage;

/// Simple health response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status, always "ok" once the server answers.
    pub status: String,
    /// Stage the match session is currently in.
    pub stage: VisibleStage,
    /// Number of background match tasks still scheduled.
    pub active_tasks: usize,
    /// Views currently attached to `/sse/match`.
    pub sse_subscribers: usize,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(stage: VisibleStage, active_tasks: usize, sse_subscribers: usize) -> Self {
        Self {
            status: "ok".to_string(),
            stage,
            active_tasks,
            sse_subscribers,
        }
    }
}
