use crate::{dto::health::HealthResponse, state::SharedState};

/// Report the current stage, scheduled match tasks and attached SSE views.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let arena = state.arena().await;
    HealthResponse::ok(
        arena.session.stage().into(),
        arena.tasks.active_count(),
        state.match_sse().subscriber_count(),
    )
}

#[cfg(test)]
mod tests {
    use rand::{SeedableRng, rngs::StdRng};

    use super::*;
    use crate::{config::AppConfig, dto::stage::VisibleStage, state::AppState};

    #[tokio::test]
    async fn idle_server_reports_home_without_tasks() {
        let state = AppState::with_rng(AppConfig::default(), StdRng::seed_from_u64(0));
        let health = health_status(&state).await;
        assert_eq!(health.status, "ok");
        assert_eq!(health.stage, VisibleStage::Home);
        assert_eq!(health.active_tasks, 0);
        assert_eq!(health.sse_subscribers, 0);
    }
}
