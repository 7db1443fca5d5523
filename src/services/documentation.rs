use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Game Quiz Arena.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::match_stream,
        crate::routes::game::get_match,
        crate::routes::game::set_name,
        crate::routes::game::random_name,
        crate::routes::game::set_level,
        crate::routes::game::find_opponent,
        crate::routes::game::select_option,
        crate::routes::game::quit_match,
        crate::routes::game::play_again,
        crate::routes::game::go_home,
        crate::routes::game::share,
        crate::routes::game::current_question,
        crate::routes::game::list_levels,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::stage::VisibleStage,
            crate::dto::game::SetNameRequest,
            crate::dto::game::SetLevelRequest,
            crate::dto::game::SelectOptionRequest,
            crate::dto::game::QuestionView,
            crate::dto::game::ResultSummary,
            crate::dto::game::MatchSnapshot,
            crate::dto::game::ShareResponse,
            crate::dto::game::LevelSummary,
            crate::dto::game::LevelsResponse,
            crate::dto::sse::NoticeEvent,
            crate::state::questions::Level,
            crate::state::session::Feedback,
            crate::state::outcome::Winner,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "sse", description = "Server-sent events streams"),
        (name = "match", description = "Player intents for the match session"),
    )
)]
pub struct ApiDoc;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn document_lists_match_routes() {
        let doc = ApiDoc::openapi();
        for path in ["/match", "/match/answer", "/match/find", "/levels", "/sse/match"] {
            assert!(doc.paths.paths.contains_key(path), "missing {path}");
        }
    }
}
