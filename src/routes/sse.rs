use std::convert::Infallible;

use axum::{Router, extract::State, response::sse::Sse, routing::get};
use futures::Stream;
use tracing::info;

use crate::{
    services::{sse_events, sse_service},
    state::SharedState,
};

#[utoipa::path(
    get,
    path = "/sse/match",
    tag = "sse",
    responses((status = 200, description = "Match snapshot stream", content_type = "text/event-stream", body = String))
)]
/// Stream match snapshots to connected views, starting with the current one.
pub async fn match_stream(
    State(state): State<SharedState>,
) -> Sse<impl Stream<Item = Result<axum::response::sse::Event, Infallible>>> {
    let receiver = sse_service::subscribe_match(&state);
    info!("New match SSE connection");
    sse_service::broadcast_info(state.match_sse(), "match stream connected");
    {
        let arena = state.arena().await;
        sse_events::broadcast_snapshot(&state, &arena.session);
    }
    sse_service::to_sse_stream(receiver)
}

/// Configure the SSE endpoints.
pub fn router() -> Router<SharedState> {
    Router::<SharedState>::new().route("/sse/match", get(match_stream))
}
