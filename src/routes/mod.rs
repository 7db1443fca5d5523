//! Route trees mounted by the binary.

use axum::Router;

use crate::state::SharedState;

/// Swagger UI.
pub mod docs;
/// Match intents and level listing.
pub mod game;
/// Health check.
pub mod health;
/// Match snapshot stream.
pub mod sse;

/// Compose all route trees, wiring in shared state and documentation routes.
pub fn router(state: SharedState) -> Router<()> {
    health::router()
        .merge(sse::router())
        .merge(game::router())
        .merge(docs::router())
        .with_state(state)
}
