use serde::Serialize;
use tracing::warn;

use crate::{
    dto::{
        game::MatchSnapshot,
        sse::{NoticeEvent, ServerEvent},
    },
    state::{SharedState, session::MatchSession},
};

const EVENT_SNAPSHOT: &str = "snapshot";
const EVENT_NOTICE: &str = "notice";

/// Broadcast the full match snapshot and return it to the caller.
pub fn broadcast_snapshot(state: &SharedState, session: &MatchSession) -> MatchSnapshot {
    let snapshot = MatchSnapshot::from(session);
    send_match_event(state, EVENT_SNAPSHOT, &snapshot);
    snapshot
}

/// Broadcast a user-facing notice, e.g. a refused intent.
pub fn broadcast_notice(state: &SharedState, message: &str) {
    let payload = NoticeEvent {
        message: message.to_string(),
    };
    send_match_event(state, EVENT_NOTICE, &payload);
}

fn send_match_event(state: &SharedState, event: &str, payload: &impl Serialize) {
    match ServerEvent::json(Some(event.to_string()), payload) {
        Ok(event) => state.match_sse().broadcast(event),
        Err(err) => warn!(event, error = %err, "failed to serialize match SSE payload"),
    }
}
