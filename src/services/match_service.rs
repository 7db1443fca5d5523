//! User intents forwarded by the presentation layer. Each intent locks the
//! arena, applies one named session transition, reschedules or cancels the
//! tasks scoped to the context it left, then broadcasts the new snapshot.

use tracing::info;

use crate::{
    dto::game::{LevelSummary, LevelsResponse, MatchSnapshot, QuestionView, ShareResponse},
    error::ServiceError,
    services::{match_runtime, sse_events},
    state::{
        SharedState,
        questions::Level,
        session::{MatchError, MatchSession},
    },
};

/// Current snapshot, without mutating anything.
pub async fn snapshot(state: &SharedState) -> MatchSnapshot {
    state
        .read_session(|session| MatchSnapshot::from(session))
        .await
}

/// Replace the player name typed on the home screen.
pub async fn set_name(state: &SharedState, name: String) -> Result<MatchSnapshot, ServiceError> {
    let mut arena = state.arena().await;
    arena.session.set_name(name)?;
    Ok(sse_events::broadcast_snapshot(state, &arena.session))
}

/// Give the player a random `Guest{n}` name.
pub async fn random_name(state: &SharedState) -> Result<MatchSnapshot, ServiceError> {
    let mut guard = state.arena().await;
    let arena = &mut *guard;
    arena.session.set_random_name(&mut arena.rng)?;
    Ok(sse_events::broadcast_snapshot(state, &arena.session))
}

/// Pick the difficulty for the next match.
pub async fn set_level(state: &SharedState, level: Level) -> Result<MatchSnapshot, ServiceError> {
    let settings = state.config().levels.get(level);
    let mut arena = state.arena().await;
    arena.session.set_level(level, settings)?;
    Ok(sse_events::broadcast_snapshot(state, &arena.session))
}

/// Home → Searching, then Playing once the simulated matchmaking completes.
pub async fn find_opponent(state: &SharedState) -> Result<MatchSnapshot, ServiceError> {
    let mut guard = state.arena().await;
    let arena = &mut *guard;

    let epoch = match arena.session.find_opponent() {
        Ok(epoch) => epoch,
        Err(err @ MatchError::EmptyPlayerName) => {
            sse_events::broadcast_notice(state, &err.to_string());
            return Err(err.into());
        }
        Err(err) => return Err(err.into()),
    };

    match_runtime::schedule_matchmaking(state, arena, epoch);
    Ok(sse_events::broadcast_snapshot(state, &arena.session))
}

/// Answer the current question. Repeated answers to the same question are ignored.
pub async fn select_option(
    state: &SharedState,
    index: usize,
) -> Result<MatchSnapshot, ServiceError> {
    let mut guard = state.arena().await;
    let arena = &mut *guard;

    if arena.session.select_option(index)?.is_some() {
        arena.tasks.countdown.cancel();
        let delay = state.config().timings.answer_feedback;
        match_runtime::schedule_advance(state, arena, delay);
    }

    Ok(sse_events::broadcast_snapshot(state, &arena.session))
}

/// Leave the running match and stop every task scoped to it.
pub async fn quit_match(state: &SharedState) -> Result<MatchSnapshot, ServiceError> {
    let mut guard = state.arena().await;
    let arena = &mut *guard;

    arena.session.quit()?;
    arena.tasks.cancel_all();
    Ok(sse_events::broadcast_snapshot(state, &arena.session))
}

/// Result → Home with a blank slate.
pub async fn play_again(state: &SharedState) -> Result<MatchSnapshot, ServiceError> {
    leave_result(state, MatchSession::play_again).await
}

/// Result → Home.
pub async fn go_home(state: &SharedState) -> Result<MatchSnapshot, ServiceError> {
    leave_result(state, MatchSession::go_home).await
}

async fn leave_result(
    state: &SharedState,
    transition: fn(&mut MatchSession) -> Result<(), MatchError>,
) -> Result<MatchSnapshot, ServiceError> {
    let mut guard = state.arena().await;
    let arena = &mut *guard;

    transition(&mut arena.session)?;
    arena.tasks.cancel_all();
    info!(level = %arena.session.level(), "back to the home screen");
    Ok(sse_events::broadcast_snapshot(state, &arena.session))
}

/// Share line for the current score and level.
pub async fn share(state: &SharedState) -> ShareResponse {
    let text = state.read_session(MatchSession::share_text).await;
    ShareResponse { text }
}

/// The question currently on screen.
pub async fn current_question(state: &SharedState) -> Result<QuestionView, ServiceError> {
    state
        .read_session(|session| MatchSnapshot::from(session).question)
        .await
        .ok_or_else(|| ServiceError::NotFound("no active question".into()))
}

/// Describe every level with its settings and pool size.
pub fn levels(state: &SharedState) -> LevelsResponse {
    let config = state.config();
    let levels = config
        .levels
        .iter()
        .map(|(level, settings)| {
            LevelSummary::new(level, settings, config.questions.pool(level).len())
        })
        .collect();
    LevelsResponse { levels }
}
