//! Background tasks driving a match: matchmaking latency, the per-question
//! countdown, the post-answer feedback delay and the opponent simulation.
//!
//! Tasks are spawned through the plain `spawn_*` functions and stored in the
//! arena's [`MatchTasks`](crate::state::tasks::MatchTasks) slots while the
//! arena lock is held. Each task re-acquires the lock before touching the
//! session and hands its scheduling epoch (or match id) back to the session,
//! which rejects it if the context moved on in the meantime.

use std::time::Duration;

use rand::Rng;
use tokio::{
    task::JoinHandle,
    time::{Instant, MissedTickBehavior, interval_at, sleep},
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use crate::{
    services::sse_events,
    state::{
        MatchArena, SharedState,
        session::{Advance, CountdownTick},
    },
};

/// Schedule the Searching → Playing transition after a random matchmaking delay.
pub fn schedule_matchmaking(state: &SharedState, arena: &mut MatchArena, epoch: u64) {
    let timings = state.config().timings;
    let delay = arena
        .rng
        .random_range(timings.matchmaking_min..timings.matchmaking_max);
    debug!(?delay, epoch, "matchmaking scheduled");
    arena
        .tasks
        .deferred
        .replace(spawn_matchmaking(state.clone(), epoch, delay));
}

/// Schedule the move past the current (resolved) question once `delay` elapsed.
pub fn schedule_advance(state: &SharedState, arena: &mut MatchArena, delay: Duration) {
    let epoch = arena.session.epoch();
    arena
        .tasks
        .deferred
        .replace(spawn_advance(state.clone(), epoch, delay));
}

/// (Re)start the countdown for the current question, replacing any previous one.
pub fn start_countdown(state: &SharedState, arena: &mut MatchArena) {
    let epoch = arena.session.epoch();
    let period = state.config().timings.countdown_tick;
    arena
        .tasks
        .countdown
        .replace(spawn_countdown(state.clone(), epoch, period));
}

/// Start the opponent simulation for `match_id`, replacing any previous one.
///
/// The tick period is drawn once here and kept for the whole match.
pub fn start_opponent(state: &SharedState, arena: &mut MatchArena, match_id: Uuid) {
    let timings = state.config().timings;
    let period = arena
        .rng
        .random_range(timings.opponent_tick_min..timings.opponent_tick_max);
    debug!(?period, %match_id, "opponent simulation scheduled");
    arena
        .tasks
        .opponent
        .replace(spawn_opponent(state.clone(), match_id, period));
}

fn spawn_matchmaking(state: SharedState, epoch: u64, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(delay).await;
        complete_matchmaking(&state, epoch).await;
    })
}

fn spawn_advance(state: SharedState, epoch: u64, delay: Duration) -> JoinHandle<()> {
    tokio::spawn(async move {
        sleep(delay).await;
        advance_after_feedback(&state, epoch).await;
    })
}

fn spawn_countdown(state: SharedState, epoch: u64, period: Duration) -> JoinHandle<()> {
    tokio::spawn(run_countdown(state, epoch, period))
}

fn spawn_opponent(state: SharedState, match_id: Uuid, period: Duration) -> JoinHandle<()> {
    tokio::spawn(run_opponent(state, match_id, period))
}

async fn complete_matchmaking(state: &SharedState, epoch: u64) {
    let mut guard = state.arena().await;
    let arena = &mut *guard;

    let started = arena
        .session
        .begin_match(epoch, &state.config().questions, &mut arena.rng);
    match started {
        Ok(Some(match_id)) => {
            start_countdown(state, arena);
            start_opponent(state, arena, match_id);
            sse_events::broadcast_snapshot(state, &arena.session);
        }
        Ok(None) => {}
        Err(err) => warn!(error = %err, "failed to start match after matchmaking"),
    }
}

async fn advance_after_feedback(state: &SharedState, epoch: u64) {
    let mut guard = state.arena().await;
    let arena = &mut *guard;

    match arena.session.advance(epoch) {
        Ok(Advance::NextQuestion) => {
            start_countdown(state, arena);
            sse_events::broadcast_snapshot(state, &arena.session);
        }
        Ok(Advance::Finished) => {
            arena.tasks.countdown.cancel();
            arena.tasks.opponent.cancel();
            sse_events::broadcast_snapshot(state, &arena.session);
        }
        Ok(Advance::Stale) => {}
        Err(err) => warn!(error = %err, "failed to advance to the next question"),
    }
}

async fn run_countdown(state: SharedState, epoch: u64, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let mut guard = state.arena().await;
        let arena = &mut *guard;
        match arena.session.tick_countdown(epoch) {
            CountdownTick::Ticked(remaining) => {
                debug!(remaining, "countdown tick");
                sse_events::broadcast_snapshot(&state, &arena.session);
            }
            CountdownTick::Expired => {
                info!(
                    question = arena.session.current_index(),
                    "countdown expired"
                );
                let delay = state.config().timings.timeout_feedback;
                schedule_advance(&state, arena, delay);
                sse_events::broadcast_snapshot(&state, &arena.session);
                break;
            }
            CountdownTick::Stale => {
                debug!(epoch, "stopping stale countdown");
                break;
            }
        }
    }
}

async fn run_opponent(state: SharedState, match_id: Uuid, period: Duration) {
    let mut ticker = interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    loop {
        ticker.tick().await;

        let mut guard = state.arena().await;
        let arena = &mut *guard;
        match arena.session.opponent_tick(match_id, &mut arena.rng) {
            Some(true) => {
                debug!(score = arena.session.opponent_score(), "opponent scored");
                sse_events::broadcast_snapshot(&state, &arena.session);
            }
            Some(false) => {}
            None => {
                debug!(%match_id, "stopping opponent simulation");
                break;
            }
        }
    }
}
