//! Match core: session, stage machine, question bank and the tasks driving them.

/// Per-level countdown and opponent strength.
pub mod levels;
/// Result-screen figures.
pub mod outcome;
/// Levels, questions and sampling.
pub mod questions;
/// The match session and its transitions.
pub mod session;
mod sse;
/// Stage machine.
pub mod state_machine;
/// Owned background task handles.
pub mod tasks;

use std::sync::Arc;

use rand::{SeedableRng, rngs::StdRng};
use tokio::sync::{Mutex, MutexGuard};

use crate::config::AppConfig;

pub use self::sse::SseHub;
use self::{session::MatchSession, tasks::MatchTasks};

/// Handle shared by every route, service and background task.
pub type SharedState = Arc<AppState>;

/// Capacity of the snapshot broadcast channel.
const SSE_CAPACITY: usize = 64;

/// Everything the single writer mutates together: the session, its tasks and the RNG.
pub struct MatchArena {
    /// The one match session.
    pub session: MatchSession,
    /// Timer and ticker handles scoped to the session.
    pub tasks: MatchTasks,
    /// Injected randomness for sampling, names, delays and opponent ticks.
    pub rng: StdRng,
}

/// Central application state: configuration, the match arena and the SSE hub.
pub struct AppState {
    config: AppConfig,
    arena: Mutex<MatchArena>,
    sse: SseHub,
}

impl AppState {
    /// Construct a new [`AppState`] wrapped in an [`Arc`] so it can be cloned cheaply.
    ///
    /// The RNG is seeded from `config.seed` when present, from the OS otherwise.
    pub fn new(config: AppConfig) -> SharedState {
        let rng = match config.seed {
            Some(seed) => StdRng::seed_from_u64(seed),
            None => StdRng::from_os_rng(),
        };
        Self::with_rng(config, rng)
    }

    /// Construct the state around an explicit RNG.
    pub fn with_rng(config: AppConfig, rng: StdRng) -> SharedState {
        let level = Default::default();
        let session = MatchSession::new(level, config.levels.get(level));
        Arc::new(Self {
            arena: Mutex::new(MatchArena {
                session,
                tasks: MatchTasks::default(),
                rng,
            }),
            config,
            sse: SseHub::new(SSE_CAPACITY),
        })
    }

    /// Immutable runtime configuration.
    pub fn config(&self) -> &AppConfig {
        &self.config
    }

    /// Lock the arena. All session mutation and task scheduling happens under this guard.
    pub async fn arena(&self) -> MutexGuard<'_, MatchArena> {
        self.arena.lock().await
    }

    /// Read the session through a closure without exposing the guard.
    pub async fn read_session<F, R>(&self, f: F) -> R
    where
        F: FnOnce(&MatchSession) -> R,
    {
        let guard = self.arena.lock().await;
        f(&guard.session)
    }

    /// Broadcast hub used for the match SSE stream.
    pub fn match_sse(&self) -> &SseHub {
        &self.sse
    }
}
