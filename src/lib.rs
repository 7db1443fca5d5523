//! Library crate for quiz-arena-back, exposing modules for binaries and integration tests.

/// Runtime configuration loaded at startup.
pub mod config;
mod dto;
mod error;
/// HTTP routers.
pub mod routes;
/// Intents, background match tasks and SSE fan-out.
pub mod services;
/// Match session, stage machine and shared application state.
pub mod state;
