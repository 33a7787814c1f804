//! Mirage API server library.
//!
//! Exposes the building blocks (config, state, error handling, routes, the
//! job orchestrator) so integration tests and the binary entrypoint can
//! both access them.

pub mod bootstrap;
pub mod config;
pub mod error;
pub mod handlers;
pub mod orchestrator;
pub mod router;
pub mod routes;
pub mod state;
