//! Domain types shared across the Mirage backend.
//!
//! This crate is I/O-free: engine identifiers, script building, id
//! generation, and the domain error taxonomy live here so the db, engine,
//! and api crates can share them without depending on each other.

pub mod engine;
pub mod error;
pub mod ids;
pub mod script;
