//! elfbot: a turn bot for the Elf Kingdom game.
//!
//! Exposes the world model, the game API traits, the per-turn strategy, the
//! host protocol, and a local simulator with a self-play runner for use by
//! integration tests and the binaries.

pub mod api;
pub mod config;
pub mod engine;
pub mod protocol;
pub mod selfplay;
pub mod sim;
pub mod strategy;
pub mod world;
