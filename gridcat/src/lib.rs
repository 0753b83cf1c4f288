// ABOUTME: Library exports for the gridcat CLI modules for testing and external use
// ABOUTME: Terminal adapters, config and protocol selection live here; the engine is gridcat-core

pub mod cli;
pub mod cli_output;
pub mod config;
pub mod constants;
pub mod image_protocols;
pub mod terminal;
