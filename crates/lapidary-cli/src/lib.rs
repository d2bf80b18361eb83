//! # Lapidary CLI
//!
//! The `lap` binary: clap definitions, TOML configuration loading, and the
//! wiring that turns a configuration into a store, a model client, and a
//! pipeline run.

pub mod cli;
pub mod commands;
pub mod config;
