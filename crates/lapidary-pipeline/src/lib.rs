//! # Lapidary Pipeline
//!
//! Orchestration for note enhancement. Two layers:
//!
//! - [`NotePipeline`] runs one note through the per-note state machine:
//!   Read → Filter → Size check → Mark → Enhance → Validate → Persist.
//!   Every outcome is a [`ProcessingResult`]; a single note can never abort
//!   a run.
//! - [`BatchCoordinator`] lists the inbox, applies the cheap name-level
//!   pre-check and the per-run cap, drives the pipeline over each candidate,
//!   and aggregates a [`RunSummary`]. Only run-level faults (inbox
//!   unlistable, unusable config) surface as [`FatalError`].
//!
//! The decision points are exported as pure functions ([`filter_verdict`],
//! [`size_verdict`], [`build_metadata`], [`plan_run`]) so callers can show
//! what a run *would* do without touching anything.
//!
//! [`ProcessingResult`]: lapidary_core::ProcessingResult

mod config;
mod coordinator;
mod note_pipeline;

pub use config::{PipelineConfig, RunConfig};
pub use coordinator::{plan_run, BatchCoordinator, FatalError, RunPlan, RunSummary};
pub use note_pipeline::{build_metadata, filter_verdict, size_verdict, NotePipeline};
