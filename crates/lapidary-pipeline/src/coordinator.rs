//! Batch selection and aggregation over one inbox scan.

use std::sync::Arc;
use std::time::Instant;

use tracing::{debug, info, warn};

use lapidary_core::{FailureReason, FileStore, NoteRef, ProcessingResult, SkipReason, StoreError};

use crate::config::{PipelineConfig, RunConfig};
use crate::note_pipeline::{extension_allowed, NotePipeline};

/// Run-level faults that abort a batch before or instead of processing.
/// Per-note skips and failures never surface here.
#[derive(Debug, thiserror::Error)]
pub enum FatalError {
    #[error("cannot list inbox {inbox:?}: {source}")]
    Inbox {
        inbox: String,
        #[source]
        source: StoreError,
    },
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

/// What one run would attempt: the capped eligible candidates plus the tally
/// of notes dismissed by the name-level pre-check.
#[derive(Debug)]
pub struct RunPlan {
    /// Candidates in listing order, truncated to the per-run cap.
    pub eligible: Vec<NoteRef>,
    /// Notes dismissed before reading: already marked or wrong extension.
    pub pre_skipped: usize,
}

/// Aggregated outcome of one batch run.
#[derive(Debug, Default)]
pub struct RunSummary {
    pub processed: usize,
    pub skipped: usize,
    pub failed: usize,
    /// Failed notes with their reasons, in processing order.
    pub failures: Vec<(NoteRef, FailureReason)>,
}

/// List, pre-check, and cap the candidates one run would attempt. Reads no
/// note content and calls no provider, so it is safe for dry runs.
pub async fn plan_run(
    store: &dyn FileStore,
    pipeline_config: &PipelineConfig,
    run_config: &RunConfig,
) -> Result<RunPlan, FatalError> {
    if run_config.max_notes_per_run == 0 {
        return Err(FatalError::InvalidConfig(
            "max_notes_per_run must be at least 1".to_string(),
        ));
    }

    let listed = store
        .list(&run_config.inbox, run_config.recursive)
        .await
        .map_err(|source| FatalError::Inbox {
            inbox: run_config.inbox.clone(),
            source,
        })?;
    debug!(candidates = listed.len(), inbox = %run_config.inbox, "listed inbox");

    let mut eligible = Vec::new();
    let mut pre_skipped = 0usize;
    for reference in listed {
        match precheck(&reference, pipeline_config) {
            Some(reason) => {
                debug!(note = %reference, reason = %reason, "pre-check skip");
                pre_skipped += 1;
            }
            None => eligible.push(reference),
        }
    }

    // Listing order is the store's policy; candidates beyond the cap are
    // simply not attempted this run.
    eligible.truncate(run_config.max_notes_per_run);
    Ok(RunPlan {
        eligible,
        pre_skipped,
    })
}

/// Name-level subset of the Filter stage, applied before any file is read.
fn precheck(reference: &NoteRef, config: &PipelineConfig) -> Option<SkipReason> {
    if reference.is_marked() {
        return Some(SkipReason::AlreadyProcessed);
    }
    if !extension_allowed(reference, &config.allowed_extensions) {
        return Some(SkipReason::WrongExtension);
    }
    None
}

/// Drives the per-note pipeline over one inbox scan.
pub struct BatchCoordinator {
    store: Arc<dyn FileStore>,
    pipeline: NotePipeline,
    config: RunConfig,
}

impl BatchCoordinator {
    pub fn new(store: Arc<dyn FileStore>, pipeline: NotePipeline, config: RunConfig) -> Self {
        Self {
            store,
            pipeline,
            config,
        }
    }

    /// The selection prefix of [`run`](Self::run) without touching any note.
    pub async fn plan(&self) -> Result<RunPlan, FatalError> {
        plan_run(self.store.as_ref(), self.pipeline.config(), &self.config).await
    }

    /// Process one batch. Per-note outcomes are aggregated; the notes the
    /// pre-check dismissed count as skips.
    pub async fn run(&self) -> Result<RunSummary, FatalError> {
        let start = Instant::now();
        let plan = self.plan().await?;
        info!(
            eligible = plan.eligible.len(),
            pre_skipped = plan.pre_skipped,
            inbox = %self.config.inbox,
            "starting batch"
        );

        let mut summary = RunSummary {
            skipped: plan.pre_skipped,
            ..RunSummary::default()
        };
        for reference in plan.eligible {
            match self.pipeline.process(&reference).await {
                ProcessingResult::Processed { note } => {
                    debug!(note = %note, "processed");
                    summary.processed += 1;
                }
                ProcessingResult::Skipped(reason) => {
                    debug!(note = %reference, reason = %reason, "skipped");
                    summary.skipped += 1;
                }
                ProcessingResult::Failed(reason) => {
                    warn!(note = %reference, reason = %reason, "failed");
                    summary.failed += 1;
                    summary.failures.push((reference, reason));
                }
            }
        }

        info!(
            processed = summary.processed,
            skipped = summary.skipped,
            failed = summary.failed,
            elapsed_ms = start.elapsed().as_millis() as u64,
            "batch complete"
        );
        Ok(summary)
    }
}
