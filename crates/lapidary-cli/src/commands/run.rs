//! `lap run` — one batch pass over the inbox.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Instant;

use anyhow::{Context, Result};
use tracing::info;

use lapidary_llm::create_model_client;
use lapidary_pipeline::{plan_run, BatchCoordinator, NotePipeline};
use lapidary_store::LocalFileStore;

use crate::config::LapidaryConfig;

/// Execute one run: plan, process, report.
///
/// With `--dry-run` only the plan is printed — no rename, no write, no
/// provider call, and no credentials required. Per-note failures in a real
/// run are reported in the summary but do not fail the command.
pub async fn execute(
    mut config: LapidaryConfig,
    vault: Option<PathBuf>,
    max_notes: Option<usize>,
    dry_run: bool,
) -> Result<()> {
    if let Some(path) = vault {
        config.vault.path = Some(path);
    }
    if let Some(cap) = max_notes {
        config.processing.max_notes_per_run = cap;
    }
    config.validate()?;

    let vault_root = config.vault_root()?;
    let store = Arc::new(
        LocalFileStore::new(vault_root, config.list_options())
            .with_context(|| format!("cannot open vault {}", vault_root.display()))?,
    );
    let pipeline_config = config.pipeline_config();
    let run_config = config.run_config();

    if dry_run {
        let plan = plan_run(store.as_ref(), &pipeline_config, &run_config).await?;
        println!(
            "dry run: {} note(s) would be processed ({} skipped at listing time)",
            plan.eligible.len(),
            plan.pre_skipped
        );
        for note in &plan.eligible {
            println!("  {note}");
        }
        return Ok(());
    }

    let model = create_model_client(&config.model).context("cannot build model client")?;
    info!(
        provider = model.provider_name(),
        inbox = %run_config.inbox,
        "starting run"
    );

    let pipeline = NotePipeline::new(store.clone(), model, pipeline_config);
    let coordinator = BatchCoordinator::new(store, pipeline, run_config);

    let started = Instant::now();
    let summary = coordinator.run().await?;

    println!(
        "processed {}, skipped {}, failed {} in {:.1}s",
        summary.processed,
        summary.skipped,
        summary.failed,
        started.elapsed().as_secs_f64()
    );
    for (note, reason) in &summary.failures {
        println!("  failed {note}: {reason}");
    }

    Ok(())
}
