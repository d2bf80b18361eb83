use anyhow::Result;
use clap::Parser;

use lapidary_cli::{
    cli::{Cli, Commands},
    commands, config,
};

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // Initialize logging
    let level = cli.log_level.as_str();
    let env_filter = format!(
        "lapidary_core={level},lapidary_store={level},lapidary_llm={level},\
         lapidary_pipeline={level},lapidary_cli={level}"
    );
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(env_filter))
        .init();

    // Load configuration (defaults < file < environment). Command-line
    // overrides are applied by the command itself.
    let config = config::LapidaryConfig::load(cli.config)?;

    match cli.command {
        Commands::Run {
            vault,
            max_notes,
            dry_run,
        } => commands::run::execute(config, vault, max_notes, dry_run).await?,

        Commands::Inspect { file } => commands::inspect::execute(config, file).await?,
    }

    Ok(())
}
