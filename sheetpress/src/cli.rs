///
/// This module implements the CLI interface for sheetpress: command parsing, wiring of the
/// Sheets client, blog pages, output file and poller, and user-visible invocations.
///
/// All core logic (encoding, record mapping, polling, change detection) lives in the
/// [`sheetpress-core`] crate. This module is strictly CLI glue.
///
/// ## How To Use
/// - For command-line users: use the installed `sheetpress` binary with `--help`.
/// - For programmatic/integration use: call [`run`] with a constructed [`Cli`].
///
/// [`sheetpress-core`]: ../../sheetpress_core/
/// [`Cli`]: struct.Cli.html
/// [`run`]: fn.run.html
use crate::load_config::{load_config, CliConfig};
use crate::sheets::SheetsClient;
use anyhow::Result;
use clap::{Parser, Subcommand};
use sheetpress_core::blog::Blog;
use sheetpress_core::poller::{Poller, TickOutcome};
use sheetpress_core::sheet::SheetDb;
use sheetpress_core::sink::JsonFileSink;
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// CLI for sheetpress: publish spreadsheet-backed blog data as JSON.
#[derive(Parser)]
#[clap(
    name = "sheetpress",
    version,
    about = "Poll a Google Sheets blog and write its content to a JSON file whenever it changes"
)]
pub struct Cli {
    #[clap(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Poll the spreadsheet until interrupted, rewriting the output file on every change
    Watch {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
    /// Poll the spreadsheet once and write the output file
    Once {
        /// Path to the YAML config file
        #[clap(long)]
        config: PathBuf,
    },
}

/// Extracted async CLI logic entrypoint for integration tests and main()
pub async fn run(cli: Cli) -> Result<()> {
    // Emit a top-level 'trace_initialised' event at the very start
    tracing::info!("trace_initialised");

    let result = match cli.command {
        Commands::Watch { config } => watch(&config).await,
        Commands::Once { config } => once(&config).await,
    };

    let exit_span = tracing::info_span!("exit");
    exit_span.in_scope(|| {
        tracing::info!(ok = result.is_ok(), "exit");
    });

    result
}

/// Wires the Sheets client, blog pages and output file into a poller.
pub fn build_poller(config: &CliConfig) -> Result<Poller> {
    let client = SheetsClient::new_from_env(&config.sheet.spreadsheet_id, &config.sheet.api_key_env)
        .map_err(|e| anyhow::anyhow!("Failed to construct Sheets client: {e}"))?
        .with_base_url(config.sheet.base_url.clone());
    let blog = Blog::new(Arc::new(SheetDb::new(client)), config.core.blog.clone());
    let sink = JsonFileSink::new(config.core.output.path.clone())
        .with_indent(config.core.output.indent);

    tracing::info!(output = %sink.path().display(), "Set blog data path");
    Ok(Poller::new(
        blog.pages(),
        Arc::new(sink),
        config.core.poll.interval(),
    ))
}

async fn watch(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let poller = build_poller(&config)?;
    tracing::info!(command = "watch", "Starting to poll spreadsheet");

    // Poll immediately rather than waiting a full interval for the first write.
    log_outcome(&poller.tick().await);
    poller.start()?;

    tokio::signal::ctrl_c().await?;
    tracing::info!(command = "watch", "Interrupted, stopping poller");
    poller.stop();
    Ok(())
}

async fn once(config_path: &Path) -> Result<()> {
    let config = load_config(config_path)?;
    let poller = build_poller(&config)?;
    let page_count = poller.page_ids().count();
    match poller.tick().await {
        TickOutcome::Completed(report) if report.failed.len() == page_count => {
            tracing::error!(command = "once", failed = ?report.failed, "No page could be fetched");
            Err(anyhow::anyhow!(
                "No page could be fetched (failed: {})",
                report.failed.join(", ")
            ))
        }
        TickOutcome::Completed(report) if report.is_changed() && !report.published => {
            Err(anyhow::anyhow!(
                "Failed to write {}",
                config.core.output.path.display()
            ))
        }
        outcome => {
            log_outcome(&outcome);
            Ok(())
        }
    }
}

fn log_outcome(outcome: &TickOutcome) {
    match outcome {
        TickOutcome::Completed(report) => tracing::info!(
            changed = ?report.changed,
            failed = ?report.failed,
            published = report.published,
            "Poll complete"
        ),
        TickOutcome::Skipped => tracing::info!("Poll skipped, previous poll still running"),
    }
}
