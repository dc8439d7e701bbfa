use anyhow::Result;
use clap::Parser;
use sheetpress::cli::{run, Cli};

#[tokio::main]
async fn main() -> Result<()> {
    // The only place `.env` is read; SheetsClient::new_from_env sees the result.
    let dotenv_path = dotenvy::dotenv().ok();

    tracing_subscriber::fmt::init();
    tracing::info!(
        dotenv = ?dotenv_path,
        version = env!("CARGO_PKG_VERSION"),
        "sheetpress starting"
    );

    let result = run(Cli::parse()).await;
    if let Err(e) = &result {
        tracing::error!(error = %e, "sheetpress exited with error");
    }
    result
}
