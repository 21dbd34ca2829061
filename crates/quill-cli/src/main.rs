use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

mod commands;

const DEFAULT_LOG_FILTER: &str = "quill=info";

#[derive(Parser)]
#[command(name = "quill")]
#[command(about = "Quill - edit a Markdown/LaTeX manual through its rendered view with an LLM", long_about = None)]
struct Cli {
    /// Config file (defaults to ~/.config/quill/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Document to edit, overriding `document.path`
    #[arg(long, global = true)]
    document: Option<PathBuf>,

    /// Log filter, e.g. `quill=debug`. Takes precedence over RUST_LOG
    #[arg(long, global = true)]
    log_level: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the section outline of the document
    Outline,
    /// Map rendered selection text back to the raw source
    Resolve { selection: String },
    /// Show the section context for a rendered selection
    Context { selection: String },
    /// Replace text in the document
    Apply {
        #[arg(long)]
        old: String,
        #[arg(long)]
        new: String,
    },
    /// Interactive chat about the document
    Chat,
}

/// `--log-level` wins over `RUST_LOG`; anything unparseable falls back to the
/// default filter.
fn log_filter(log_level: Option<&str>) -> EnvFilter {
    match log_level {
        Some(level) => EnvFilter::try_new(level).ok(),
        None => EnvFilter::try_from_default_env().ok(),
    }
    .unwrap_or_else(|| EnvFilter::new(DEFAULT_LOG_FILTER))
}

fn init_logging(log_level: Option<&str>) {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(log_filter(log_level))
        .with_writer(std::io::stderr)
        .try_init();
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.log_level.as_deref());

    let ctx = commands::AppContext::load(cli.config.as_deref(), cli.document).await?;

    match cli.command {
        Commands::Outline => commands::outline::run(&ctx).await?,
        Commands::Resolve { selection } => commands::inspect::resolve(&ctx, &selection).await?,
        Commands::Context { selection } => commands::inspect::context(&ctx, &selection).await?,
        Commands::Apply { old, new } => commands::apply::run(&ctx, old, new).await?,
        Commands::Chat => commands::chat::run(&ctx).await?,
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn explicit_log_level_is_used() {
        assert_eq!(log_filter(Some("quill=debug")).to_string(), "quill=debug");
    }

    #[test]
    fn invalid_log_level_falls_back_to_default() {
        assert_eq!(log_filter(Some("quill=loud")).to_string(), DEFAULT_LOG_FILTER);
    }
}
