use clap::{Parser, Subcommand};
use retrace::commands;
use retrace::config::ConfigLoader;
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "retrace", version, about = "Replayable element selectors from UI captures")]
struct Args {
    #[command(subcommand)]
    command: Command,

    /// Config file (defaults to ./retrace.yaml, then ~/.retrace/config.yaml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,
}

#[derive(Subcommand)]
enum Command {
    /// Synthesize a selector for each target node
    Resolve {
        #[arg(long)]
        capture: PathBuf,
        /// Second capture of the same screen, compared before resolving
        #[arg(long)]
        recapture: Option<PathBuf>,
        /// Snapshot-local node id, repeatable
        #[arg(long = "target", required = true)]
        targets: Vec<u32>,
        /// JSON list of spatial hints, best first
        #[arg(long)]
        hints: Option<PathBuf>,
    },
    /// List every verified candidate for one target
    Candidates {
        #[arg(long)]
        capture: PathBuf,
        #[arg(long)]
        target: u32,
        #[arg(long)]
        hints: Option<PathBuf>,
    },
    /// Locate a persisted selector in a capture
    Replay {
        #[arg(long)]
        capture: PathBuf,
        #[arg(long)]
        selector: PathBuf,
    },
    /// Exit non-zero when two captures differ structurally
    Check {
        #[arg(long)]
        capture: PathBuf,
        #[arg(long)]
        recapture: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Logs go to stderr, stdout carries JSON lines
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let args = Args::parse();
    let config = ConfigLoader::load(args.config.as_deref()).await?.resolver;

    match args.command {
        Command::Resolve {
            capture,
            recapture,
            targets,
            hints,
        } => {
            let capture = commands::load_capture(&capture).await?;
            if let Some(path) = recapture {
                let second = commands::load_capture(&path).await?;
                commands::ensure_consistent(&capture, &second)?;
            }
            let hints = match hints {
                Some(path) => Some(commands::load_hints(&path).await?),
                None => None,
            };
            let results =
                commands::resolve_targets(Arc::new(capture), &targets, hints, config).await?;
            for value in results {
                println!("{}", value);
            }
        }
        Command::Candidates {
            capture,
            target,
            hints,
        } => {
            let capture = commands::load_capture(&capture).await?;
            let hints = match hints {
                Some(path) => Some(commands::load_hints(&path).await?),
                None => None,
            };
            for value in commands::list_candidates(&capture, target, hints, &config)? {
                println!("{}", value);
            }
        }
        Command::Replay { capture, selector } => {
            let capture = commands::load_capture(&capture).await?;
            let selector = commands::load_selector(&selector).await?;
            println!("{}", commands::replay_selector(&capture, &selector));
        }
        Command::Check { capture, recapture } => {
            let first = commands::load_capture(&capture).await?;
            let second = commands::load_capture(&recapture).await?;
            commands::ensure_consistent(&first, &second)?;
            println!("{}", serde_json::json!({ "consistent": true }));
        }
    }

    Ok(())
}
