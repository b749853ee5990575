use clap::{Parser, Subcommand};
use pkgmirror::{Mirror, MirrorConfig};
use std::path::PathBuf;
use std::process::ExitCode;
use tokio_util::sync::CancellationToken;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "pkgmirror", version, about = "Mirror package registry releases into git")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Clone or update the mirror of one package.
    Sync {
        /// Repository name, e.g. `npm/left-pad` or `python/requests`.
        repo_name: String,
        /// Bare repository to write to.
        #[arg(long)]
        bare_dir: PathBuf,
        /// JSON site configuration.
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    let cli = Cli::parse();
    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!("{err}");
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> pkgmirror::Result<()> {
    let Command::Sync {
        repo_name,
        bare_dir,
        config,
    } = cli.command;

    let config = match config {
        Some(path) => MirrorConfig::load(&path).await?,
        None => MirrorConfig::default(),
    };
    let mirror = Mirror::new(config)?;

    let cancel = CancellationToken::new();
    let on_signal = cancel.clone();
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            tracing::warn!("interrupted, aborting sync");
            on_signal.cancel();
        }
    });

    let action = mirror.sync(&repo_name, &bare_dir, cancel).await?;
    tracing::info!(repo = %repo_name, ?action, "sync finished");
    Ok(())
}
