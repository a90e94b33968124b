use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::info;
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use repoherald::github::GITHUB_API_BASE;
use repoherald::telegram::TELEGRAM_API_BASE;
use repoherald::{Config, GitHubClient, Poller, PublishedStore, TelegramPublisher};

#[derive(Parser)]
#[command(name = "repoherald")]
#[command(about = "Announces newly created GitHub repositories to a Telegram channel")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Verbose logging
    #[arg(short, long)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run the polling loop until interrupted (default)
    Run,

    /// Run a single reconciliation pass and exit
    Once,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose)?;

    // .env is optional; real environment variables take precedence
    let _ = dotenvy::dotenv();
    let config = Config::from_env()?;

    info!("Starting repoherald v{}", env!("CARGO_PKG_VERSION"));

    let mut poller = build_poller(&config)?;

    match cli.command {
        None | Some(Commands::Run) => poller.run().await,
        Some(Commands::Once) => {
            let summary = poller.run_once().await?;
            info!(
                "Done: {} published, {} already published, {} without description, {} failed",
                summary.published,
                summary.already_published,
                summary.skipped_no_description,
                summary.failed
            );
            Ok(())
        }
    }
}

/// Initialize logging based on verbosity level
fn init_logging(verbose: bool) -> Result<()> {
    let filter = if verbose {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"))
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"))
    };

    tracing_subscriber::registry()
        .with(fmt::layer())
        .with(filter)
        .init();

    Ok(())
}

/// Wire the poller up from configuration
fn build_poller(config: &Config) -> Result<Poller> {
    let github = GitHubClient::new(GITHUB_API_BASE, &config.github_username)?;
    let telegram = TelegramPublisher::new(TELEGRAM_API_BASE, &config.telegram_token)?;
    let store = PublishedStore::open_at(&config.database_file)?;

    Ok(Poller::new(
        &config.telegram_channel_id,
        config.check_interval,
        github,
        telegram,
        store,
    ))
}
