use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use pawpost::config::Config;

mod commands;

#[derive(Parser)]
#[command(
    name = "pawpost",
    version,
    about = "Turn the newest pet news entry into an illustrated blog post and mail it",
    long_about = None
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// TOML configuration file
    #[arg(short, long, global = true, env = "PAWPOST_CONFIG")]
    config: Option<PathBuf>,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Log format (text, json); overrides the config file
    #[arg(long, global = true)]
    log_format: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Process the newest feed entry once
    Run {
        /// Compose the post and print it instead of mailing it
        #[arg(long, default_value = "false")]
        dry_run: bool,
    },

    /// Show which affiliate link an article would get
    Resolve {
        /// Article title
        #[arg(short, long)]
        title: String,

        /// Article summary or body
        #[arg(short, long, default_value = "")]
        content: String,
    },

    /// Print the model prompt for an article
    Prompt {
        /// Article title
        #[arg(short, long)]
        title: String,

        /// Article summary
        #[arg(short, long, default_value = "")]
        summary: String,
    },

    /// Parse a saved model response (stdin when no file is given)
    Parse {
        /// File holding the raw response
        input: Option<PathBuf>,

        /// Summary used if the response is unusable
        #[arg(long, default_value = "")]
        summary: String,

        /// Link used if the response is unusable
        #[arg(long)]
        link: Option<String>,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let config = Config::load(cli.config.as_deref())?;

    let log_format = cli.log_format.as_deref().unwrap_or(&config.logging.format);
    setup_tracing(log_format, &config.logging.level, cli.verbose)?;

    match cli.command {
        Commands::Run { dry_run } => {
            tracing::info!(dry_run = %dry_run, feed = %config.feed.url, "Starting run");
            commands::run(&config, dry_run).await?;
        }

        Commands::Resolve { title, content } => {
            commands::resolve(&config, &title, &content)?;
        }

        Commands::Prompt { title, summary } => {
            commands::prompt(&config, &title, &summary)?;
        }

        Commands::Parse {
            input,
            summary,
            link,
        } => {
            commands::parse(&config, input.as_deref(), &summary, link.as_deref()).await?;
        }
    }

    Ok(())
}

/// `-v` wins, then `RUST_LOG`, then the configured level
fn log_filter(level: &str, verbose: bool) -> Result<EnvFilter> {
    if verbose {
        return Ok(EnvFilter::new("pawpost=debug,info"));
    }

    match EnvFilter::try_from_default_env() {
        Ok(filter) => Ok(filter),
        Err(_) => Ok(EnvFilter::try_new(format!("pawpost={level},warn"))?),
    }
}

fn setup_tracing(format: &str, level: &str, verbose: bool) -> Result<()> {
    let env_filter = log_filter(level, verbose)?;

    match format {
        "json" => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().json())
                .init();
        }
        _ => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(tracing_subscriber::fmt::layer().with_target(false))
                .init();
        }
    }

    Ok(())
}
