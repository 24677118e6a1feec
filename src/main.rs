use anyhow::Result;
use clap::{Parser, Subcommand};
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

use daybook::cli;
use daybook::config::DaybookConfig;

#[derive(Parser)]
#[command(name = "daybook", version, about = "Personal journal server with AI reflection feedback")]
struct Cli {
    /// Config file (default: ~/.daybook/config.toml)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Start the journal HTTP API
    Serve {
        /// Override the configured port
        #[arg(long)]
        port: Option<u16>,
    },
    /// Print every stored entry as JSON
    Export,
    /// Append an entry to the journal file (server must not be running)
    Add {
        /// Entry date, yyyy-mm-dd (default: today)
        #[arg(long)]
        date: Option<String>,
        /// Comma-separated to-do items
        #[arg(long, default_value = "")]
        todo: String,
        /// Comma-separated wins of the day
        #[arg(long, default_value = "")]
        wins: String,
        /// Comma-separated emotions
        #[arg(long, default_value = "")]
        emotions: String,
        /// Free-form reflection
        #[arg(long, default_value = "")]
        reflection: String,
    },
    /// Print the feedback prompt for an entry without calling the provider
    Prompt {
        /// Entry id (yyyy-mm-dd)
        id: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = match &cli.config {
        Some(path) => DaybookConfig::load_from(path)?,
        None => DaybookConfig::load()?,
    };

    // Log to stderr so `export` output stays clean on stdout.
    let filter = EnvFilter::try_new(&config.server.log_level)
        .unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    match cli.command {
        Command::Serve { port } => {
            if let Some(port) = port {
                config.server.port = port;
            }
            daybook::server::serve(config).await?;
        }
        Command::Export => cli::export::export(&config)?,
        Command::Add {
            date,
            todo,
            wins,
            emotions,
            reflection,
        } => {
            let new = cli::add::NewEntry {
                date,
                todo,
                wins,
                emotions,
                reflection,
            };
            cli::add::add(&config, new)?;
        }
        Command::Prompt { id } => cli::prompt::prompt(&config, &id)?,
    }

    Ok(())
}
