use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use color_eyre::eyre::eyre;
use commands::{config, daemon, request, search};
use media_request_models::Classification;
use std::path::PathBuf;

mod commands;
mod logging;
mod output;

#[derive(Parser)]
#[command(name = "pirrate")]
#[command(about = "Pirrate - request TV shows and movies for Sonarr and Radarr")]
#[command(version)]
struct Cli {
    /// Enable verbose output (use multiple times for more verbosity: -v, -vv)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output format
    #[arg(long, global = true, default_value = "human", value_enum)]
    output: output::OutputFormat,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum MediaKind {
    Tv,
    Movie,
}

impl From<MediaKind> for Classification {
    fn from(kind: MediaKind) -> Self {
        match kind {
            MediaKind::Tv => Classification::Tv,
            MediaKind::Movie => Classification::Movie,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Search for a title and submit a request, step by step
    #[command(long_about = "Interactive request flow: pick TV or movie, search by title, choose one or more of the matches and confirm. Confirmed requests are written to the request database, where the daemon picks them up.")]
    Request {
        /// Skip the first step and search this kind directly
        #[arg(long, value_enum)]
        kind: Option<MediaKind>,
    },

    /// Show the candidates a query resolves to, without submitting anything
    Search {
        /// Free-text title
        query: String,

        #[arg(long, value_enum)]
        kind: MediaKind,
    },

    /// Search, select and submit in one non-interactive step
    #[command(long_about = "Runs the same flow as `request` without prompts. --select takes the same input the interactive prompt does: one or more list numbers (\"1 3\") or an exact title.")]
    Submit {
        query: String,

        #[arg(long, value_enum)]
        kind: MediaKind,

        /// Numbers or exact title of the candidates to submit
        #[arg(long)]
        select: String,
    },

    /// Hand confirmed requests to Sonarr/Radarr every minute
    #[command(long_about = "Poll the request database and add every confirmed, not-yet-added request to Sonarr (TV) or Radarr (movies). Fulfilled requests are copied to the completed database and archived.")]
    Daemon {
        /// Run a single cycle, print its report and exit
        #[arg(long, action = ArgAction::SetTrue)]
        once: bool,

        /// Write logs to this file (rotated daily) instead of stderr
        #[arg(long, value_name = "PATH")]
        log_file: Option<PathBuf>,
    },

    /// Inspect or create configuration
    Config {
        #[command(subcommand)]
        cmd: ConfigCommands,
    },
}

#[derive(Subcommand)]
pub enum ConfigCommands {
    /// Show effective settings (secrets masked)
    Show {
        /// Show secrets in full
        #[arg(long, action = ArgAction::SetTrue)]
        full: bool,
    },

    /// Print the locations of the config, credentials and log files
    Path,

    /// Write a default config.toml if none exists
    Init,
}

#[tokio::main]
async fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let cli = Cli::parse();

    let log_file = match &cli.command {
        Commands::Daemon { log_file, .. } => log_file.clone(),
        _ => None,
    };
    logging::init_logging(cli.verbose, cli.quiet, log_file).map_err(|e| eyre!("{}", e))?;

    let output = output::Output::new(cli.output, cli.quiet);

    match cli.command {
        Commands::Request { kind } => request::run_request(kind.map(Classification::from), &output).await,
        Commands::Search { query, kind } => search::run_search(&query, kind.into(), &output).await,
        Commands::Submit { query, kind, select } => search::run_submit(&query, kind.into(), &select, &output).await,
        Commands::Daemon { once, .. } => daemon::run_daemon(once, &output).await,
        Commands::Config { cmd } => config::run_config(cmd, &output),
    }
}
