//! quizroom CLI: play challenge banks and quizzes from the terminal.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod presenter;

#[derive(Parser)]
#[command(name = "quizroom", version, about = "Room-by-room quiz challenge runner")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a multi-page challenge interactively
    Play {
        /// Challenge bank: a directory of challenge_page<N>.json files or a single JSON file
        #[arg(long)]
        bank: Option<PathBuf>,

        /// Send results to the configured endpoint on completion
        #[arg(long)]
        report: bool,

        /// Print the results payload instead of sending it
        #[arg(long, conflicts_with = "report")]
        dry_run: bool,

        /// Directory to save the completion record in
        #[arg(long)]
        output: Option<PathBuf>,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Play a single-level quiz followed by the preference form
    Quiz {
        /// Quiz question file (JSON)
        #[arg(long)]
        questions: Option<PathBuf>,

        /// Send answers and preferences to the configured endpoint
        #[arg(long)]
        report: bool,

        /// Print the results payload instead of sending it
        #[arg(long, conflicts_with = "report")]
        dry_run: bool,

        /// Config file path
        #[arg(long)]
        config: Option<PathBuf>,
    },

    /// Feed a scripted event sequence to a challenge and print the final render as JSON
    Replay {
        /// Challenge bank path
        #[arg(long)]
        bank: PathBuf,

        /// Comma-separated events, e.g. "start,begin,select:Chlorine,next,continue"
        #[arg(long)]
        events: String,
    },

    /// Validate challenge bank files
    Validate {
        /// Challenge bank path
        #[arg(long)]
        bank: PathBuf,
    },

    /// Create a starter config and example challenge bank
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("quizroom=info".parse().unwrap())
                .add_directive("quizroom_core=info".parse().unwrap())
                .add_directive("quizroom_reporter=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Play {
            bank,
            report,
            dry_run,
            output,
            config,
        } => commands::play::execute(bank, report, dry_run, output, config).await,
        Commands::Quiz {
            questions,
            report,
            dry_run,
            config,
        } => commands::quiz::execute(questions, report, dry_run, config).await,
        Commands::Replay { bank, events } => commands::replay::execute(bank, events),
        Commands::Validate { bank } => commands::validate::execute(bank),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
