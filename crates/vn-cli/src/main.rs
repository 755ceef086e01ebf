//! CLI frontend for the visual novel engine.

mod commands;
mod terminal;

use std::path::PathBuf;
use std::process;

use clap::{ArgAction, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "vn",
    about = "Play and inspect branching visual novel stories",
    version,
    propagate_version = true
)]
struct Cli {
    /// More log output on stderr (-v info, -vv debug, -vvv trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    verbose: u8,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a story in the terminal
    Play {
        /// Twine story file (Twison JSON)
        story: PathBuf,

        /// Asset manifest with backgrounds and animations
        #[arg(short, long)]
        assets: Option<PathBuf>,

        /// Directory the endings ledger is saved in
        #[arg(short, long, default_value = ".")]
        save_dir: PathBuf,

        /// Read one command per line and wait for each to finish before the next
        #[arg(long)]
        script: bool,
    },

    /// Validate a story and report endings and unreachable passages
    Check {
        /// Twine story file (Twison JSON)
        story: PathBuf,

        /// Asset manifest to validate alongside the story
        #[arg(short, long)]
        assets: Option<PathBuf>,
    },

    /// Show which endings have been reached
    Endings {
        /// Twine story file (Twison JSON)
        story: PathBuf,

        /// Directory the endings ledger is saved in
        #[arg(short, long, default_value = ".")]
        save_dir: PathBuf,
    },
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            story,
            assets,
            save_dir,
            script,
        } => commands::play::run(&story, assets.as_deref(), &save_dir, script),
        Commands::Check { story, assets } => commands::check::run(&story, assets.as_deref()),
        Commands::Endings { story, save_dir } => commands::endings::run(&story, &save_dir),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}

/// `RUST_LOG` wins over `-v`. Logs go to stderr so they never mix with play output.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}
