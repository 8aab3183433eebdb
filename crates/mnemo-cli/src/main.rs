//! The mnemo command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;
mod config;

#[derive(Parser)]
#[command(
    name = "mnemo",
    version,
    about = "Spaced-repetition scheduler and learning-path planner"
)]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Evaluate as of this RFC 3339 instant instead of the system clock
    #[arg(long, global = true)]
    now: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record one answer for a review item and print the updated item
    Review {
        /// Learner snapshot (.toml or .json)
        #[arg(long)]
        snapshot: PathBuf,

        /// Review item id
        #[arg(long)]
        item: u64,

        /// Recall quality, 0 (blackout) to 5 (perfect)
        #[arg(long)]
        quality: u8,

        /// Count the answer as incorrect regardless of quality
        #[arg(long)]
        incorrect: bool,
    },

    /// Show the items the next review session would present
    Queue {
        /// Learner snapshot (.toml or .json)
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Plan a learning path over the snapshot's concepts
    Plan {
        /// Learner snapshot (.toml or .json)
        #[arg(long)]
        snapshot: PathBuf,

        /// Target understanding level
        #[arg(long, default_value = "apply")]
        depth: String,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Show the next concept to study
    Next {
        /// Learner snapshot (.toml or .json)
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Suggest pace and path adjustments from recent performance
    Adapt {
        /// Learner snapshot (.toml or .json)
        #[arg(long)]
        snapshot: PathBuf,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Rank concepts worth reviewing
    Suggest {
        /// Learner snapshot (.toml or .json)
        #[arg(long)]
        snapshot: PathBuf,

        /// Maximum suggestions (default from config)
        #[arg(long)]
        max: Option<usize>,
    },

    /// List weak foundations and concepts needing applied practice
    Gaps {
        /// Learner snapshot (.toml or .json)
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Validate snapshot files
    Validate {
        /// Path to snapshot file or directory
        #[arg(long)]
        snapshot: PathBuf,
    },

    /// Create starter config and example snapshot
    Init,
}

fn main() {
    let mut filter = tracing_subscriber::EnvFilter::from_default_env();
    if let Ok(directive) = "mnemo=info".parse::<tracing_subscriber::filter::Directive>() {
        filter = filter.add_directive(directive);
    }
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let context = || commands::Context::load(cli.config.as_deref(), cli.now.as_deref());

    let result = match cli.command {
        Commands::Review {
            snapshot,
            item,
            quality,
            incorrect,
        } => context()
            .and_then(|ctx| commands::review::execute(&ctx, snapshot, item, quality, incorrect)),
        Commands::Queue { snapshot } => {
            context().and_then(|ctx| commands::queue::execute(&ctx, snapshot))
        }
        Commands::Plan {
            snapshot,
            depth,
            format,
        } => context().and_then(|ctx| commands::plan::execute(&ctx, snapshot, depth, format)),
        Commands::Next { snapshot } => {
            context().and_then(|ctx| commands::next::execute(&ctx, snapshot))
        }
        Commands::Adapt { snapshot, format } => {
            context().and_then(|ctx| commands::adapt::execute(&ctx, snapshot, format))
        }
        Commands::Suggest { snapshot, max } => {
            context().and_then(|ctx| commands::suggest::execute(&ctx, snapshot, max))
        }
        Commands::Gaps { snapshot } => {
            context().and_then(|ctx| commands::gaps::execute(&ctx, snapshot))
        }
        Commands::Validate { snapshot } => commands::validate::execute(snapshot),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
