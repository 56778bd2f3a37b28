use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "kora", version, about = "Orbital Kora CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Star shards, focus minutes and stability
    Progress {
        #[command(subcommand)]
        action: commands::progress::ProgressAction,
    },
    /// Journey map nodes
    Journey {
        #[command(subcommand)]
        action: commands::journey::JourneyAction,
    },
    /// Cycle day tracking
    Cycle {
        #[command(subcommand)]
        action: commands::cycle::CycleAction,
    },
    /// Daily quest checklist
    Quest {
        #[command(subcommand)]
        action: commands::quest::QuestAction,
    },
    /// Journal entries
    Journal {
        #[command(subcommand)]
        action: commands::journal::JournalAction,
    },
    /// Accessibility and display settings
    Settings {
        #[command(subcommand)]
        action: commands::settings::SettingsAction,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("KORA_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Progress { action } => commands::progress::run(action),
        Commands::Journey { action } => commands::journey::run(action),
        Commands::Cycle { action } => commands::cycle::run(action),
        Commands::Quest { action } => commands::quest::run(action),
        Commands::Journal { action } => commands::journal::run(action),
        Commands::Settings { action } => commands::settings::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
