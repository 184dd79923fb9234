use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "petlog-cli", version, about = "Petlog CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Record a care event
    Record(commands::record::RecordArgs),
    /// Period statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Leaderboard ranking
    Rank(commands::rank::RankArgs),
    /// Streak and achievement badges
    Streak(commands::streak::StreakArgs),
    /// Evaluate reminder rules
    Remind {
        #[command(subcommand)]
        action: commands::remind::RemindAction,
    },
    /// Engine configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn main() {
    // RUST_LOG overrides the level; default warn keeps JSON output on
    // stdout clean. The handle must outlive main for buffered writes.
    let _logger = flexi_logger::Logger::try_with_env_or_str("warn")
        .and_then(|logger| logger.log_to_stderr().start())
        .ok();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Record(args) => commands::record::run(args),
        Commands::Stats { action } => commands::stats::run(action),
        Commands::Rank(args) => commands::rank::run(args),
        Commands::Streak(args) => commands::streak::run(args),
        Commands::Remind { action } => commands::remind::run(action),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
