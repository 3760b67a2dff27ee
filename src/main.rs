use clap::{CommandFactory, FromArgMatches, Parser, Subcommand};
use perfscore::config::Config;
use perfscore::scorer::{Engine, HandCapability};
use std::path::PathBuf;
use std::process;
use tracing::{error, info, Level};

mod cmd;
mod reports;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// JSON scoring profile; explicit flags still override it.
    #[arg(global = true, short, long)]
    profile: Option<PathBuf>,

    /// Deployments without a hand landmark detector report hand analysis as unavailable.
    #[arg(global = true, long, default_value_t = false)]
    no_hand_detector: bool,

    #[arg(global = true, long, default_value_t = false)]
    debug: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score a full measurement bundle (audio + hand frames).
    Analyze(cmd::analyze::AnalyzeArgs),
    /// Score audio measurements only, from CSV files.
    Audio(cmd::audio::AudioArgs),
}

fn main() {
    let matches = Cli::command().get_matches();
    let cli = Cli::from_arg_matches(&matches).unwrap_or_else(|e| e.exit());

    tracing_subscriber::fmt()
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .with_writer(std::io::stderr)
        .init();

    info!("🚀 Initializing perfscore engine...");

    let (cli_config, sub_matches) = match &cli.command {
        Commands::Analyze(args) => (&args.config, matches.subcommand_matches("analyze")),
        Commands::Audio(args) => (&args.config, matches.subcommand_matches("audio")),
    };

    let config = match (&cli.profile, sub_matches) {
        (Some(path), Some(sub)) => {
            info!("⚖️  Loading profile from: {}", path.display());
            let mut file_config = Config::load_from_file(path).unwrap_or_else(|e| {
                error!("{}", e);
                process::exit(1);
            });
            file_config.merge_from_cli(cli_config, sub);
            file_config
        }
        _ => cli_config.clone(),
    };

    let capability = if cli.no_hand_detector {
        HandCapability::Unavailable
    } else {
        HandCapability::Available
    };

    let engine = match Engine::new(config) {
        Ok(e) => e.with_hand_capability(capability),
        Err(e) => {
            error!("❌ FATAL ERROR INITIALIZING ENGINE: {}", e);
            process::exit(1);
        }
    };

    let result = match cli.command {
        Commands::Analyze(args) => cmd::analyze::run(args, &engine),
        Commands::Audio(args) => cmd::audio::run(args, &engine),
    };

    if let Err(e) = result {
        error!("❌ {}", e);
        process::exit(1);
    }
}
