use anyhow::Result;
use clap::Parser;
use tracing_subscriber::EnvFilter;

mod commands;

use chatcorpus::cli::{Cli, Commands, ConfigCommands};

/// Environment variable holding a tracing filter that overrides `-v`.
const LOG_ENV: &str = "CHATCORPUS_LOG";

fn init_logging(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        _ => "debug",
    };
    let filter = EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(level));

    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .compact()
        .try_init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(cli.verbose);
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Build { input, output } => commands::build::handle(&input, &output, config_path),
        Commands::Parse { input, output } => {
            commands::parse::handle(&input, output.as_deref(), config_path)
        }
        Commands::Style { input, output } => {
            commands::style::handle(&input, output.as_deref(), config_path)
        }
        Commands::Config(cmd) => match cmd {
            ConfigCommands::Show => commands::config::handle_show(config_path),
            ConfigCommands::Init { force } => commands::config::handle_init(config_path, force),
            ConfigCommands::Path => commands::config::handle_path(config_path),
        },
        Commands::Completions { shell } => commands::completions::handle(shell),
    }
}
