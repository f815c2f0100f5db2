use clap::Parser;
use fleetmux::cli::{self, Cli, Commands};
use fleetmux::config::Config;
use tracing::error;

#[tokio::main]
async fn main() {
    let _ = dotenvy::dotenv();

    let cli = Cli::parse();

    let config = match Config::load(&cli.config) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load config: {e}");
            std::process::exit(1);
        }
    };

    config.logging.init();

    let result = match &cli.command {
        Commands::Start(args) => cli::start::execute(&config, args).await,
        Commands::Stop => cli::stop::execute(&config).await,
        Commands::Console(args) => cli::console::execute(&config, args),
        Commands::Status => cli::status::execute(&config),
    };

    if let Err(e) = result {
        error!(error = %e, "Command failed");
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
