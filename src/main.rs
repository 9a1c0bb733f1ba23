use clap::Parser;
use nse_relay::cli::{print_config, Cli, Commands};
use nse_relay::config::Config;
use std::process::ExitCode;

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    let cli = Cli::parse();

    // Load configuration
    let config = Config::load(&cli.config).unwrap_or_else(|e| {
        eprintln!("Warning: Could not load config from {}: {}", cli.config, e);
        eprintln!("Using default configuration");
        Config::default()
    });

    // Initialize telemetry
    nse_relay::telemetry::init_telemetry(&config.telemetry)?;

    let config = config.with_process_env()?;

    let served = match cli.command {
        Commands::Scan(args) => {
            tracing::info!("Scanning index snapshot");
            args.execute(&config).await?
        }
        Commands::Watch(args) => args.execute(&config).await?,
        Commands::Check(args) => args.execute(&config)?,
        Commands::Config => {
            print_config(&config);
            true
        }
    };

    Ok(if served {
        ExitCode::SUCCESS
    } else {
        ExitCode::FAILURE
    })
}
