use aws_billing_notifier::Config;
use aws_billing_notifier::commands::{Commands, handle_command};
use clap::Parser;
use tracing::{error, info};

#[derive(Parser)]
#[command(name = "aws-billing-notifier")]
#[command(about = "Publish a daily AWS billing summary to an SNS topic")]
struct Cli {
    #[arg(short, long, help = "Path to configuration file")]
    config: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[tokio::main]
async fn main() {
    let cli = Cli::parse();

    let loaded = match &cli.config {
        Some(path) => Config::load_from_file(path),
        None => Config::load(),
    };
    let config = match loaded {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::new(&config.logging.level))
        .init();

    let command = cli.command.unwrap_or_default();
    info!("Starting aws-billing-notifier ({:?})", command);

    if let Err(e) = handle_command(command, &config).await {
        error!("Billing notification failed: {}", e);
        std::process::exit(1);
    }
}
