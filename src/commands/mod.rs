use crate::aws::AwsClients;
use crate::billing::{AwsCostExplorer, DateRange};
use crate::handler::{InvocationContext, build_notification, handle};
use crate::notifier::{DryRunNotifier, Notifier, SnsNotifier};
use crate::{Config, Result};
use chrono::{NaiveDate, Utc};
use clap::Subcommand;
use serde_json::Value;

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Commands {
    /// Fetch billing data and publish the notification (default)
    Run {
        #[arg(long, help = "Log the notification instead of publishing it")]
        dry_run: bool,

        #[arg(long, help = "Treat this date (YYYY-MM-DD) as today")]
        date: Option<NaiveDate>,
    },
    /// Fetch billing data and print the notification without publishing
    Preview {
        #[arg(long, help = "Treat this date (YYYY-MM-DD) as today")]
        date: Option<NaiveDate>,
    },
    /// Print the reporting window for a date without contacting AWS
    Range {
        #[arg(long, help = "Treat this date (YYYY-MM-DD) as today")]
        date: Option<NaiveDate>,
    },
}

impl Default for Commands {
    fn default() -> Self {
        Commands::Run {
            dry_run: false,
            date: None,
        }
    }
}

pub async fn handle_command(command: Commands, config: &Config) -> Result<()> {
    match command {
        Commands::Run { dry_run, date } => {
            // Fail on missing settings before the SDK is touched
            config.notification.validate()?;

            let clients = AwsClients::from_config(&config.aws).await;
            let explorer = AwsCostExplorer::new(clients.cost_explorer);
            let notifier: Box<dyn Notifier> = if dry_run {
                Box::new(DryRunNotifier)
            } else {
                Box::new(SnsNotifier::new(clients.sns))
            };

            let context = InvocationContext::new(today_or(date));
            handle(
                &Value::Null,
                &context,
                config,
                &explorer,
                notifier.as_ref(),
            )
            .await?;
        }

        Commands::Preview { date } => {
            let settings = config.notification.validate()?;
            let clients = AwsClients::from_config(&config.aws).await;
            let explorer = AwsCostExplorer::new(clients.cost_explorer);

            let notification = build_notification(today_or(date), &settings, &explorer).await?;
            println!("{}", notification.subject);
            println!();
            println!("{}", notification.body);
        }

        Commands::Range { date } => {
            let today = today_or(date);
            let range = DateRange::resolve(today);
            println!("Today:           {today}");
            println!(
                "Query window:    {} to {} (end exclusive)",
                range.api_start(),
                range.api_end()
            );
            println!("Reported period: {range}");
        }
    }

    Ok(())
}

fn today_or(date: Option<NaiveDate>) -> NaiveDate {
    date.unwrap_or_else(|| Utc::now().date_naive())
}
