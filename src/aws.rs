use crate::config::AwsConfig;
use aws_config::BehaviorVersion;
use aws_sdk_costexplorer::Client as CostExplorerClient;
use aws_sdk_sns::Client as SnsClient;
use tracing::debug;

/// SDK clients sharing one resolved AWS configuration.
#[derive(Clone)]
pub struct AwsClients {
    pub cost_explorer: CostExplorerClient,
    pub sns: SnsClient,
}

impl AwsClients {
    pub async fn from_config(config: &AwsConfig) -> Self {
        let mut loader = aws_config::defaults(BehaviorVersion::latest());

        if let Some(region) = &config.region {
            loader = loader.region(aws_config::Region::new(region.clone()));
        }
        if let Some(profile) = &config.profile {
            loader = loader.profile_name(profile);
        }

        let sdk_config = loader.load().await;
        debug!("Loaded AWS configuration (region: {:?})", sdk_config.region());

        Self {
            cost_explorer: CostExplorerClient::new(&sdk_config),
            sns: SnsClient::new(&sdk_config),
        }
    }
}
