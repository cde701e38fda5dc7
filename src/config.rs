use crate::error::{AppError, Result};
use config::{Config as ConfigBuilder, ConfigError, Environment, File};
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::Path;

/// Unprefixed variable names accepted for backwards compatibility with
/// existing deployments.
const TOPIC_ARN_VAR: &str = "TOPIC_ARN";
const ACCOUNT_ID_VAR: &str = "ACCOUNT_ID";

const DEFAULT_CONFIG_FILE: &str = "config.yaml";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Config {
    #[serde(default)]
    pub aws: AwsConfig,
    #[serde(default)]
    pub notification: NotificationConfig,
    pub logging: LoggingConfig,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct AwsConfig {
    /// Falls back to the SDK provider chain when unset
    pub region: Option<String>,
    pub profile: Option<String>,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct NotificationConfig {
    pub topic_arn: Option<String>,
    /// Display only, embedded in the subject line
    pub account_id: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
        }
    }
}

/// Notification settings after validation; both values are guaranteed present.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NotificationSettings {
    pub topic_arn: String,
    pub account_id: String,
}

impl NotificationConfig {
    pub fn validate(&self) -> Result<NotificationSettings> {
        Ok(NotificationSettings {
            topic_arn: required(&self.topic_arn, "notification.topic_arn", TOPIC_ARN_VAR)?,
            account_id: required(&self.account_id, "notification.account_id", ACCOUNT_ID_VAR)?,
        })
    }
}

fn required(value: &Option<String>, key: &str, env_var: &str) -> Result<String> {
    match value.as_deref().map(str::trim) {
        Some(v) if !v.is_empty() => Ok(v.to_string()),
        _ => Err(AppError::Configuration(format!(
            "{key} is not set (set {env_var} or BILLING_{})",
            key.to_uppercase().replace('.', "__")
        ))),
    }
}

impl Config {
    /// Load from defaults, `config.yaml` if present, then the process environment.
    pub fn load() -> Result<Self> {
        Self::from_sources(None, None)
    }

    /// Like [`Config::load`], but the given file must exist.
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        Self::from_sources(Some(path.as_ref()), None)
    }

    /// Layered load. An explicit `path` must exist; without one the default
    /// file is used only if present. `env` replaces the process environment
    /// when given.
    pub fn from_sources(path: Option<&Path>, env: Option<HashMap<String, String>>) -> Result<Self> {
        let mut builder =
            ConfigBuilder::builder().add_source(ConfigBuilder::try_from(&Config::default())?);

        match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound(path.display().to_string()).into());
            }
            Some(path) => builder = builder.add_source(File::from(path)),
            None => {
                let default_file = Path::new(DEFAULT_CONFIG_FILE);
                if default_file.exists() {
                    builder = builder.add_source(File::from(default_file));
                }
            }
        }

        let lookup = |name: &str| match &env {
            Some(vars) => vars.get(name).cloned(),
            None => std::env::var(name).ok(),
        };
        let topic_arn = lookup(TOPIC_ARN_VAR);
        let account_id = lookup(ACCOUNT_ID_VAR);

        builder = builder
            .add_source(
                Environment::with_prefix("BILLING")
                    .prefix_separator("_")
                    .separator("__")
                    .source(env),
            )
            .set_override_option("notification.topic_arn", topic_arn)?
            .set_override_option("notification.account_id", account_id)?;

        Ok(builder.build()?.try_deserialize()?)
    }
}
