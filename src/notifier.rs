use crate::error::{AppError, Result};
use crate::report::Notification;
use async_trait::async_trait;
use aws_sdk_sns::Client as SnsClient;
use aws_sdk_sns::error::DisplayErrorContext;
use std::sync::Mutex;
use tracing::info;

/// Delivery confirmation returned by a notifier
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PublishReceipt {
    pub topic_arn: String,
    /// `None` when nothing was actually sent
    pub message_id: Option<String>,
}

/// Publishes a notification to a pub/sub topic.
#[async_trait]
pub trait Notifier: Send + Sync {
    async fn publish(&self, topic_arn: &str, notification: &Notification)
    -> Result<PublishReceipt>;
}

#[derive(Clone)]
pub struct SnsNotifier {
    client: SnsClient,
}

impl SnsNotifier {
    pub fn new(client: SnsClient) -> Self {
        Self { client }
    }
}

#[async_trait]
impl Notifier for SnsNotifier {
    async fn publish(
        &self,
        topic_arn: &str,
        notification: &Notification,
    ) -> Result<PublishReceipt> {
        let output = self
            .client
            .publish()
            .topic_arn(topic_arn)
            .subject(&notification.subject)
            .message(&notification.body)
            .send()
            .await
            .map_err(|e| AppError::Delivery(DisplayErrorContext(&e).to_string()))?;

        Ok(PublishReceipt {
            topic_arn: topic_arn.to_string(),
            message_id: output.message_id().map(str::to_string),
        })
    }
}

/// Logs the notification instead of publishing it.
#[derive(Debug, Default, Clone)]
pub struct DryRunNotifier;

#[async_trait]
impl Notifier for DryRunNotifier {
    async fn publish(
        &self,
        topic_arn: &str,
        notification: &Notification,
    ) -> Result<PublishReceipt> {
        info!("DRY RUN: would publish to {}", topic_arn);
        info!("Subject: {}", notification.subject);
        for line in notification.body.lines() {
            info!("  {}", line);
        }

        Ok(PublishReceipt {
            topic_arn: topic_arn.to_string(),
            message_id: None,
        })
    }
}

/// Captures published notifications for tests.
#[derive(Default)]
pub struct RecordingNotifier {
    published: Mutex<Vec<(String, Notification)>>,
    failure: Option<String>,
}

impl RecordingNotifier {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fail every publish with a `Delivery` error carrying `message`
    pub fn failing(message: impl Into<String>) -> Self {
        Self {
            published: Mutex::new(Vec::new()),
            failure: Some(message.into()),
        }
    }

    pub fn published(&self) -> Vec<(String, Notification)> {
        self.published
            .lock()
            .map(|published| published.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl Notifier for RecordingNotifier {
    async fn publish(
        &self,
        topic_arn: &str,
        notification: &Notification,
    ) -> Result<PublishReceipt> {
        if let Some(message) = &self.failure {
            return Err(AppError::Delivery(message.clone()));
        }

        let mut published = self
            .published
            .lock()
            .map_err(|e| AppError::Delivery(e.to_string()))?;
        published.push((topic_arn.to_string(), notification.clone()));

        Ok(PublishReceipt {
            topic_arn: topic_arn.to_string(),
            message_id: Some(format!("recorded-{}", published.len())),
        })
    }
}
