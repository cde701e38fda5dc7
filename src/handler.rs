//! Single-invocation entry point: resolve the window, fetch, format, publish.

use crate::billing::{BillingFetcher, CostExplorer, DateRange};
use crate::config::{Config, NotificationSettings};
use crate::error::Result;
use crate::notifier::{Notifier, PublishReceipt};
use crate::report::{Notification, format_notification};
use chrono::NaiveDate;
use serde_json::Value;
use tracing::{debug, info};

/// Per-invocation context supplied by whatever triggered the run.
#[derive(Debug, Clone)]
pub struct InvocationContext {
    pub request_id: Option<String>,
    /// The invocation date; the reporting window is derived from it
    pub today: NaiveDate,
}

impl InvocationContext {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            request_id: None,
            today,
        }
    }

    pub fn with_request_id(mut self, request_id: impl Into<String>) -> Self {
        self.request_id = Some(request_id.into());
        self
    }
}

/// Handle one trigger. The event payload is not used.
///
/// Configuration is validated before any query is issued, and nothing is
/// published unless every query succeeded.
pub async fn handle(
    event: &Value,
    context: &InvocationContext,
    config: &Config,
    explorer: &dyn CostExplorer,
    notifier: &dyn Notifier,
) -> Result<PublishReceipt> {
    let settings = config.notification.validate()?;
    info!(
        "Billing notification invoked (request id: {})",
        context.request_id.as_deref().unwrap_or("-")
    );
    debug!("Trigger event: {}", event);

    let notification = build_notification(context.today, &settings, explorer).await?;

    let receipt = notifier.publish(&settings.topic_arn, &notification).await?;
    info!(
        "Published billing notification to {} (message id: {})",
        receipt.topic_arn,
        receipt.message_id.as_deref().unwrap_or("-")
    );

    Ok(receipt)
}

/// Fetch billing data for the window ending at `today` and render it.
pub async fn build_notification(
    today: NaiveDate,
    settings: &NotificationSettings,
    explorer: &dyn CostExplorer,
) -> Result<Notification> {
    let range = DateRange::resolve(today);
    info!("Fetching billing data for {}", range);

    let snapshot = BillingFetcher::new(explorer, range).fetch_snapshot().await?;
    info!(
        "Fetched billing data: {} service(s) month to date, {} yesterday",
        snapshot.monthly_by_service.len(),
        snapshot.daily_by_service.len()
    );

    Ok(format_notification(&settings.account_id, &snapshot))
}
