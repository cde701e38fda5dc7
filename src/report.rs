//! Renders a billing snapshot into a notification subject and body.

use crate::billing::{BillingSnapshot, DISPLAY_DATE_FORMAT, ServiceCost};
use rust_decimal::Decimal;

pub const BREAKDOWN_HEADING: &str = "[Breakdown]";
pub const YESTERDAY_BREAKDOWN_HEADING: &str = "[Yesterday's breakdown]";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notification {
    pub subject: String,
    pub body: String,
}

/// Build the notification for `account_id` from a snapshot.
///
/// Amounts are rounded to cents for display only. The day-over-day
/// difference is taken between the already rounded amounts.
pub fn format_notification(account_id: &str, snapshot: &BillingSnapshot) -> Notification {
    let total = round_usd(snapshot.monthly_total.amount);
    let yesterday = round_usd(snapshot.daily_total.amount);
    let day_before = round_usd(snapshot.daily_total.previous_amount);
    let difference = round_usd(yesterday - day_before);

    let subject = format!(
        "Account ({account_id}) billing through yesterday: {} USD (yesterday: {} USD)",
        usd(total),
        usd(yesterday)
    );

    let period = snapshot.monthly_total.period;
    let mut lines = vec![
        format!("Yesterday's charges: {} USD", usd(yesterday)),
        format!("Charges the day before: {} USD", usd(day_before)),
        format!("Difference from the day before: {} USD", usd(difference)),
        format!(
            "Charges for {} - {}: {} USD",
            period.start.format(DISPLAY_DATE_FORMAT),
            period.display_end().format(DISPLAY_DATE_FORMAT),
            usd(total)
        ),
        BREAKDOWN_HEADING.to_string(),
    ];
    lines.extend(service_lines(&snapshot.monthly_by_service));
    lines.push(YESTERDAY_BREAKDOWN_HEADING.to_string());
    lines.extend(service_lines(&snapshot.daily_by_service));

    Notification {
        subject,
        body: lines.join("\n"),
    }
}

/// Services whose charge rounds to zero are left out.
fn service_lines(services: &[ServiceCost]) -> impl Iterator<Item = String> + '_ {
    services.iter().filter_map(|service| {
        let amount = round_usd(service.amount);
        (!amount.is_zero()).then(|| format!("- {}: ${}", service.service_name, usd(amount)))
    })
}

/// Round to cents. Negative zero is normalised so it never renders as `-0.00`.
pub fn round_usd(amount: Decimal) -> Decimal {
    let rounded = amount.round_dp(2);
    if rounded.is_zero() {
        Decimal::ZERO
    } else {
        rounded
    }
}

fn usd(amount: Decimal) -> String {
    format!("{amount:.2}")
}
