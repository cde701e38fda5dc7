use aws_billing_notifier::{
    Config,
    billing::{DateRange, Granularity, ResultByTime, ServiceCost, mock::MockCostExplorer},
};
use chrono::{Days, NaiveDate};
use rust_decimal::Decimal;

pub const TOPIC_ARN: &str = "arn:aws:sns:us-east-1:123456789012:billing-alerts";
pub const ACCOUNT_ID: &str = "123456789012";

/// Config with both notification settings filled in
pub fn test_config() -> Config {
    let mut config = Config::default();
    config.notification.topic_arn = Some(TOPIC_ARN.to_string());
    config.notification.account_id = Some(ACCOUNT_ID.to_string());
    config
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Builds a scripted Cost Explorer whose buckets line up with the window
/// resolved for `today`.
pub struct BillingFixture {
    range: DateRange,
    monthly_total: Decimal,
    monthly_by_service: Vec<ServiceCost>,
    daily_totals: Vec<Decimal>,
    daily_by_service: Vec<ServiceCost>,
}

impl BillingFixture {
    pub fn new(today: NaiveDate) -> Self {
        Self {
            range: DateRange::resolve(today),
            monthly_total: Decimal::ZERO,
            monthly_by_service: Vec::new(),
            daily_totals: Vec::new(),
            daily_by_service: Vec::new(),
        }
    }

    pub fn monthly_total(mut self, amount: Decimal) -> Self {
        self.monthly_total = amount;
        self
    }

    pub fn monthly_service(mut self, name: &str, amount: Decimal) -> Self {
        self.monthly_by_service.push(ServiceCost::new(name, amount));
        self
    }

    /// One amount per day, oldest first, ending with yesterday
    pub fn daily_totals(mut self, amounts: &[Decimal]) -> Self {
        self.daily_totals = amounts.to_vec();
        self
    }

    pub fn daily_service(mut self, name: &str, amount: Decimal) -> Self {
        self.daily_by_service.push(ServiceCost::new(name, amount));
        self
    }

    pub fn build(self) -> MockCostExplorer {
        let count = self.daily_totals.len() as u64;
        let first_day = self.range.end - Days::new(count.max(1));
        let day = |offset: u64| {
            let start = first_day + Days::new(offset);
            DateRange::new(start, start + Days::new(1))
        };

        let daily: Vec<ResultByTime> = self
            .daily_totals
            .iter()
            .enumerate()
            .map(|(i, amount)| ResultByTime::with_total(day(i as u64), *amount))
            .collect();

        let mut daily_grouped: Vec<ResultByTime> = (0..count.saturating_sub(1))
            .map(|i| ResultByTime::with_groups(day(i), Vec::new()))
            .collect();
        daily_grouped.push(ResultByTime::with_groups(
            day(count.saturating_sub(1)),
            self.daily_by_service,
        ));

        MockCostExplorer::new()
            .with_response(
                Granularity::Monthly,
                false,
                vec![ResultByTime::with_total(self.range, self.monthly_total)],
            )
            .with_response(
                Granularity::Monthly,
                true,
                vec![ResultByTime::with_groups(self.range, self.monthly_by_service)],
            )
            .with_response(Granularity::Daily, false, daily)
            .with_response(Granularity::Daily, true, daily_grouped)
    }
}
