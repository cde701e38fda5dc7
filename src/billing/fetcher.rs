use super::{
    CostExplorer, CostQuery, DateRange, Granularity, PeriodTotal, ResultByTime, ServiceCost,
};
use rust_decimal::Decimal;
use crate::error::{AppError, Result};
use tracing::debug;

/// Everything a billing notification is built from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct BillingSnapshot {
    pub monthly_total: PeriodTotal,
    pub monthly_by_service: Vec<ServiceCost>,
    pub daily_total: DailyTotal,
    pub daily_by_service: Vec<ServiceCost>,
}

/// Most recent complete day together with the day before it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailyTotal {
    pub period: DateRange,
    pub amount: Decimal,
    pub previous_amount: Decimal,
}

/// Issues the four read-only billing queries for one reporting window.
pub struct BillingFetcher<'a> {
    explorer: &'a dyn CostExplorer,
    range: DateRange,
}

impl<'a> BillingFetcher<'a> {
    pub fn new(explorer: &'a dyn CostExplorer, range: DateRange) -> Self {
        Self { explorer, range }
    }

    /// Run all queries concurrently. Any failure aborts the snapshot.
    pub async fn fetch_snapshot(&self) -> Result<BillingSnapshot> {
        let (monthly_total, monthly_by_service, daily_total, daily_by_service) = tokio::try_join!(
            self.total_to_date(),
            self.total_to_date_by_service(),
            self.daily_total(),
            self.daily_by_service(),
        )?;

        Ok(BillingSnapshot {
            monthly_total,
            monthly_by_service,
            daily_total,
            daily_by_service,
        })
    }

    pub async fn total_to_date(&self) -> Result<PeriodTotal> {
        let buckets = self.query(Granularity::Monthly, false).await?;
        let first = first_bucket(&buckets, "month-to-date total")?;

        Ok(PeriodTotal {
            period: first.period,
            amount: first.total_amount()?,
        })
    }

    pub async fn total_to_date_by_service(&self) -> Result<Vec<ServiceCost>> {
        let buckets = self.query(Granularity::Monthly, true).await?;
        let first = first_bucket(&buckets, "month-to-date by service")?;
        Ok(first.groups.clone())
    }

    /// The last daily bucket is the most recent complete day; the one before
    /// it supplies `previous_amount`.
    pub async fn daily_total(&self) -> Result<DailyTotal> {
        let buckets = self.query(Granularity::Daily, false).await?;
        let len = buckets.len();
        if len < 2 {
            return Err(AppError::InsufficientData {
                query: "daily total",
                buckets: len,
                required: 2,
            });
        }

        let latest = &buckets[len - 1];
        let previous = &buckets[len - 2];

        Ok(DailyTotal {
            period: latest.period,
            amount: latest.total_amount()?,
            previous_amount: previous.total_amount()?,
        })
    }

    pub async fn daily_by_service(&self) -> Result<Vec<ServiceCost>> {
        let buckets = self.query(Granularity::Daily, true).await?;
        let latest = buckets.last().ok_or(AppError::InsufficientData {
            query: "daily by service",
            buckets: 0,
            required: 1,
        })?;
        Ok(latest.groups.clone())
    }

    async fn query(
        &self,
        granularity: Granularity,
        group_by_service: bool,
    ) -> Result<Vec<ResultByTime>> {
        let query = CostQuery {
            range: self.range,
            granularity,
            group_by_service,
        };
        let buckets = self.explorer.get_cost_and_usage(&query).await?;
        debug!(
            "{:?} query (grouped: {}) for {} returned {} bucket(s)",
            granularity,
            group_by_service,
            self.range,
            buckets.len()
        );
        Ok(buckets)
    }
}

fn first_bucket<'b>(
    buckets: &'b [ResultByTime],
    query: &'static str,
) -> Result<&'b ResultByTime> {
    buckets.first().ok_or(AppError::InsufficientData {
        query,
        buckets: 0,
        required: 1,
    })
}
