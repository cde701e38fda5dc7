//! Billing data retrieval
//!
//! Resolves the month-to-date reporting window and queries Cost Explorer for
//! the totals and per-service breakdowns a billing notification needs.

mod cost_explorer;
mod date_range;
mod fetcher;
pub mod mock;

pub use cost_explorer::AwsCostExplorer;
pub use date_range::{API_DATE_FORMAT, DISPLAY_DATE_FORMAT, DateRange};
pub use fetcher::{BillingFetcher, BillingSnapshot, DailyTotal};

use crate::error::{AppError, Result};
use async_trait::async_trait;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Metric requested from Cost Explorer for every query
pub const AMORTIZED_COST: &str = "AmortizedCost";

/// Dimension used for per-service breakdowns
pub const SERVICE_DIMENSION: &str = "SERVICE";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Granularity {
    Monthly,
    Daily,
}

/// A single read-only cost and usage query.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CostQuery {
    pub range: DateRange,
    pub granularity: Granularity,
    pub group_by_service: bool,
}

/// Cost attributed to one service within a time bucket.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServiceCost {
    pub service_name: String,
    pub amount: Decimal,
}

impl ServiceCost {
    pub fn new(service_name: impl Into<String>, amount: Decimal) -> Self {
        Self {
            service_name: service_name.into(),
            amount,
        }
    }
}

/// One time bucket of a Cost Explorer response.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResultByTime {
    pub period: DateRange,
    /// Absent on grouped queries
    pub total: Option<Decimal>,
    pub groups: Vec<ServiceCost>,
}

impl ResultByTime {
    pub fn with_total(period: DateRange, amount: Decimal) -> Self {
        Self {
            period,
            total: Some(amount),
            groups: Vec::new(),
        }
    }

    pub fn with_groups(period: DateRange, groups: Vec<ServiceCost>) -> Self {
        Self {
            period,
            total: None,
            groups,
        }
    }

    pub fn total_amount(&self) -> Result<Decimal> {
        self.total.ok_or_else(|| {
            AppError::InvalidResponse(format!(
                "bucket starting {} has no {AMORTIZED_COST} total",
                self.period.start
            ))
        })
    }
}

/// A monetary total for a period.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PeriodTotal {
    pub period: DateRange,
    pub amount: Decimal,
}

/// Cost Explorer access used by the billing fetcher.
#[async_trait]
pub trait CostExplorer: Send + Sync {
    /// Run one query and return its time buckets in API order.
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<Vec<ResultByTime>>;
}

/// Parse a Cost Explorer amount string. Very small charges sometimes come
/// back in scientific notation.
pub fn parse_amount(raw: &str) -> Result<Decimal> {
    let raw = raw.trim();
    Decimal::from_str(raw)
        .or_else(|_| Decimal::from_scientific(raw))
        .map_err(|e| AppError::InvalidResponse(format!("invalid amount '{raw}': {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_parse_amount_plain() {
        assert_eq!(parse_amount("123.456").unwrap(), dec!(123.456));
        assert_eq!(parse_amount("0").unwrap(), Decimal::ZERO);
        assert_eq!(parse_amount(" 5.0 ").unwrap(), dec!(5.0));
    }

    #[test]
    fn test_parse_amount_scientific() {
        assert_eq!(parse_amount("1.5E-7").unwrap(), dec!(0.00000015));
    }

    #[test]
    fn test_parse_amount_rejects_garbage() {
        let err = parse_amount("n/a").unwrap_err();
        assert!(matches!(err, AppError::InvalidResponse(_)));
    }

    #[test]
    fn test_total_amount_missing() {
        let period = DateRange::parse("2024-10-01", "2024-10-02").unwrap();
        let bucket = ResultByTime::with_groups(period, vec![]);
        assert!(matches!(
            bucket.total_amount(),
            Err(AppError::InvalidResponse(_))
        ));
    }
}
