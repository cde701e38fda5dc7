use super::{
    AMORTIZED_COST, CostExplorer, CostQuery, DateRange, Granularity, ResultByTime,
    SERVICE_DIMENSION, ServiceCost, parse_amount,
};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use aws_sdk_costexplorer::Client;
use aws_sdk_costexplorer::error::DisplayErrorContext;
use aws_sdk_costexplorer::operation::get_cost_and_usage::GetCostAndUsageOutput;
use aws_sdk_costexplorer::types as ce;
use std::collections::HashMap;
use std::future::Future;
use tracing::debug;

/// Cost Explorer backed by the AWS SDK.
#[derive(Clone)]
pub struct AwsCostExplorer {
    client: Client,
}

impl AwsCostExplorer {
    pub fn new(client: Client) -> Self {
        Self { client }
    }
}

impl From<Granularity> for ce::Granularity {
    fn from(granularity: Granularity) -> Self {
        match granularity {
            Granularity::Monthly => ce::Granularity::Monthly,
            Granularity::Daily => ce::Granularity::Daily,
        }
    }
}

#[async_trait]
impl CostExplorer for AwsCostExplorer {
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<Vec<ResultByTime>> {
        let time_period = ce::DateInterval::builder()
            .start(query.range.api_start())
            .end(query.range.api_end())
            .build()
            .map_err(|e| AppError::Query(format!("invalid time period: {e}")))?;

        collect_pages(|next_page_token| {
            let mut request = self
                .client
                .get_cost_and_usage()
                .time_period(time_period.clone())
                .granularity(query.granularity.into())
                .metrics(AMORTIZED_COST)
                .set_next_page_token(next_page_token);

            if query.group_by_service {
                request = request.group_by(
                    ce::GroupDefinition::builder()
                        .r#type(ce::GroupDefinitionType::Dimension)
                        .key(SERVICE_DIMENSION)
                        .build(),
                );
            }

            async move {
                request
                    .send()
                    .await
                    .map_err(|e| AppError::Query(DisplayErrorContext(&e).to_string()))
            }
        })
        .await
    }
}

/// Fetch pages until Cost Explorer stops returning a continuation token.
async fn collect_pages<F, Fut>(mut fetch_page: F) -> Result<Vec<ResultByTime>>
where
    F: FnMut(Option<String>) -> Fut,
    Fut: Future<Output = Result<GetCostAndUsageOutput>>,
{
    let mut buckets: Vec<ResultByTime> = Vec::new();
    let mut next_page_token: Option<String> = None;

    loop {
        let output = fetch_page(next_page_token.take()).await?;

        for raw in output.results_by_time() {
            merge_bucket(&mut buckets, convert_result(raw)?);
        }

        match output.next_page_token() {
            Some(token) if !token.is_empty() => {
                debug!("Cost Explorer returned a continuation token, fetching next page");
                next_page_token = Some(token.to_string());
            }
            _ => break,
        }
    }

    Ok(buckets)
}

/// Pages may split one bucket's groups; fold them back together.
fn merge_bucket(buckets: &mut Vec<ResultByTime>, bucket: ResultByTime) {
    match buckets.iter_mut().find(|b| b.period == bucket.period) {
        Some(existing) => {
            existing.groups.extend(bucket.groups);
            if existing.total.is_none() {
                existing.total = bucket.total;
            }
        }
        None => buckets.push(bucket),
    }
}

fn convert_result(raw: &ce::ResultByTime) -> Result<ResultByTime> {
    let interval = raw
        .time_period()
        .ok_or_else(|| AppError::InvalidResponse("result has no time period".to_string()))?;
    let period = DateRange::parse(interval.start(), interval.end()).map_err(|e| {
        AppError::InvalidResponse(format!(
            "invalid time period {} - {}: {e}",
            interval.start(),
            interval.end()
        ))
    })?;

    let total = raw
        .total()
        .and_then(metric_amount)
        .map(parse_amount)
        .transpose()?;

    let groups = raw
        .groups()
        .iter()
        .map(convert_group)
        .collect::<Result<Vec<_>>>()?;

    Ok(ResultByTime {
        period,
        total,
        groups,
    })
}

fn convert_group(group: &ce::Group) -> Result<ServiceCost> {
    let service_name = group
        .keys()
        .first()
        .ok_or_else(|| AppError::InvalidResponse("group has no service key".to_string()))?;
    let amount = group
        .metrics()
        .and_then(metric_amount)
        .ok_or_else(|| {
            AppError::InvalidResponse(format!("group '{service_name}' has no {AMORTIZED_COST}"))
        })
        .and_then(parse_amount)?;

    Ok(ServiceCost::new(service_name.clone(), amount))
}

fn metric_amount(metrics: &HashMap<String, ce::MetricValue>) -> Option<&str> {
    metrics.get(AMORTIZED_COST).and_then(|metric| metric.amount())
}
