use super::{CostExplorer, CostQuery, Granularity, ResultByTime};
use crate::error::{AppError, Result};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Mutex;

/// Scripted Cost Explorer for tests.
///
/// Responses are keyed by granularity and grouping. Unscripted queries
/// return no buckets. Every query is recorded so tests can assert on what
/// was (or was not) sent.
#[derive(Default)]
pub struct MockCostExplorer {
    responses: HashMap<(Granularity, bool), Vec<ResultByTime>>,
    failure: Option<String>,
    queries: Mutex<Vec<CostQuery>>,
}

impl MockCostExplorer {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_response(
        mut self,
        granularity: Granularity,
        group_by_service: bool,
        buckets: Vec<ResultByTime>,
    ) -> Self {
        self.responses.insert((granularity, group_by_service), buckets);
        self
    }

    /// Fail every query with a `Query` error carrying `message`
    pub fn failing(mut self, message: impl Into<String>) -> Self {
        self.failure = Some(message.into());
        self
    }

    pub fn queries(&self) -> Vec<CostQuery> {
        self.queries
            .lock()
            .map(|queries| queries.clone())
            .unwrap_or_default()
    }

    pub fn call_count(&self) -> usize {
        self.queries().len()
    }
}

#[async_trait]
impl CostExplorer for MockCostExplorer {
    async fn get_cost_and_usage(&self, query: &CostQuery) -> Result<Vec<ResultByTime>> {
        if let Ok(mut queries) = self.queries.lock() {
            queries.push(*query);
        }

        if let Some(message) = &self.failure {
            return Err(AppError::Query(message.clone()));
        }

        Ok(self
            .responses
            .get(&(query.granularity, query.group_by_service))
            .cloned()
            .unwrap_or_default())
    }
}
