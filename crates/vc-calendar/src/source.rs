//! Data source traits
//!
//! The calendar does not read notes itself. It calls a query executor for
//! structured queries and a task provider for the default scan; both are
//! supplied by the host.

use async_trait::async_trait;

use crate::models::{QueryResponse, TaskRecord};

/// Runs a structured query expression and returns its rows
#[async_trait]
pub trait QueryExecutor: Send + Sync {
    /// Execute `source`.
    ///
    /// Failures are reported in-band with `successful: false` rather than as
    /// an `Err`, matching the executor's wire shape.
    async fn query(&self, source: &str) -> QueryResponse;
}

/// Lists every task-like record in the vault
#[async_trait]
pub trait TaskProvider: Send + Sync {
    /// All task records, completed or not. Filtering is done by the caller.
    async fn tasks(&self) -> crate::Result<Vec<TaskRecord>>;
}

/// Executor for setups that never issue structured queries
pub struct NoQueries;

#[async_trait]
impl QueryExecutor for NoQueries {
    async fn query(&self, source: &str) -> QueryResponse {
        QueryResponse::failed(format!("No query executor configured for: {}", source))
    }
}

/// Provider with a fixed task list
pub struct StaticTasks(pub Vec<TaskRecord>);

#[async_trait]
impl TaskProvider for StaticTasks {
    async fn tasks(&self) -> crate::Result<Vec<TaskRecord>> {
        Ok(self.0.clone())
    }
}
