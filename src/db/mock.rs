//! Mock database clients for testing.
//!
//! Provides in-memory implementations of `DatabaseClient` and `Connector`
//! that record connection and execution activity instead of talking to a
//! real database.

use super::{ColumnInfo, Connector, DatabaseClient, Driver, Execution, QueryResult, Value};
use crate::error::{DbRunError, Result};
use async_trait::async_trait;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

/// Shared bookkeeping between a `MockConnector` and the clients it hands out.
#[derive(Default)]
struct MockState {
    connects: AtomicUsize,
    closes: AtomicUsize,
    executed: Mutex<Vec<String>>,
    /// Fail the execution with this zero-based index, if set.
    fail_on_execution: Option<usize>,
    /// Fail every connection attempt, if set.
    fail_connect: bool,
}

/// A mock database client that returns canned results.
///
/// `SELECT`-like statements produce a one-row result set; everything else
/// produces an update count of 1.
pub struct MockClient {
    state: Arc<MockState>,
}

impl MockClient {
    /// Creates a standalone mock client.
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState::default()),
        }
    }
}

impl Default for MockClient {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl DatabaseClient for MockClient {
    async fn execute(&self, sql: &str) -> Result<Execution> {
        let mut executed = self.state.executed.lock().expect("mock lock poisoned");

        if let Some(failing) = self.state.fail_on_execution {
            if executed.len() == failing {
                return Err(DbRunError::query(format!("injected failure for: {sql}")));
            }
        }
        executed.push(sql.to_string());

        if sql.trim_start().to_uppercase().starts_with("SELECT") {
            let columns = vec![ColumnInfo::new("result", "text")];
            let rows = vec![vec![Value::String(format!("Mock result for: {sql}"))]];
            Ok(Execution::ResultSet(QueryResult::with_data(columns, rows)))
        } else {
            Ok(Execution::UpdateCount(1))
        }
    }

    async fn close(&self) -> Result<()> {
        self.state.closes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

/// A mock client whose executions always fail.
pub struct FailingClient;

#[async_trait]
impl DatabaseClient for FailingClient {
    async fn execute(&self, sql: &str) -> Result<Execution> {
        Err(DbRunError::query(format!("mock failure for: {sql}")))
    }

    async fn close(&self) -> Result<()> {
        Ok(())
    }
}

/// A connector that hands out `MockClient`s and counts acquisitions and
/// releases across all of them.
pub struct MockConnector {
    state: Arc<MockState>,
}

impl MockConnector {
    /// Creates a connector whose clients always succeed.
    pub fn new() -> Self {
        Self {
            state: Arc::new(MockState::default()),
        }
    }

    /// Creates a connector whose clients fail on the given zero-based
    /// execution index (counted across all clients).
    pub fn failing_on_execution(index: usize) -> Self {
        Self {
            state: Arc::new(MockState {
                fail_on_execution: Some(index),
                ..MockState::default()
            }),
        }
    }

    /// Creates a connector that rejects every connection attempt.
    pub fn failing_connect() -> Self {
        Self {
            state: Arc::new(MockState {
                fail_connect: true,
                ..MockState::default()
            }),
        }
    }

    /// Number of connections handed out so far.
    pub fn connect_count(&self) -> usize {
        self.state.connects.load(Ordering::SeqCst)
    }

    /// Number of clients closed so far.
    pub fn close_count(&self) -> usize {
        self.state.closes.load(Ordering::SeqCst)
    }

    /// The statements executed so far, in order, across all clients.
    pub fn executed(&self) -> Vec<String> {
        self.state.executed.lock().expect("mock lock poisoned").clone()
    }
}

impl Default for MockConnector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Connector for MockConnector {
    async fn connect(
        &self,
        _driver: Driver,
        url: &str,
        _username: &str,
        _password: &str,
    ) -> Result<Box<dyn DatabaseClient>> {
        if self.state.fail_connect {
            return Err(DbRunError::connection(format!("mock refusing {url}")));
        }
        self.state.connects.fetch_add(1, Ordering::SeqCst);
        Ok(Box::new(MockClient {
            state: Arc::clone(&self.state),
        }))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_mock_select_produces_result_set() {
        let client = MockClient::new();
        let execution = client.execute("SELECT 1").await.unwrap();
        match execution {
            Execution::ResultSet(result) => {
                assert_eq!(result.columns.len(), 1);
                assert_eq!(result.rows.len(), 1);
            }
            Execution::UpdateCount(_) => panic!("Expected a result set"),
        }
    }

    #[tokio::test]
    async fn test_mock_insert_produces_update_count() {
        let client = MockClient::new();
        let execution = client
            .execute("INSERT INTO test VALUES (1)")
            .await
            .unwrap();
        assert_eq!(execution, Execution::UpdateCount(1));
    }

    #[tokio::test]
    async fn test_mock_connector_counts_connects_and_closes() {
        let connector = MockConnector::new();
        let client = connector
            .connect(Driver::Postgres, "jdbc:postgresql://localhost/test", "", "")
            .await
            .unwrap();
        client.execute("SELECT 1").await.unwrap();
        client.close().await.unwrap();

        assert_eq!(connector.connect_count(), 1);
        assert_eq!(connector.close_count(), 1);
        assert_eq!(connector.executed(), vec!["SELECT 1"]);
    }

    #[tokio::test]
    async fn test_failing_client() {
        let client = FailingClient;
        assert!(client.execute("SELECT 1").await.is_err());
    }
}
