//! The execution driver.
//!
//! Iterates the extracted statement sequence, opening either one shared
//! connection or a fresh connection per statement, pausing between
//! executions, and rendering results.

use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;
use tracing::info;

use crate::db::{Connector, DatabaseClient, Driver, Execution};
use crate::error::{DbRunError, Result};
use crate::render::render_result_set;

/// Immutable run parameters, built once from the CLI.
#[derive(Debug, Clone)]
pub struct RunConfig {
    /// JDBC-style connection URL.
    pub url: String,
    pub username: String,
    pub password: String,
    /// How many times to run the whole statement sequence. Zero means zero
    /// executions, not an error.
    pub times: u64,
    /// Pause before each statement execution, in milliseconds.
    pub interval_ms: u64,
    /// Open a fresh connection for every statement execution.
    pub new_connections: bool,
    /// Render result sets and update counts.
    pub show_results: bool,
}

/// Per-statement execution outcome.
#[derive(Debug)]
pub struct ExecutionOutcome {
    /// What the database reported.
    pub execution: Execution,
    /// How long the execution took.
    pub elapsed: Duration,
}

/// Runs statement sequences against a database through a `Connector`.
pub struct Runner<'a> {
    connector: &'a dyn Connector,
    cancel: CancellationToken,
}

impl<'a> Runner<'a> {
    /// Creates a new runner.
    pub fn new(connector: &'a dyn Connector, cancel: CancellationToken) -> Self {
        Self { connector, cancel }
    }

    /// Executes the statement sequence `config.times` times.
    ///
    /// The first failure from the database aborts the run immediately;
    /// remaining statements and iterations are not executed. Connections
    /// are closed on every exit path.
    pub async fn run(&self, statements: &[String], config: &RunConfig) -> Result<()> {
        // Scheme validation happens before any connection attempt.
        let driver = Driver::from_url(&config.url)?;

        if config.times == 0 || statements.is_empty() {
            return Ok(());
        }

        if config.new_connections {
            self.run_with_fresh_connections(driver, statements, config).await
        } else {
            let client = self.acquire(driver, config).await?;
            let outcome = self.run_on_connection(client.as_ref(), statements, config).await;
            let closed = client.close().await;
            outcome.and(closed)
        }
    }

    /// Shared-connection mode: every execution goes through `client`.
    async fn run_on_connection(
        &self,
        client: &dyn DatabaseClient,
        statements: &[String],
        config: &RunConfig,
    ) -> Result<()> {
        for _ in 0..config.times {
            for sql in statements {
                self.pause(config.interval_ms).await?;
                self.execute_one(client, sql, config.show_results).await?;
            }
        }
        Ok(())
    }

    /// Per-statement mode: acquire, execute, release for every statement.
    async fn run_with_fresh_connections(
        &self,
        driver: Driver,
        statements: &[String],
        config: &RunConfig,
    ) -> Result<()> {
        for _ in 0..config.times {
            for sql in statements {
                self.pause(config.interval_ms).await?;
                let client = self.acquire(driver, config).await?;
                let outcome = self
                    .execute_one(client.as_ref(), sql, config.show_results)
                    .await;
                let closed = client.close().await;
                outcome.and(closed)?;
            }
        }
        Ok(())
    }

    /// Acquires one connection for the configured URL and credentials.
    async fn acquire(&self, driver: Driver, config: &RunConfig) -> Result<Box<dyn DatabaseClient>> {
        self.connector
            .connect(driver, &config.url, &config.username, &config.password)
            .await
    }

    /// Submits one statement, with the trailing terminator stripped, and
    /// renders the outcome when requested.
    async fn execute_one(
        &self,
        client: &dyn DatabaseClient,
        sql: &str,
        show_results: bool,
    ) -> Result<ExecutionOutcome> {
        let sql = sql.strip_suffix(';').unwrap_or(sql);
        info!("Executing SQL: {sql}");

        let start = Instant::now();
        let execution = client.execute(sql).await?;
        let elapsed = start.elapsed();

        if show_results {
            match &execution {
                Execution::ResultSet(result) => info!("{}", render_result_set(result)),
                Execution::UpdateCount(count) => info!("Update count: {count}"),
            }
        }
        info!("Executed SQL: {sql}\tTime cost: {} ms.", elapsed.as_millis());

        Ok(ExecutionOutcome { execution, elapsed })
    }

    /// Interruptible pause before a statement execution.
    ///
    /// Cancellation stops the sleep and terminates the run instead of
    /// completing the remaining iterations.
    async fn pause(&self, interval_ms: u64) -> Result<()> {
        if interval_ms == 0 {
            if self.cancel.is_cancelled() {
                return Err(DbRunError::Cancelled);
            }
            return Ok(());
        }
        tokio::select! {
            () = self.cancel.cancelled() => Err(DbRunError::Cancelled),
            () = tokio::time::sleep(Duration::from_millis(interval_ms)) => Ok(()),
        }
    }
}
