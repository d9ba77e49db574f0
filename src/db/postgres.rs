//! PostgreSQL database client implementation.
//!
//! Provides the `PostgresClient` struct that implements the `DatabaseClient`
//! trait for PostgreSQL databases using sqlx.

use crate::db::{ColumnInfo, DatabaseClient, Execution, QueryResult, Row, Value};
use crate::error::{DbRunError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::postgres::{PgPool, PgPoolOptions, PgRow};
use sqlx::{Column as SqlxColumn, Either, Row as SqlxRow, TypeInfo};
use std::time::{Duration, Instant};
use tracing::info;

/// Timeout for acquiring the connection.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// PostgreSQL database client holding a single connection.
#[derive(Debug)]
pub struct PostgresClient {
    pool: PgPool,
}

impl PostgresClient {
    /// Connects to the database at the given native URL.
    ///
    /// The pool is capped at one connection so the client never holds more
    /// than one physical connection.
    pub async fn connect(url: &str) -> Result<Self> {
        let start = Instant::now();
        let pool = PgPoolOptions::new()
            .max_connections(1)
            .acquire_timeout(Duration::from_secs(CONNECT_TIMEOUT_SECS))
            .connect(url)
            .await
            .map_err(|e| DbRunError::connection(e.to_string()))?;
        info!(
            "Connection created. Time cost: {} ms.",
            start.elapsed().as_millis()
        );
        Ok(Self { pool })
    }

    /// Creates a client from an existing pool.
    ///
    /// This is primarily useful for testing.
    #[allow(dead_code)]
    pub fn from_pool(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseClient for PostgresClient {
    async fn execute(&self, sql: &str) -> Result<Execution> {
        let mut stream = sqlx::raw_sql(sql).fetch_many(&self.pool);

        let mut columns: Vec<ColumnInfo> = Vec::new();
        let mut rows: Vec<Row> = Vec::new();
        let mut rows_affected: u64 = 0;

        while let Some(item) = stream
            .try_next()
            .await
            .map_err(|e| DbRunError::query(format_query_error(&e)))?
        {
            match item {
                Either::Left(done) => rows_affected += done.rows_affected(),
                Either::Right(row) => {
                    if columns.is_empty() {
                        columns = row
                            .columns()
                            .iter()
                            .map(|col| ColumnInfo::new(col.name(), col.type_info().name()))
                            .collect();
                    }
                    rows.push(convert_row(&row));
                }
            }
        }

        if rows.is_empty() {
            Ok(Execution::UpdateCount(rows_affected))
        } else {
            Ok(Execution::ResultSet(QueryResult::with_data(columns, rows)))
        }
    }

    async fn close(&self) -> Result<()> {
        self.pool.close().await;
        Ok(())
    }
}

/// Converts a sqlx PgRow to our Row type.
fn convert_row(row: &PgRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a PgRow to our Value type.
fn convert_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "BOOL" | "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "INT2" | "SMALLINT" => row
            .try_get::<Option<i16>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),

        "INT4" | "INT" | "INTEGER" => row
            .try_get::<Option<i32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),

        "INT8" | "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "FLOAT4" | "REAL" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Float(v as f64))
            .unwrap_or(Value::Null),

        "FLOAT8" | "DOUBLE PRECISION" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BYTEA" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bytes)
            .unwrap_or(Value::Null),

        // For all other types, try to get as string
        _ => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::String)
            .unwrap_or(Value::Null),
    }
}

/// Formats a query error with detail and hint fields if available.
fn format_query_error(error: &sqlx::Error) -> String {
    let mut result = String::new();

    if let Some(db_error) = error.as_database_error() {
        result.push_str("ERROR: ");
        result.push_str(db_error.message());

        if let Some(pg_error) = db_error.try_downcast_ref::<sqlx::postgres::PgDatabaseError>() {
            if let Some(detail) = pg_error.detail() {
                result.push_str("\n  DETAIL: ");
                result.push_str(detail);
            }

            if let Some(hint) = pg_error.hint() {
                result.push_str("\n  HINT: ");
                result.push_str(hint);
            }
        }
    } else {
        result = error.to_string();
    }

    result
}
