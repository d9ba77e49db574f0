//! MySQL database client implementation.
//!
//! Provides the `MySqlClient` struct that implements the `DatabaseClient`
//! trait for MySQL databases using sqlx.

use crate::db::{ColumnInfo, DatabaseClient, Execution, QueryResult, Row, Value};
use crate::error::{DbRunError, Result};
use async_trait::async_trait;
use futures::TryStreamExt;
use sqlx::mysql::{MySqlPool, MySqlPoolOptions, MySqlRow};
use sqlx::{Column as SqlxColumn, Either, Row as SqlxRow, TypeInfo};
use std::time::{Duration, Instant};
use tracing::info;

/// Timeout for acquiring the connection.
const CONNECT_TIMEOUT_SECS: u64 = 10;

/// MySQL database client holding a single connection.
#[derive(Debug)]
pub struct MySqlClient {
    pool: MySqlPool,
}

impl MySqlClient {
    /// Connects to the database at the given native URL.
    ///
    /// The pool is capped at one connection so the client never holds more
    /// than one physical connection.
    pub async fn connect(url: &str) -> Result<Self> {
        let start = Instant::now();
        let pool = MySqlPoolOptions::new()
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
    pub fn from_pool(pool: MySqlPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl DatabaseClient for MySqlClient {
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

/// Converts a sqlx MySqlRow to our Row type.
fn convert_row(row: &MySqlRow) -> Row {
    row.columns()
        .iter()
        .enumerate()
        .map(|(i, col)| convert_value(row, i, col.type_info().name()))
        .collect()
}

/// Converts a single column value from a MySqlRow to our Value type.
fn convert_value(row: &MySqlRow, index: usize, type_name: &str) -> Value {
    match type_name.to_uppercase().as_str() {
        "BOOLEAN" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::Bool)
            .unwrap_or(Value::Null),

        "TINYINT" => row
            .try_get::<Option<i8>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),

        "SMALLINT" => row
            .try_get::<Option<i16>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),

        "INT" | "MEDIUMINT" => row
            .try_get::<Option<i32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Int(v as i64))
            .unwrap_or(Value::Null),

        "BIGINT" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Int)
            .unwrap_or(Value::Null),

        "FLOAT" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::Float(v as f64))
            .unwrap_or(Value::Null),

        "DOUBLE" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::Float)
            .unwrap_or(Value::Null),

        "BINARY" | "VARBINARY" | "BLOB" | "TINYBLOB" | "MEDIUMBLOB" | "LONGBLOB" => row
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

/// Formats a query error, keeping the server message when available.
fn format_query_error(error: &sqlx::Error) -> String {
    if let Some(db_error) = error.as_database_error() {
        format!("ERROR: {}", db_error.message())
    } else {
        error.to_string()
    }
}
