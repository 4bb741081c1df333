use serde::Deserialize;
use serde_json::{Map, Value};
use sqlx::PgPool;

use crate::utils::rows_to_json;

#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    pub query: String,
}

/// Executes the caller's statement verbatim and serializes whatever comes
/// back. The only validation is the handler's non-empty check; see the
/// security note in DESIGN.md.
pub async fn execute_raw(pool: &PgPool, sql: &str) -> Result<Vec<Map<String, Value>>, sqlx::Error> {
    let rows = sqlx::query(sql).fetch_all(pool).await?;
    Ok(rows_to_json(&rows))
}
