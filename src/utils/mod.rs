use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde_json::{Map, Value};
use sqlx::postgres::PgRow;
use sqlx::{Column, Row, TypeInfo};

/// Site-wide date format for API payloads.
pub fn format_fecha(fecha: NaiveDate) -> String {
    fecha.format("%d/%m/%Y").to_string()
}

pub fn format_fecha_hora(fecha: NaiveDateTime) -> String {
    fecha.format("%d/%m/%Y %H:%M:%S").to_string()
}

/// Binary columns (images, logos) travel as base64 strings in JSON bodies.
pub fn encode_bytes(bytes: &[u8]) -> String {
    STANDARD.encode(bytes)
}

/// Serializes rows of unknown shape to JSON objects, column by column.
/// Used only by the raw query endpoint, where the statement (and therefore
/// the result shape) is caller-supplied.
pub fn rows_to_json(rows: &[PgRow]) -> Vec<Map<String, Value>> {
    rows.iter().map(row_to_json).collect()
}

fn row_to_json(row: &PgRow) -> Map<String, Value> {
    let mut object = Map::new();
    for (index, column) in row.columns().iter().enumerate() {
        let value = column_value(row, index, column.type_info().name());
        object.insert(column.name().to_string(), value);
    }
    object
}

fn column_value(row: &PgRow, index: usize, type_name: &str) -> Value {
    let value = match type_name {
        "INT2" => row
            .try_get::<Option<i16>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "INT4" => row
            .try_get::<Option<i32>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "INT8" => row
            .try_get::<Option<i64>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "FLOAT4" => row
            .try_get::<Option<f32>, _>(index)
            .ok()
            .flatten()
            .map(|v| Value::from(f64::from(v))),
        "FLOAT8" => row
            .try_get::<Option<f64>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "BOOL" => row
            .try_get::<Option<bool>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "TEXT" | "VARCHAR" | "BPCHAR" | "CHAR" | "NAME" => row
            .try_get::<Option<String>, _>(index)
            .ok()
            .flatten()
            .map(Value::from),
        "DATE" => row
            .try_get::<Option<NaiveDate>, _>(index)
            .ok()
            .flatten()
            .map(|d| Value::from(format_fecha(d))),
        "TIMESTAMP" => row
            .try_get::<Option<NaiveDateTime>, _>(index)
            .ok()
            .flatten()
            .map(|t| Value::from(format_fecha_hora(t))),
        "TIMESTAMPTZ" => row
            .try_get::<Option<DateTime<Utc>>, _>(index)
            .ok()
            .flatten()
            .map(|t| Value::from(format_fecha_hora(t.naive_utc()))),
        "BYTEA" => row
            .try_get::<Option<Vec<u8>>, _>(index)
            .ok()
            .flatten()
            .map(|b| Value::from(encode_bytes(&b))),
        "JSON" | "JSONB" => row.try_get::<Option<Value>, _>(index).ok().flatten(),
        other => {
            tracing::debug!("unsupported column type {} serialized as null", other);
            None
        }
    };

    value.unwrap_or(Value::Null)
}
