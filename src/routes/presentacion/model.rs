use serde::Serialize;
use sqlx::{FromRow, PgPool};

/// Institutional presentation copy, one row per section.
#[derive(Debug, Serialize, FromRow)]
pub struct Presentacion {
    pub id: i32,
    pub titulo: String,
    pub contenido: String,
    pub orden: i32,
}

impl Presentacion {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, titulo, contenido, orden FROM presentacion ORDER BY orden",
        )
        .fetch_all(pool)
        .await
    }
}
