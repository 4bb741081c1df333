use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Serialize, FromRow)]
pub struct PreguntaFrecuente {
    pub id: i32,
    pub pregunta: String,
    pub respuesta: String,
    pub orden: i32,
}

impl PreguntaFrecuente {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, pregunta, respuesta, orden FROM preguntas_frecuentes ORDER BY orden",
        )
        .fetch_all(pool)
        .await
    }
}
