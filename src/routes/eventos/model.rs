use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::utils::{encode_bytes, format_fecha};

#[derive(Debug, FromRow)]
struct EventoRow {
    id: i32,
    titulo: String,
    descripcion: String,
    fecha: NaiveDate,
    lugar: String,
    imagen: Option<Vec<u8>>,
}

#[derive(Debug, Serialize)]
pub struct Evento {
    pub id: i32,
    pub titulo: String,
    pub descripcion: String,
    pub fecha: String,
    pub lugar: String,
    pub imagen: Option<String>,
}

impl From<EventoRow> for Evento {
    fn from(row: EventoRow) -> Self {
        Evento {
            id: row.id,
            titulo: row.titulo,
            descripcion: row.descripcion,
            fecha: format_fecha(row.fecha),
            lugar: row.lugar,
            imagen: row.imagen.as_deref().map(encode_bytes),
        }
    }
}

impl Evento {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EventoRow>(
            "SELECT id, titulo, descripcion, fecha, lugar, imagen \
             FROM eventos ORDER BY fecha DESC, id DESC",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Evento::from).collect())
    }
}
