use chrono::NaiveDate;
use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::utils::{encode_bytes, format_fecha};

/// Row shape as stored: dates and image bytes still raw.
#[derive(Debug, FromRow)]
struct NoticiaRow {
    id: i32,
    titulo: String,
    resumen: String,
    contenido: String,
    fecha: NaiveDate,
    imagen: Option<Vec<u8>>,
    destacada: bool,
}

/// API shape: `fecha` formatted DD/MM/YYYY, `imagen` base64.
#[derive(Debug, Serialize)]
pub struct Noticia {
    pub id: i32,
    pub titulo: String,
    pub resumen: String,
    pub contenido: String,
    pub fecha: String,
    pub imagen: Option<String>,
    pub destacada: bool,
}

impl From<NoticiaRow> for Noticia {
    fn from(row: NoticiaRow) -> Self {
        Noticia {
            id: row.id,
            titulo: row.titulo,
            resumen: row.resumen,
            contenido: row.contenido,
            fecha: format_fecha(row.fecha),
            imagen: row.imagen.as_deref().map(encode_bytes),
            destacada: row.destacada,
        }
    }
}

const COLUMNS: &str = "id, titulo, resumen, contenido, fecha, imagen, destacada";

impl Noticia {
    pub async fn latest(pool: &PgPool, limit: i64) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, NoticiaRow>(&format!(
            "SELECT {COLUMNS} FROM noticias ORDER BY fecha DESC, id DESC LIMIT $1"
        ))
        .bind(limit)
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Noticia::from).collect())
    }

    pub async fn destacadas(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, NoticiaRow>(&format!(
            "SELECT {COLUMNS} FROM noticias WHERE destacada = TRUE ORDER BY fecha DESC, id DESC"
        ))
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(Noticia::from).collect())
    }

    pub async fn find_by_id(pool: &PgPool, id: i32) -> Result<Option<Self>, sqlx::Error> {
        let row = sqlx::query_as::<_, NoticiaRow>(&format!(
            "SELECT {COLUMNS} FROM noticias WHERE id = $1"
        ))
        .bind(id)
        .fetch_optional(pool)
        .await?;

        Ok(row.map(Noticia::from))
    }
}
