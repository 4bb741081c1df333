use serde::Serialize;
use sqlx::{FromRow, PgPool};

use crate::utils::encode_bytes;

/// Name-only projection for the partner strip on the landing page.
#[derive(Debug, Serialize, FromRow)]
pub struct EmpresaNombre {
    pub nombre: String,
}

#[derive(Debug, FromRow)]
struct EmpresaRow {
    id: i32,
    nombre: String,
    descripcion: String,
    sitio_web: Option<String>,
    logo: Option<Vec<u8>>,
}

#[derive(Debug, Serialize)]
pub struct EmpresaDetalle {
    pub id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub sitio_web: Option<String>,
    pub logo: Option<String>,
}

impl From<EmpresaRow> for EmpresaDetalle {
    fn from(row: EmpresaRow) -> Self {
        EmpresaDetalle {
            id: row.id,
            nombre: row.nombre,
            descripcion: row.descripcion,
            sitio_web: row.sitio_web,
            logo: row.logo.as_deref().map(encode_bytes),
        }
    }
}

impl EmpresaNombre {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>("SELECT nombre FROM empresas ORDER BY nombre")
            .fetch_all(pool)
            .await
    }
}

impl EmpresaDetalle {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        let rows = sqlx::query_as::<_, EmpresaRow>(
            "SELECT id, nombre, descripcion, sitio_web, logo FROM empresas ORDER BY nombre",
        )
        .fetch_all(pool)
        .await?;

        Ok(rows.into_iter().map(EmpresaDetalle::from).collect())
    }
}
