use serde::Serialize;
use sqlx::{FromRow, PgPool};

#[derive(Debug, Serialize, FromRow)]
pub struct Servicio {
    pub id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub icono: Option<String>,
}

#[derive(Debug, Serialize, FromRow)]
pub struct LineaProducto {
    pub id: i32,
    pub servicio_id: i32,
    pub nombre: String,
    pub descripcion: String,
    pub orden: i32,
}

/// Composite payload for the service detail page.
#[derive(Debug, Serialize)]
pub struct ServicioDetalle {
    pub service: Servicio,
    #[serde(rename = "productLines")]
    pub product_lines: Vec<LineaProducto>,
}

impl Servicio {
    pub async fn list(pool: &PgPool) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, nombre, descripcion, icono FROM servicios ORDER BY nombre",
        )
        .fetch_all(pool)
        .await
    }

    pub async fn find_by_nombre(pool: &PgPool, nombre: &str) -> Result<Option<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, nombre, descripcion, icono FROM servicios WHERE nombre = $1",
        )
        .bind(nombre)
        .fetch_optional(pool)
        .await
    }
}

impl LineaProducto {
    pub async fn for_servicio(pool: &PgPool, servicio_id: i32) -> Result<Vec<Self>, sqlx::Error> {
        sqlx::query_as::<_, Self>(
            "SELECT id, servicio_id, nombre, descripcion, orden \
             FROM lineas_producto WHERE servicio_id = $1 ORDER BY orden",
        )
        .bind(servicio_id)
        .fetch_all(pool)
        .await
    }
}
