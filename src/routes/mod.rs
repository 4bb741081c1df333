// One directory per resource: handler.rs maps the route to a query, model.rs
// owns the sqlx calls and the row -> JSON mapping.

pub mod config;
pub mod consulta;
pub mod empresas;
pub mod eventos;
pub mod noticias;
pub mod preguntas;
pub mod presentacion;
pub mod servicios;
