mod handler;
mod model;

pub use handler::{get_noticia, get_noticias, get_noticias_destacadas};
