mod handler;
mod model;

pub use handler::get_preguntas_frecuentes;
