mod handler;
mod model;

pub use handler::get_presentacion;
