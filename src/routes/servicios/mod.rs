mod handler;
mod model;

pub use handler::{get_service, get_services};
