mod handler;
mod model;

pub use handler::run_query;
