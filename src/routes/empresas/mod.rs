mod handler;
mod model;

pub use handler::{get_empresas, get_empresas_details};
