use serde::Serialize;

use crate::config::Config;

/// Runtime connection info the frontend uses to build API URLs.
#[derive(Debug, Serialize)]
pub struct ServerInfo {
    pub server: String,
    pub port: u16,
    #[serde(rename = "apiUrl")]
    pub api_url: String,
}

impl ServerInfo {
    pub fn from_config(config: &Config) -> Self {
        Self {
            server: config.server_host.clone(),
            port: config.server_port,
            api_url: config.api_url(),
        }
    }
}
