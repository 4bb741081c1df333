use std::env;
use std::net::{IpAddr, Ipv6Addr, SocketAddr, ToSocketAddrs};
use std::time::Duration;

#[derive(Debug, Clone, serde::Deserialize)]
pub struct Config {
    pub server_host: String,
    pub server_port: u16,
    pub db_host: String,
    pub db_user: String,
    pub db_password: String,
    pub db_name: String,
    pub db_port: u16,
    pub static_dir: String,
    pub rate_limit_requests: u32,
    pub rate_limit_window_secs: u64,
    pub max_connections_per_ip: usize,
    pub max_request_queue: usize,
    pub request_timeout_secs: u64,
    pub max_body_bytes: usize,
    pub load_shed_lag_ms: u64,
}

impl Config {
    pub fn from_env() -> Result<Self, env::VarError> {
        dotenv::dotenv().ok();

        Ok(Config {
            server_host: env::var("SERVER").unwrap_or_else(|_| "localhost".to_string()),
            server_port: env::var("PORT").unwrap_or_default().parse().unwrap_or(3000),
            db_host: env::var("DB_HOST")?,
            db_user: env::var("DB_USER")?,
            db_password: env::var("DB_PASSWORD")?,
            db_name: env::var("DB_NAME")?,
            db_port: env::var("DB_PORT").unwrap_or_default().parse().unwrap_or(5432),
            static_dir: env::var("STATIC_DIR").unwrap_or_else(|_| "public".to_string()),
            rate_limit_requests: env::var("RATE_LIMIT_REQUESTS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(200),
            rate_limit_window_secs: env::var("RATE_LIMIT_WINDOW")
                .unwrap_or_default()
                .parse()
                .unwrap_or(60),
            max_connections_per_ip: env::var("MAX_CONNECTIONS_PER_IP")
                .unwrap_or_default()
                .parse()
                .unwrap_or(20),
            max_request_queue: env::var("MAX_REQUEST_QUEUE")
                .unwrap_or_default()
                .parse()
                .unwrap_or(300),
            request_timeout_secs: env::var("REQUEST_TIMEOUT")
                .unwrap_or_default()
                .parse()
                .unwrap_or(8),
            max_body_bytes: env::var("MAX_BODY_BYTES")
                .unwrap_or_default()
                .parse()
                .unwrap_or(1024),
            load_shed_lag_ms: env::var("LOAD_SHED_LAG_MS")
                .unwrap_or_default()
                .parse()
                .unwrap_or(100),
        })
    }

    pub fn database_url(&self) -> String {
        format!(
            "postgres://{}:{}@{}:{}/{}",
            self.db_user, self.db_password, self.db_host, self.db_port, self.db_name
        )
    }

    pub fn api_url(&self) -> String {
        format!("http://{}:{}/api", self.server_host, self.server_port)
    }

    pub fn rate_limit_window(&self) -> Duration {
        Duration::from_secs(self.rate_limit_window_secs)
    }

    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Listener address. `SERVER` may be a hostname (the default is
    /// `localhost`), so it is resolved rather than parsed; an unresolvable
    /// value falls back to the dual-stack wildcard.
    pub fn bind_addr(&self) -> SocketAddr {
        (self.server_host.as_str(), self.server_port)
            .to_socket_addrs()
            .ok()
            .and_then(|mut addrs| addrs.next())
            .unwrap_or_else(|| {
                tracing::warn!(
                    "SERVER '{}' did not resolve, falling back to dual-stack default",
                    self.server_host
                );
                SocketAddr::new(IpAddr::V6(Ipv6Addr::UNSPECIFIED), self.server_port)
            })
    }
}
