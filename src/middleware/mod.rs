mod error_handler;
mod load_shed;
mod rate_limit;
mod timeout;
mod whitelist;

pub use error_handler::log_errors;
pub use load_shed::load_shed;
pub use rate_limit::rate_limit;
pub use timeout::request_timeout;
pub use whitelist::path_whitelist;
