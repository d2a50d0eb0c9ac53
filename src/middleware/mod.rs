mod auth;
mod error_handler;

pub use auth::{auth_middleware, bearer_token};
pub use error_handler::log_errors;
