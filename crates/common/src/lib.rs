use thiserror::Error;

pub mod types;
pub mod utils;
pub mod env;
pub mod keepalive;

#[derive(Debug, Error)]
pub enum CoreError {
    #[error("network error: {0}")]
    Network(String),
    #[error("invalid url: {0}")]
    InvalidUrl(String),
    #[error("invalid period: {0}")]
    InvalidPeriod(String),
}
