//! Crate-level error type
//!
//! Endpoint failures are [`ApiError`]s; this type covers everything around
//! them (configuration loading, tracing setup, serving) and wraps `ApiError`
//! so application code can use one `Result`.

use thiserror::Error;

use crate::api::ApiError;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Error)]
pub enum Error {
    #[error("Configuration error: {0}")]
    Config(Box<figment::Error>),

    #[error("Tracing error: {0}")]
    Tracing(String),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] ApiError),
}

impl From<figment::Error> for Error {
    fn from(err: figment::Error) -> Self {
        Error::Config(Box::new(err))
    }
}
