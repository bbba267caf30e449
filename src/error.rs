//! Error types for later-store.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    /// The store could not be reached or the connection dropped mid-call.
    #[error("store connection error: {0}")]
    Connection(#[source] redis::RedisError),

    /// The store was reachable but rejected or failed the command.
    #[error("store error: {0}")]
    Redis(#[source] redis::RedisError),

    /// Failure reported by a non-Redis store implementation.
    #[error("store error: {0}")]
    Backend(String),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("configuration error: {0}")]
    Config(String),

    #[error("{0}")]
    Other(String),
}

impl Error {
    /// True for every failure that originated in the key-value store.
    pub fn is_store_error(&self) -> bool {
        matches!(
            self,
            Error::Connection(_) | Error::Redis(_) | Error::Backend(_)
        )
    }

    /// True when the failure was at the transport level rather than the command.
    pub fn is_connection_error(&self) -> bool {
        matches!(self, Error::Connection(_))
    }
}

impl From<redis::RedisError> for Error {
    fn from(err: redis::RedisError) -> Self {
        if err.is_io_error()
            || err.is_connection_refusal()
            || err.is_connection_dropped()
            || err.is_timeout()
        {
            Error::Connection(err)
        } else {
            Error::Redis(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, Error>;
