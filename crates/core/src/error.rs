use thiserror::Error;

/// Top-level error type used across the entire workspace.
#[derive(Debug, Error)]
pub enum StowError {
    #[error("config error: {0}")]
    Config(String),

    #[error("decode error: {0}")]
    Decode(String),

    #[error("unknown control item state code: {0}")]
    UnknownState(i64),

    #[error("store error: {0}")]
    Store(String),

    #[error("icon error: {0}")]
    Icon(String),

    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: std::io::Error,
    },
}

pub type Result<T, E = StowError> = std::result::Result<T, E>;
