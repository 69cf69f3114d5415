use thiserror::Error;

use crate::config::ConfigError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error(transparent)]
    Api(#[from] cloudenc::ApiError),

    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error("invalid override '{0}', expected KEY=VALUE")]
    InvalidOverride(String),

    #[error("the server did not assign an id to the created {0}")]
    MissingResourceId(&'static str),

    #[error("no RTMP input is provisioned for this account")]
    NoRtmpInput,

    #[error("unsupported HDR conversion from {input} to {output}")]
    UnsupportedHdrConversion { input: String, output: String },

    #[error("background task failed: {0}")]
    Join(#[from] tokio::task::JoinError),
}

pub type Result<T> = std::result::Result<T, AppError>;
