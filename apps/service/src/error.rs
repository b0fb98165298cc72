use std::io::Error as IoError;

use thiserror::Error;

use crate::config;
use crate::ip_guard::IpMismatch;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("{0:#}")]
    Io(#[from] IoError),
    #[error("configuration error: {0}")]
    Config(#[from] config::Error),
    #[error("{0}")]
    IpGuard(#[from] IpMismatch),
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
