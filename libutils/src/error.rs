use std::io;

use crate::base64::DecodeError;
use crate::list::ListError;

#[derive(Debug, thiserror::Error)]
pub enum UtilsError {
    #[error("list error: {0}")]
    List(#[from] ListError),

    #[error("base64 decode error: {0}")]
    Decode(#[from] DecodeError),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, UtilsError>;
