use std::io;

use thiserror::Error;

use crate::clipboard::ClipboardError;

#[derive(Debug, Error)]
pub enum ConsoleError {
    #[error("missing console node: {0}")]
    MissingTarget(&'static str),
    #[error("unknown theme `{0}` (expected light, dark or colorful)")]
    UnknownTheme(String),
    #[error("clipboard: {0}")]
    Clipboard(#[from] ClipboardError),
    #[error(transparent)]
    Io(#[from] io::Error),
}
