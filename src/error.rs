use std::io;

use thiserror::Error;

use crate::TermInt;

#[derive(Debug, Error)]
pub enum SnekError {
    #[error("terminal I/O failed: {0}")]
    Io(#[from] io::Error),
    #[error("terminal of {height}x{width} cells leaves no room to play (need at least 2 free cells)")]
    BoardTooSmall { height: TermInt, width: TermInt },
}

pub type Result<T, E = SnekError> = std::result::Result<T, E>;
