use std::io;
use std::path::PathBuf;

use crate::stream::Delimiter;

/// Everything that can stop a Lince run.
///
/// Each run surfaces at most one of these: the first failure halts execution.
#[derive(Debug, thiserror::Error)]
pub enum LinceError {
    /// A byte outside the instruction, comment and whitespace vocabulary.
    #[error("unknown character '{}' at byte {offset}", .byte.escape_ascii())]
    UnknownCharacter { byte: u8, offset: usize },

    /// A loop bracket or comment parenthesis without a partner.
    #[error("unmatched {delimiter} at byte {offset}")]
    UnmatchedDelimiter { offset: usize, delimiter: Delimiter },

    /// The data pointer left the tape; it has been clamped to `pointer`.
    #[error("tape pointer out of bounds at byte {offset} (clamped to cell {pointer})")]
    OutOfBounds { offset: usize, pointer: usize },

    /// The program text could not be loaded.
    #[error("could not open '{}': {source}", .path.display())]
    SourceUnavailable {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// Input or output failed while executing the byte at `offset`.
    #[error("I/O error at byte {offset}: {source}")]
    Unknown {
        offset: usize,
        #[source]
        source: io::Error,
    },
}

impl LinceError {
    /// Process exit status for this error; success is `0`.
    pub fn exit_code(&self) -> i32 {
        match self {
            LinceError::UnknownCharacter { .. } => 1,
            LinceError::UnmatchedDelimiter { .. } => 2,
            LinceError::OutOfBounds { .. } => 3,
            LinceError::SourceUnavailable { .. } => 4,
            LinceError::Unknown { .. } => 5,
        }
    }

    /// Byte offset into the program the error points at, when there is one.
    pub fn offset(&self) -> Option<usize> {
        match self {
            LinceError::UnknownCharacter { offset, .. }
            | LinceError::UnmatchedDelimiter { offset, .. }
            | LinceError::OutOfBounds { offset, .. }
            | LinceError::Unknown { offset, .. } => Some(*offset),
            LinceError::SourceUnavailable { .. } => None,
        }
    }
}
