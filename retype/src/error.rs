use thiserror::Error;

/// A rejected session operation
///
/// These are precondition violations. A rejected operation never changes the state
/// of the session.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum SessionError {
    #[error("Practice mode is already active")]
    AlreadyActive,

    #[error("Practice mode is not active")]
    NotActive,

    #[error("There is no text left to practice from offset {offset}")]
    NothingToPractice { offset: usize },

    #[error("Start offset {offset} is beyond the end of the document ({len} characters)")]
    StartOutOfRange { offset: usize, len: usize },
}
