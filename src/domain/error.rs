//! Domain-level errors (no external dependencies)

use thiserror::Error;

/// Domain errors represent violations of the decision tree's rules.
/// These are independent of files, config and the command line.
#[derive(Error, Debug)]
pub enum DomainError {
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("malformed transcript at line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },

    #[error("truncated transcript: input ended after {lines} line(s) with subtrees still missing")]
    TruncatedTranscript { lines: usize },

    #[error("empty transcript: no Q:/A: lines found")]
    EmptyTranscript,

    #[error("unexpected content after complete tree at line {line}")]
    TrailingContent { line: usize },

    #[error("console I/O failed: {0}")]
    Console(#[source] std::io::Error),

    #[error("transcript I/O failed: {0}")]
    Transcript(#[source] std::io::Error),
}

impl DomainError {
    /// True for every way a transcript can violate the `Q:`/`A:` grammar.
    pub fn is_format_error(&self) -> bool {
        matches!(
            self,
            DomainError::MalformedLine { .. }
                | DomainError::TruncatedTranscript { .. }
                | DomainError::EmptyTranscript
                | DomainError::TrailingContent { .. }
        )
    }

    pub(crate) fn malformed(line: usize, reason: impl Into<String>) -> Self {
        DomainError::MalformedLine {
            line,
            reason: reason.into(),
        }
    }
}

/// Result type for domain operations.
pub type DomainResult<T> = Result<T, DomainError>;
