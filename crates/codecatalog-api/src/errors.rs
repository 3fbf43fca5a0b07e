use std::path::PathBuf;
use thiserror::Error;

/// Errors that abandon a whole file
#[derive(Error, Debug)]
pub enum ParserError {
    /// Failed to read file
    #[error("IO error reading {0}: {1}")]
    IoError(PathBuf, #[source] std::io::Error),

    /// File too large
    #[error("File {0} exceeds maximum size ({1} bytes)")]
    FileTooLarge(PathBuf, usize),

    /// Generic parsing error
    #[error("Parse error in {0}: {1}")]
    ParseError(PathBuf, String),
}

/// Result type for parser operations
pub type ParserResult<T> = Result<T, ParserError>;

/// Why a single candidate (function, struct, member) produced nothing.
///
/// Per-candidate steps return `Result<T, SkipReason>` so the caller can
/// count what was dropped without aborting the enclosing file.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SkipReason {
    /// A `;` was reached before any `{`: a prototype, not a definition
    #[error("declaration without a body")]
    DeclarationOnly,

    /// The parameter list never closed
    #[error("unbalanced parentheses in parameter list")]
    UnbalancedParens,

    /// Brace depth never returned to zero
    #[error("unbalanced braces in body")]
    UnbalancedBraces,

    /// Neither `{` nor `;` before end of input
    #[error("no body before end of input")]
    MissingBody,

    /// Struct with neither a tag nor an alias
    #[error("anonymous struct")]
    AnonymousStruct,

    /// Something other than `[marker] [alias];` followed the struct body
    #[error("unexpected text after struct body")]
    MalformedTail,

    /// Name is on the configured deny-list
    #[error("'{0}' is on the ignored-calls list")]
    DeniedName(String),

    /// Member line did not match the member grammar
    #[error("member line did not match: {0}")]
    MemberMismatch(String),

    /// Structural facts could not be encoded into metadata
    #[error("metadata encoding failed: {0}")]
    Metadata(String),
}

impl From<serde_json::Error> for SkipReason {
    fn from(err: serde_json::Error) -> Self {
        SkipReason::Metadata(err.to_string())
    }
}
