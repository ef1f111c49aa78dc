use crate::DocId;
use thiserror::Error;

/// Validation failures raised by the search server before any state changes.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SearchError {
    /// A document or stop word contains a control character.
    #[error("word {0:?} is invalid")]
    InvalidTerm(String),

    /// Empty query word, a bare `-`, a `--` prefix, or a control character.
    #[error("query word {0:?} is invalid")]
    InvalidQueryTerm(String),

    /// The id is negative or already taken.
    #[error("invalid document id {0}: negative or already present")]
    DuplicateId(DocId),

    #[error("document {0} not found")]
    UnknownDocument(DocId),
}

pub type Result<T> = std::result::Result<T, SearchError>;
