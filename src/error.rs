use thiserror::Error;

/// Fatal extraction failures. Every kind aborts the book or document
/// being processed; callers log and move on to the next book.
#[derive(Debug, Error)]
pub enum ExtractError {
    /// A headerless fragment could not be attached anywhere: either a
    /// missing chapter numeral had to be inferred from a non-numeric
    /// predecessor, or a continuation chapter had no predecessor at all.
    #[error("ambiguous continuation: {0}")]
    AmbiguousContinuation(String),

    /// A header, sequence or title marker was recognized but the block
    /// stream ended before the required follow-up element.
    #[error("unterminated header: {0}")]
    UnterminatedHeader(String),

    /// Navigation resolution yielded no usable chapter descriptors.
    #[error("no usable navigation entries found")]
    EmptyNavigation,

    /// A finalized chapter is missing a required field.
    #[error("incomplete chapter (missing {field}): seq={seq:?}, title={title:?}")]
    IncompleteChapter {
        field: &'static str,
        seq: String,
        title: String,
    },

    /// The merged chapter sequence is not monotonic under the chapter
    /// ordering key.
    #[error("chapter is out of order: seq={seq:?}, title={title:?}")]
    OutOfOrder { seq: String, title: String },
}
