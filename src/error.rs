/// Errors raised while parsing Markdown or serializing the HTML tree
use thiserror::Error;

use crate::span::SpanKind;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum Error {
    // Inline parsing
    #[error("Invalid Markdown syntax: closing delimiter `{delimiter}` missing")]
    UnbalancedDelimiter { delimiter: String },
    #[error("Invalid Markdown syntax: reference `{markup}` not closed properly")]
    MalformedReference { markup: String },

    // Span conversion
    #[error("{kind} spans must have a target URL")]
    MissingTarget { kind: SpanKind },
    #[error("Unknown span kind: {0}")]
    UnknownSpanKind(String),

    // Block construction
    #[error("Invalid header syntax: {hashes} `#` characters (at most 6 allowed)")]
    InvalidHeaderSyntax { hashes: usize },
    #[error("Invalid quote syntax: line does not start with '>': {line:?}")]
    InvalidQuoteSyntax { line: String },
    #[error("Invalid list syntax: {line:?}")]
    InvalidListSyntax { line: String },

    // Serialization
    #[error("All leaf nodes must have content")]
    EmptyLeafContent,
    #[error("All parent nodes must have a tag")]
    MissingParentTag,
    #[error("Parent node <{tag}> must have at least one child")]
    NoChildren { tag: String },

    // Page assembly
    #[error("Document has no level-1 header to use as a title")]
    MissingTitle,
}
