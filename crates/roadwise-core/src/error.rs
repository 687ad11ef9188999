/// Knowledge-base construction errors.
///
/// All of these surface when the knowledge base is built, never mid-ranking:
/// the scoring path is infallible for any record that made it past
/// construction.

#[derive(Debug, thiserror::Error)]
pub enum KbError {
    #[error("knowledge base has no intervention records")]
    Empty,

    #[error("duplicate intervention id: {0}")]
    DuplicateId(u32),

    #[error("intervention {0} has no issue keywords")]
    NoIssueKeywords(u32),

    #[error("failed to read knowledge base at {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid knowledge base JSON: {0}")]
    Parse(#[from] serde_json::Error),
}
