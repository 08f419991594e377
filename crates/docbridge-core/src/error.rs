use thiserror::Error;

/// Errors that can occur in the document store engine.
#[derive(Error, Debug)]
pub enum StoreError {
    /// Unresolved path, or a section/block/row index out of range.
    #[error("not found: {0}")]
    NotFound(String),

    /// Empty or non-rectangular data matrix, malformed path or range.
    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    /// Opaque backend failure, passed through uninterpreted and never retried.
    #[error("backend error: {0}")]
    Backend(#[from] anyhow::Error),

    /// Reserved. No optimistic-concurrency check exists; concurrent writers
    /// silently overwrite each other.
    #[error("conflict: {0}")]
    Conflict(String),
}

impl StoreError {
    /// Wrap an arbitrary backend error without interpreting it.
    pub fn backend<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        StoreError::Backend(anyhow::Error::new(err))
    }
}
