use std::error::Error as StdError;

/// The error kinds described in spec §7. `ShortcutMiss` is deliberately
/// absent: an unresolved shortcut token is not an error, it passes
/// through unchanged.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum SparqlDbError {
    /// An algebra node outside the supported closed set (spec §4.C).
    #[error("unsupported SPARQL algebra node: {0}")]
    UnsupportedAlgebra(String),

    /// A FILTER expression node outside §4.D, or `LANG` applied to a
    /// non-variable argument.
    #[error("unsupported SPARQL expression: {0}")]
    UnsupportedExpression(String),

    /// The SPARQL parser or the RDF import parser rejected the input.
    #[error("malformed input: {0}")]
    MalformedInput(#[source] Box<dyn StdError + Send + Sync + 'static>),

    /// The backing SQL engine returned an error.
    #[error("backing store error: {0}")]
    BackingStore(#[from] sqlx::Error),

    /// An HTTP failure while fetching from an LDF endpoint. Per spec
    /// §7 this only covers connection-level failures; a non-200
    /// response ends pagination but is not surfaced as an error.
    #[error("LDF fetch failed: {0}")]
    RemoteFetch(#[from] reqwest::Error),
}

impl SparqlDbError {
    pub fn malformed_input(source: impl StdError + Send + Sync + 'static) -> Self {
        Self::MalformedInput(Box::new(source))
    }
}

pub type Result<T> = std::result::Result<T, SparqlDbError>;
