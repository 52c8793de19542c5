use thiserror::Error;

/// Errors produced while loading and processing source text.
#[derive(Debug, Error)]
pub enum AsciagramError {
    /// The source text contained no visible characters.
    #[error("source text contains no visible characters")]
    EmptyGrid,

    /// Reading the source failed.
    #[error("failed to read source")]
    Io(#[from] std::io::Error),
}
