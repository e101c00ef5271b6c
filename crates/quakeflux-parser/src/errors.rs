use std::path::PathBuf;

use thiserror::Error;

#[derive(Debug, Error)]
pub enum ParserError {
    #[error("no extract matching '{pattern}' found in {}", dir.display())]
    NoExtractFound { dir: PathBuf, pattern: String },

    #[error("invalid extract pattern: {0}")]
    Pattern(#[from] glob::PatternError),

    #[error("failed to read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("extract has no header row")]
    MissingHeader,

    #[error("extract header is missing required column '{column}'")]
    MissingColumn { column: &'static str },
}
