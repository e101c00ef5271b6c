use thiserror::Error;

/// Failures that stop a pipeline run before any output is produced. Storage failures
/// while publishing are reported separately as `OutputError`.
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("invalid pipeline options: {0}")]
    InvalidOptions(String),

    #[error("partition worker {0} panicked")]
    WorkerPanicked(usize),
}

pub type Result<T> = std::result::Result<T, PipelineError>;
