use pickup_core::error::ConfigError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum ExperimentError {
    #[error("invalid simulation parameters: {0}")]
    Config(#[from] ConfigError),
    #[error("no results to export")]
    NoResults,
    #[error("results length ({results}) doesn't match {other} length ({expected})")]
    LengthMismatch {
        results: usize,
        other: &'static str,
        expected: usize,
    },
    #[error("thread pool: {0}")]
    ThreadPool(#[from] rayon::ThreadPoolBuildError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
    #[error(transparent)]
    Json(#[from] serde_json::Error),
    #[error(transparent)]
    Csv(#[from] csv::Error),
}
