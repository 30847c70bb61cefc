/// Errors returned by the refinement search.
#[derive(thiserror::Error, Debug)]
pub enum SearchError {
    #[error("search grid has no axes")]
    EmptyGrid,
    #[error("invalid axis {index}: low={low}, high={high}, step={step}")]
    InvalidAxis {
        index: usize,
        low: f64,
        high: f64,
        step: f64,
    },
    #[error("max_iterations must be at least 1")]
    NoIterations,
    #[error("convergence threshold must be positive and finite, got {0}")]
    InvalidThreshold(f64),
    #[error("no grid point produced a finite loss")]
    NoFiniteLoss,
}
