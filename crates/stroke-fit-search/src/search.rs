use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::axis::GridAxis;
use crate::error::SearchError;
use crate::evaluator::LossEvaluator;
use crate::scan::scan_minimum;

/// Options for [`RefinementSearch`].
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct SearchOptions {
    /// Hard cap on refinement iterations.
    pub max_iterations: usize,
    /// Minimum loss improvement between iterations required to keep
    /// refining.
    pub convergence_threshold: f64,
}

impl Default for SearchOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10,
            convergence_threshold: 1e-3,
        }
    }
}

/// Why the search stopped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum StopReason {
    /// Loss improvement fell below the convergence threshold.
    Converged,
    /// A refined grid scored worse than the previous best (grid
    /// quantization); the previous result is returned.
    Regressed,
    /// The iteration cap was reached while the loss was still improving.
    IterationLimit,
}

/// Outcome of a refinement search.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct SearchResult {
    /// Best parameter vector found, one entry per grid axis.
    pub params: Vec<f64>,
    pub loss: f64,
    /// Number of full grid scans performed.
    pub iterations: usize,
    pub stop: StopReason,
}

/// Coarse-to-fine exhaustive search over a discretized parameter grid.
///
/// Each iteration scans the whole grid, then recenters every axis on the
/// winning coordinate with half the span and a quarter of that span as the
/// new step. The grid is threaded immutably from one iteration to the next;
/// nothing is refined in place.
#[derive(Clone, Copy, Debug, Default)]
pub struct RefinementSearch {
    options: SearchOptions,
}

impl RefinementSearch {
    pub fn new(options: SearchOptions) -> Self {
        Self { options }
    }

    #[inline]
    pub fn options(&self) -> &SearchOptions {
        &self.options
    }

    /// Run the search over `axes`.
    ///
    /// Stops on convergence, on regression, or at the iteration cap; when
    /// the cap is exhausted mid-descent the best result seen so far is
    /// returned.
    pub fn run<E>(&self, evaluator: &E, axes: &[GridAxis]) -> Result<SearchResult, SearchError>
    where
        E: LossEvaluator + ?Sized,
    {
        self.validate(axes)?;

        let mut grid: Vec<GridAxis> = axes.to_vec();
        let mut best: Option<(Vec<f64>, f64)> = None;

        for iteration in 1..=self.options.max_iterations {
            let (point, loss) = scan_minimum(evaluator, &grid)?;
            debug!("iteration {iteration}: loss {loss:.6e} at {point:?}");

            if let Some((best_point, best_loss)) = &best {
                if loss > *best_loss {
                    info!(
                        "iteration {iteration} regressed ({loss:.6e} > {best_loss:.6e}), \
                         keeping the previous result"
                    );
                    return Ok(SearchResult {
                        params: best_point.clone(),
                        loss: *best_loss,
                        iterations: iteration,
                        stop: StopReason::Regressed,
                    });
                }
                if *best_loss - loss < self.options.convergence_threshold {
                    info!("converged after {iteration} iterations at loss {loss:.6e}");
                    return Ok(SearchResult {
                        params: point,
                        loss,
                        iterations: iteration,
                        stop: StopReason::Converged,
                    });
                }
            }

            grid = grid
                .iter()
                .zip(point.iter())
                .map(|(axis, &center)| axis.refined(center))
                .collect();
            best = Some((point, loss));
        }

        // max_iterations >= 1, so at least one scan was accepted above
        let Some((params, loss)) = best else {
            return Err(SearchError::NoIterations);
        };
        info!(
            "iteration cap reached after {} scans at loss {loss:.6e}",
            self.options.max_iterations
        );
        Ok(SearchResult {
            params,
            loss,
            iterations: self.options.max_iterations,
            stop: StopReason::IterationLimit,
        })
    }

    fn validate(&self, axes: &[GridAxis]) -> Result<(), SearchError> {
        if axes.is_empty() {
            return Err(SearchError::EmptyGrid);
        }
        for (index, axis) in axes.iter().enumerate() {
            if !axis.is_valid() {
                return Err(SearchError::InvalidAxis {
                    index,
                    low: axis.low,
                    high: axis.high,
                    step: axis.step,
                });
            }
        }
        if self.options.max_iterations == 0 {
            return Err(SearchError::NoIterations);
        }
        let threshold = self.options.convergence_threshold;
        if !threshold.is_finite() || threshold <= 0.0 {
            return Err(SearchError::InvalidThreshold(threshold));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_empty_grid() {
        let search = RefinementSearch::default();
        let err = search.run(&|_: &[f64]| 0.0, &[]).unwrap_err();
        assert!(matches!(err, SearchError::EmptyGrid));
    }

    #[test]
    fn rejects_invalid_axis() {
        let search = RefinementSearch::default();
        let axes = [GridAxis::new(1.0, 0.0, 0.5)];
        let err = search.run(&|_: &[f64]| 0.0, &axes).unwrap_err();
        assert!(matches!(err, SearchError::InvalidAxis { index: 0, .. }));
    }

    #[test]
    fn rejects_zero_iterations() {
        let search = RefinementSearch::new(SearchOptions {
            max_iterations: 0,
            convergence_threshold: 1e-3,
        });
        let axes = [GridAxis::new(0.0, 1.0, 0.5)];
        let err = search.run(&|_: &[f64]| 0.0, &axes).unwrap_err();
        assert!(matches!(err, SearchError::NoIterations));
    }

    #[test]
    fn rejects_bad_threshold() {
        let search = RefinementSearch::new(SearchOptions {
            max_iterations: 10,
            convergence_threshold: 0.0,
        });
        let axes = [GridAxis::new(0.0, 1.0, 0.5)];
        let err = search.run(&|_: &[f64]| 0.0, &axes).unwrap_err();
        assert!(matches!(err, SearchError::InvalidThreshold(_)));
    }
}
