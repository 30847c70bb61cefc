use serde::{Deserialize, Serialize};
use stroke_fit_core::{TraceTransform, PARAM_COUNT};

use crate::axis::GridAxis;
use crate::error::SearchError;
use crate::evaluator::LossEvaluator;
use crate::search::{RefinementSearch, SearchOptions, StopReason};

/// Canonical first-round search grid for fitting a stroke trace onto a
/// `width`×`height` target raster: translation up to a quarter of the
/// raster, roughly ±97° of rotation, 0.5–2× scale, mild shear, and one unit
/// of pen-height bias. Every axis stays at four steps or fewer, which keeps
/// the exhaustive scan tractable.
pub fn trace_search_axes(width: usize, height: usize) -> [GridAxis; PARAM_COUNT] {
    let tx_hi = height / 4;
    let ty_hi = width / 4;
    let tx_step = (tx_hi / 3).max(1) as f64;
    let ty_step = (ty_hi / 3).max(1) as f64;

    [
        GridAxis::new(0.0, tx_hi as f64, tx_step),
        GridAxis::new(0.0, ty_hi as f64, ty_step),
        GridAxis::new(-1.7, 1.7, 1.0),
        GridAxis::new(0.5, 2.0, 0.5),
        GridAxis::new(0.5, 2.0, 0.5),
        GridAxis::new(-0.3, 0.3, 0.2),
        GridAxis::new(-0.3, 0.3, 0.2),
        GridAxis::new(-1.0, 1.0, 0.8),
    ]
}

/// A fitted stroke transform with its search diagnostics.
#[derive(Clone, Copy, Debug, Serialize, Deserialize)]
pub struct TraceFit {
    pub transform: TraceTransform,
    pub loss: f64,
    pub iterations: usize,
    pub stop: StopReason,
}

/// Run the refinement search over an 8-axis trace grid and return the
/// winning transform.
pub fn fit_trace<E>(
    evaluator: &E,
    axes: &[GridAxis; PARAM_COUNT],
    options: SearchOptions,
) -> Result<TraceFit, SearchError>
where
    E: LossEvaluator + ?Sized,
{
    let result = RefinementSearch::new(options).run(evaluator, axes)?;
    let mut params = [0.0; PARAM_COUNT];
    params.copy_from_slice(&result.params);
    Ok(TraceFit {
        transform: TraceTransform::from_array(params),
        loss: result.loss,
        iterations: result.iterations,
        stop: result.stop,
    })
}
