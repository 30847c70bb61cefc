//! Coarse-to-fine grid refinement search for stroke transform fitting.
//!
//! The search exhaustively scores every point of a discretized parameter
//! grid, recenters the grid on the best point with half the span, and
//! repeats until the loss stops improving.
//!
//! ## Quickstart
//!
//! ```
//! use stroke_fit_search::{GridAxis, RefinementSearch, SearchOptions};
//!
//! let axes = [GridAxis::new(0.0, 10.0, 5.0)];
//! let search = RefinementSearch::new(SearchOptions::default());
//! let result = search
//!     .run(&|p: &[f64]| (p[0] - 3.0).powi(2), &axes)
//!     .expect("valid grid");
//! assert!((result.params[0] - 3.0).abs() < 0.5);
//! ```
//!
//! Per iteration:
//! 1. Evaluate the loss at every point of the axes' Cartesian product.
//! 2. Take the minimum-loss point (ties keep the first point scanned, so
//!    runs are reproducible).
//! 3. Stop on regression or when the improvement falls below the
//!    convergence threshold; otherwise refine every axis around the winner
//!    and scan again.

mod axis;
mod error;
mod evaluator;
mod scan;
mod search;
mod trace;

pub use axis::GridAxis;
pub use error::SearchError;
pub use evaluator::LossEvaluator;
pub use scan::{scan_minimum, GridPoints};
pub use search::{RefinementSearch, SearchOptions, SearchResult, StopReason};
pub use trace::{fit_trace, trace_search_axes, TraceFit};
