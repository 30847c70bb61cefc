//! High-level facade crate for the `stroke-fit-*` workspace.
//!
//! ## API map
//! - [`core`]: grayscale rasters, the 8-parameter stroke transform, affine
//!   warping and the absolute-difference loss.
//! - [`search`]: the iterative grid refinement search.
//! - [`dataset`]: batch normalization of raw stroke captures.
//! - [`fit`] (feature `image`, on by default): end-to-end raster fitting
//!   with `image`-crate adapters.
//!
//! ## Quickstart
//!
//! ```
//! use stroke_fit::{GridAxis, RefinementSearch, SearchOptions};
//!
//! let axes = [GridAxis::new(-4.0, 4.0, 2.0), GridAxis::new(-4.0, 4.0, 2.0)];
//! let quadratic = |p: &[f64]| (p[0] - 1.0).powi(2) + (p[1] + 2.0).powi(2);
//!
//! let result = RefinementSearch::new(SearchOptions::default())
//!     .run(&quadratic, &axes)
//!     .expect("valid grid");
//! assert!(result.loss < 0.5);
//! ```

pub use stroke_fit_core as core;
pub use stroke_fit_dataset as dataset;
pub use stroke_fit_search as search;

pub use stroke_fit_core::{GrayRaster, GrayRasterView, TraceTransform};
pub use stroke_fit_search::{
    GridAxis, RefinementSearch, SearchOptions, SearchResult, StopReason, TraceFit,
};

#[cfg(feature = "image")]
pub mod fit;
