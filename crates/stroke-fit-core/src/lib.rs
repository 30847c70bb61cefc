//! Core types for stroke fitting: grayscale rasters, the 8-parameter stroke
//! transform, affine warping and the absolute-difference loss.
//!
//! This crate is intentionally small and codec-free. Image file I/O lives at
//! the edges of the workspace (`stroke-fit-dataset`, the `stroke-fit` facade
//! and the CLI).

mod logger;
mod raster;
mod transform;
mod warp;

#[cfg(feature = "tracing")]
pub use logger::init_tracing;
pub use logger::init_with_level;

pub use raster::{
    absolute_difference, sample_bilinear, sample_bilinear_u8, GrayRaster, GrayRasterView,
    RasterError,
};
pub use transform::{TraceTransform, PARAM_COUNT};
pub use warp::warp_affine_gray;
