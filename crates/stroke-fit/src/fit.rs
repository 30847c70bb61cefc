//! End-to-end raster fitting helpers.
//!
//! [`RasterDiffLoss`] scores a candidate transform by warping a source
//! raster and summing absolute pixel differences against a target raster —
//! the loss of the originating robot-handwriting fit. External trace
//! renderers can plug into the search directly through
//! [`stroke_fit_search::LossEvaluator`] instead.

use stroke_fit_core::{
    absolute_difference, warp_affine_gray, GrayRaster, GrayRasterView, TraceTransform, PARAM_COUNT,
};
use stroke_fit_search::{
    fit_trace, trace_search_axes, GridAxis, LossEvaluator, SearchError, SearchOptions, TraceFit,
};

/// Errors produced by the high-level fit helpers.
#[derive(thiserror::Error, Debug)]
pub enum FitError {
    #[error(transparent)]
    Search(#[from] SearchError),
}

/// Warp-and-compare loss evaluator over the 8-slot parameter layout.
///
/// The source raster is warped into the target's dimensions, so the two may
/// differ in size. Candidates with a singular transform score non-finite
/// and drop out of the scan. The height-bias slot is inert on a 2D raster.
pub struct RasterDiffLoss<'a> {
    source: GrayRasterView<'a>,
    target: GrayRasterView<'a>,
}

impl<'a> RasterDiffLoss<'a> {
    pub fn new(source: GrayRasterView<'a>, target: GrayRasterView<'a>) -> Self {
        Self { source, target }
    }
}

impl LossEvaluator for RasterDiffLoss<'_> {
    fn loss(&self, params: &[f64]) -> f64 {
        let Some(transform) = TraceTransform::from_slice(params) else {
            return f64::INFINITY;
        };
        let Some(warped) = warp_affine_gray(
            &self.source,
            &transform,
            self.target.width,
            self.target.height,
        ) else {
            return f64::INFINITY;
        };
        match absolute_difference(&warped.view(), &self.target) {
            Ok(sad) => sad as f64,
            Err(_) => f64::INFINITY,
        }
    }
}

/// Fit a stroke transform mapping `source` onto `target` over the given
/// 8-axis grid.
pub fn fit_raster(
    source: &GrayRasterView<'_>,
    target: &GrayRasterView<'_>,
    axes: &[GridAxis; PARAM_COUNT],
    options: SearchOptions,
) -> Result<TraceFit, FitError> {
    let loss = RasterDiffLoss::new(*source, *target);
    Ok(fit_trace(&loss, axes, options)?)
}

/// [`fit_raster`] over the canonical trace grid for the target's size.
pub fn fit_raster_default(
    source: &GrayRasterView<'_>,
    target: &GrayRasterView<'_>,
    options: SearchOptions,
) -> Result<TraceFit, FitError> {
    let axes = trace_search_axes(target.width, target.height);
    fit_raster(source, target, &axes, options)
}

/// Borrow an `image::GrayImage` as a core raster view.
pub fn gray_view(img: &image::GrayImage) -> GrayRasterView<'_> {
    GrayRasterView {
        width: img.width() as usize,
        height: img.height() as usize,
        data: img.as_raw(),
    }
}

/// Convert an owned core raster into an `image::GrayImage`.
///
/// `None` only when the raster dimensions do not fit the image crate's
/// `u32` sizes.
pub fn to_gray_image(raster: &GrayRaster) -> Option<image::GrayImage> {
    let width = u32::try_from(raster.width).ok()?;
    let height = u32::try_from(raster.height).ok()?;
    image::GrayImage::from_raw(width, height, raster.data.clone())
}
