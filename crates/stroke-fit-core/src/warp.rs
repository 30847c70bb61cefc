use nalgebra::Vector3;

use crate::raster::{sample_bilinear_u8, GrayRaster, GrayRasterView};
use crate::transform::TraceTransform;

/// Warp a grayscale raster by an affine stroke transform.
///
/// For each output pixel center, map back through the inverted transform and
/// bilinear-sample the source (out-of-bounds reads as 0). The linear part of
/// the transform is anchored at the source raster center.
///
/// Returns `None` when the transform is singular (e.g. a zero scale).
pub fn warp_affine_gray(
    src: &GrayRasterView<'_>,
    transform: &TraceTransform,
    out_w: usize,
    out_h: usize,
) -> Option<GrayRaster> {
    let cx = src.width as f64 * 0.5;
    let cy = src.height as f64 * 0.5;
    let inv = transform.matrix(cx, cy).try_inverse()?;

    let mut out = vec![0u8; out_w * out_h];
    for y in 0..out_h {
        for x in 0..out_w {
            // pixel center in output space -> source space
            let q = Vector3::new(x as f64 + 0.5, y as f64 + 0.5, 1.0);
            let p = inv * q;
            let v = sample_bilinear_u8(src, (p.x - 0.5) as f32, (p.y - 0.5) as f32);
            out[y * out_w + x] = v;
        }
    }

    Some(GrayRaster {
        width: out_w,
        height: out_h,
        data: out,
    })
}
