use nalgebra::{Matrix2, Matrix3, Vector2};
use serde::{Deserialize, Serialize};

/// Number of parameter slots in a [`TraceTransform`].
pub const PARAM_COUNT: usize = 8;

/// Affine stroke transform: translation, rotation, scale and shear on the
/// writing plane, plus a pen-height bias used by 3D trace players.
///
/// The flat layout (see [`TraceTransform::to_array`]) is a contract with the
/// loss evaluators: translate-x, translate-y, angle (radians), scale-x,
/// scale-y, shear-x, shear-y, height-bias, in that order.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct TraceTransform {
    pub translate_x: f64,
    pub translate_y: f64,
    /// Rotation about the raster center, radians.
    pub angle: f64,
    pub scale_x: f64,
    pub scale_y: f64,
    pub shear_x: f64,
    pub shear_y: f64,
    /// Pen height offset for 3D trace playback; inert on a 2D raster.
    pub height_bias: f64,
}

impl TraceTransform {
    pub const IDENTITY: TraceTransform = TraceTransform {
        translate_x: 0.0,
        translate_y: 0.0,
        angle: 0.0,
        scale_x: 1.0,
        scale_y: 1.0,
        shear_x: 0.0,
        shear_y: 0.0,
        height_bias: 0.0,
    };

    pub fn from_array(p: [f64; PARAM_COUNT]) -> Self {
        Self {
            translate_x: p[0],
            translate_y: p[1],
            angle: p[2],
            scale_x: p[3],
            scale_y: p[4],
            shear_x: p[5],
            shear_y: p[6],
            height_bias: p[7],
        }
    }

    /// `None` unless the slice has exactly [`PARAM_COUNT`] entries.
    pub fn from_slice(p: &[f64]) -> Option<Self> {
        let arr: [f64; PARAM_COUNT] = p.try_into().ok()?;
        Some(Self::from_array(arr))
    }

    pub fn to_array(self) -> [f64; PARAM_COUNT] {
        [
            self.translate_x,
            self.translate_y,
            self.angle,
            self.scale_x,
            self.scale_y,
            self.shear_x,
            self.shear_y,
            self.height_bias,
        ]
    }

    /// Homogeneous 2D matrix mapping source pixel coordinates to transformed
    /// coordinates. Rotation, shear and scale are anchored at `(cx, cy)`:
    /// `p' = A (p - c) + c + t` with `A = R(angle) · Shear · Scale`.
    pub fn matrix(&self, cx: f64, cy: f64) -> Matrix3<f64> {
        let (sin, cos) = self.angle.sin_cos();
        let rot = Matrix2::new(cos, -sin, sin, cos);
        let shear = Matrix2::new(1.0, self.shear_x, self.shear_y, 1.0);
        let scale = Matrix2::new(self.scale_x, 0.0, 0.0, self.scale_y);
        let a = rot * shear * scale;

        let center = Vector2::new(cx, cy);
        let t = Vector2::new(self.translate_x, self.translate_y) + center - a * center;

        Matrix3::new(
            a[(0, 0)],
            a[(0, 1)],
            t.x,
            a[(1, 0)],
            a[(1, 1)],
            t.y,
            0.0,
            0.0,
            1.0,
        )
    }
}

impl Default for TraceTransform {
    fn default() -> Self {
        Self::IDENTITY
    }
}
