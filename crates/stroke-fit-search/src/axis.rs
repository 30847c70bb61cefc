use serde::{Deserialize, Serialize};

/// One discretized scan range: the inclusive interval `[low, high]` stepped
/// by `step`.
///
/// `GridAxis::new(0.0, 10.0, 5.0)` enumerates `0, 5, 10`. The upper bound is
/// reached within a small relative tolerance, so `(-0.3, 0.3, 0.2)` still
/// includes a value at (floating-point) `0.3`.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct GridAxis {
    pub low: f64,
    pub high: f64,
    pub step: f64,
}

impl GridAxis {
    pub fn new(low: f64, high: f64, step: f64) -> Self {
        Self { low, high, step }
    }

    /// Axis pinned to a single value; the search never moves it.
    pub fn single(value: f64) -> Self {
        Self {
            low: value,
            high: value,
            step: 1.0,
        }
    }

    /// Bounds ordered, step positive, everything finite.
    pub(crate) fn is_valid(&self) -> bool {
        self.low.is_finite()
            && self.high.is_finite()
            && self.step.is_finite()
            && self.low <= self.high
            && self.step > 0.0
    }

    /// Number of grid values on this axis (at least 1).
    pub fn num_values(&self) -> usize {
        let ratio = (self.high - self.low) / self.step;
        (ratio * (1.0 + 1e-12) + 1e-9).floor() as usize + 1
    }

    /// The `k`-th grid value, `low + k * step`.
    #[inline]
    pub fn value(&self, k: usize) -> f64 {
        self.low + k as f64 * self.step
    }

    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        (0..self.num_values()).map(|k| self.value(k))
    }

    /// Axis for the next refinement round: recentered on `center` with half
    /// the span and a quarter of that span as the new step.
    ///
    /// A zero-span (pinned) axis refines to itself, keeping its step
    /// positive.
    pub fn refined(&self, center: f64) -> GridAxis {
        let half = 0.5 * (self.high - self.low);
        if half == 0.0 {
            return GridAxis {
                low: center,
                high: center,
                step: self.step,
            };
        }
        let low = center - 0.5 * half;
        GridAxis {
            low,
            high: low + half,
            step: 0.25 * half,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn enumerates_inclusive_bounds() {
        let axis = GridAxis::new(0.0, 10.0, 5.0);
        let values: Vec<f64> = axis.values().collect();
        assert_eq!(values, vec![0.0, 5.0, 10.0]);
    }

    #[test]
    fn enumerates_partial_last_step() {
        let axis = GridAxis::new(0.0, 64.0, 21.0);
        let values: Vec<f64> = axis.values().collect();
        assert_eq!(values, vec![0.0, 21.0, 42.0, 63.0]);
    }

    #[test]
    fn inexact_bounds_still_reach_the_top() {
        // 0.6 / 0.2 lands just below 3.0 in floating point
        let axis = GridAxis::new(-0.3, 0.3, 0.2);
        assert_eq!(axis.num_values(), 4);
        let last = axis.value(3);
        assert_relative_eq!(last, 0.3, max_relative = 1e-9);
    }

    #[test]
    fn single_value_axis() {
        let axis = GridAxis::single(2.5);
        assert_eq!(axis.values().collect::<Vec<_>>(), vec![2.5]);
        assert!(axis.is_valid());
    }

    #[test]
    fn refined_axis_halves_the_span() {
        let axis = GridAxis::new(0.0, 10.0, 5.0);
        let refined = axis.refined(5.0);
        assert_eq!(refined.low, 2.5);
        assert_eq!(refined.high, 7.5);
        assert_eq!(refined.step, 1.25);
        assert_relative_eq!(
            refined.high - refined.low,
            0.5 * (axis.high - axis.low),
            max_relative = 1e-12
        );
    }

    #[test]
    fn refined_axis_contains_its_center() {
        let axis = GridAxis::new(-1.7, 1.7, 1.0);
        let center = axis.value(2);
        let refined = axis.refined(center);
        let hit = refined
            .values()
            .any(|v| (v - center).abs() < 1e-9 * (1.0 + center.abs()));
        assert!(hit, "refined axis should revisit the accepted point");
    }

    #[test]
    fn pinned_axis_refines_to_itself() {
        let axis = GridAxis::single(1.0);
        let refined = axis.refined(1.0);
        assert_eq!(refined, axis);
    }

    #[test]
    fn invalid_axes_are_rejected() {
        assert!(!GridAxis::new(1.0, 0.0, 0.5).is_valid());
        assert!(!GridAxis::new(0.0, 1.0, 0.0).is_valid());
        assert!(!GridAxis::new(0.0, 1.0, -0.5).is_valid());
        assert!(!GridAxis::new(0.0, f64::NAN, 0.5).is_valid());
        assert!(GridAxis::new(0.0, 1.0, 0.5).is_valid());
    }
}
