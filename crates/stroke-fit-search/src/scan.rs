use log::debug;

use crate::axis::GridAxis;
use crate::error::SearchError;
use crate::evaluator::LossEvaluator;

/// Lazy, restartable enumeration of the Cartesian product of a set of axes.
///
/// Points are visited in odometer order with the last axis fastest, so the
/// sequence is fixed for a given grid and ties can be broken by first
/// encounter.
#[derive(Clone, Debug)]
pub struct GridPoints<'a> {
    axes: &'a [GridAxis],
    sizes: Vec<usize>,
    index: usize,
    total: usize,
}

impl<'a> GridPoints<'a> {
    pub fn new(axes: &'a [GridAxis]) -> Self {
        let sizes: Vec<usize> = axes.iter().map(GridAxis::num_values).collect();
        let total = if axes.is_empty() {
            0
        } else {
            sizes.iter().product()
        };
        Self {
            axes,
            sizes,
            index: 0,
            total,
        }
    }

    fn point(&self, mut index: usize) -> Vec<f64> {
        let mut out = vec![0.0; self.axes.len()];
        for j in (0..self.axes.len()).rev() {
            let digit = index % self.sizes[j];
            index /= self.sizes[j];
            out[j] = self.axes[j].value(digit);
        }
        out
    }
}

impl Iterator for GridPoints<'_> {
    type Item = Vec<f64>;

    fn next(&mut self) -> Option<Vec<f64>> {
        if self.index >= self.total {
            return None;
        }
        let p = self.point(self.index);
        self.index += 1;
        Some(p)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let left = self.total - self.index;
        (left, Some(left))
    }
}

impl ExactSizeIterator for GridPoints<'_> {}

/// Exhaustively score every grid point and return the minimum-loss one.
///
/// Ties keep the first point in enumeration order. Points with a non-finite
/// loss are skipped; if no point scores finite, the scan fails.
pub fn scan_minimum<E>(evaluator: &E, axes: &[GridAxis]) -> Result<(Vec<f64>, f64), SearchError>
where
    E: LossEvaluator + ?Sized,
{
    let mut best: Option<(Vec<f64>, f64)> = None;
    let mut skipped = 0usize;

    for point in GridPoints::new(axes) {
        let loss = evaluator.loss(&point);
        if !loss.is_finite() {
            skipped += 1;
            continue;
        }
        let better = match &best {
            Some((_, best_loss)) => loss < *best_loss,
            None => true,
        };
        if better {
            best = Some((point, loss));
        }
    }

    if skipped > 0 {
        debug!("scan skipped {skipped} grid points with non-finite loss");
    }
    best.ok_or(SearchError::NoFiniteLoss)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn visits_the_full_cartesian_product() {
        let axes = [GridAxis::new(0.0, 1.0, 1.0), GridAxis::new(0.0, 2.0, 1.0)];
        let points: Vec<Vec<f64>> = GridPoints::new(&axes).collect();
        assert_eq!(
            points,
            vec![
                vec![0.0, 0.0],
                vec![0.0, 1.0],
                vec![0.0, 2.0],
                vec![1.0, 0.0],
                vec![1.0, 1.0],
                vec![1.0, 2.0],
            ]
        );
    }

    #[test]
    fn len_is_the_product_of_axis_sizes() {
        let axes = [
            GridAxis::new(0.0, 3.0, 1.0),
            GridAxis::new(0.0, 1.0, 1.0),
            GridAxis::single(5.0),
        ];
        assert_eq!(GridPoints::new(&axes).len(), 8);
    }

    #[test]
    fn no_axes_means_no_points() {
        assert_eq!(GridPoints::new(&[]).count(), 0);
    }

    #[test]
    fn restarting_reproduces_the_sequence() {
        let axes = [GridAxis::new(0.0, 2.0, 1.0)];
        let first: Vec<Vec<f64>> = GridPoints::new(&axes).collect();
        let second: Vec<Vec<f64>> = GridPoints::new(&axes).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn minimum_breaks_ties_by_first_point() {
        let axes = [GridAxis::new(0.0, 3.0, 1.0)];
        // 1 and 2 tie on loss; the scan must keep 1
        let (point, loss) = scan_minimum(&|p: &[f64]| (p[0] - 1.5).abs(), &axes).unwrap();
        assert_eq!(point, vec![1.0]);
        assert_eq!(loss, 0.5);
    }

    #[test]
    fn non_finite_losses_are_skipped() {
        let axes = [GridAxis::new(0.0, 2.0, 1.0)];
        let eval = |p: &[f64]| {
            if p[0] == 0.0 {
                f64::NAN
            } else {
                p[0]
            }
        };
        let (point, loss) = scan_minimum(&eval, &axes).unwrap();
        assert_eq!(point, vec![1.0]);
        assert_eq!(loss, 1.0);
    }

    #[test]
    fn all_non_finite_losses_fail() {
        let axes = [GridAxis::new(0.0, 2.0, 1.0)];
        let err = scan_minimum(&|_: &[f64]| f64::INFINITY, &axes).unwrap_err();
        assert!(matches!(err, SearchError::NoFiniteLoss));
    }
}
