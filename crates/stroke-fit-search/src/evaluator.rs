/// Black-box loss over a parameter vector; lower is better.
///
/// Evaluators must be deterministic for the search to be reproducible, and
/// should return a non-negative score. A non-finite score marks the point as
/// unusable and it is skipped by the scan.
pub trait LossEvaluator {
    fn loss(&self, params: &[f64]) -> f64;
}

impl<F> LossEvaluator for F
where
    F: Fn(&[f64]) -> f64,
{
    fn loss(&self, params: &[f64]) -> f64 {
        self(params)
    }
}
