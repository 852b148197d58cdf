use crate::errors::ValidationError;

use super::vector_interpolator::{ExtrapolationMode, InterpolatorBase, InterpolatorKind, ScalarInterpolator, VectorInterpolator};

///
/// Piecewise linear interpolation. Extrapolation continues the first or last segment.
///
#[derive(Clone, Debug, PartialEq)]
pub struct LinearInterpolator(pub(crate) InterpolatorBase<f64>);

impl LinearInterpolator
{
    pub const MIN_POINTS: usize = 2;

    pub fn new(x: Vec<f64>, y: Vec<f64>, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError>
    {
        Ok(Self(InterpolatorBase::new(x, y, extrapolation_mode, Self::MIN_POINTS)?))
    }
}

impl VectorInterpolator for LinearInterpolator
{
    type Input = f64;
    type Value = f64;
    type Output = f64;

    const KIND: InterpolatorKind = InterpolatorKind::Linear;

    fn base(&self) -> &InterpolatorBase<f64> {
        &self.0
    }

    fn base_mut(&mut self) -> &mut InterpolatorBase<f64> {
        &mut self.0
    }

    fn to_value(&self, input: f64) -> f64 {
        input
    }

    fn sample(&self, index: usize) -> f64 {
        self.0.store.y()[index]
    }

    #[inline]
    fn interpolate_segment(&self, lower: usize, target: f64) -> f64 {
        let x = self.0.store.x();
        let y = self.0.store.y();
        y[lower] + (target - x[lower]) * (y[lower + 1] - y[lower]) / (x[lower + 1] - x[lower])
    }

    fn undefined(&self) -> f64 {
        f64::NAN
    }
}

impl ScalarInterpolator for LinearInterpolator
{
    fn from_data(x: Vec<f64>, y: Vec<f64>, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError> {
        Self::new(x, y, extrapolation_mode)
    }
}

#[cfg(test)]
fn reference(mode: ExtrapolationMode) -> LinearInterpolator
{
    LinearInterpolator::new(vec![-10.0, -5.0, 0.0, 6.0, 12.0], vec![1.0, 0.0, 1.0, 0.0, -1.0], mode).unwrap()
}

#[test]
fn check_linear_values()
{
    use approx::assert_relative_eq;
    let interp = reference(ExtrapolationMode::Fail);
    assert_relative_eq!(interp.interpolate(-7.6).unwrap(), 0.52, epsilon = 1e-12);
    assert_relative_eq!(interp.interpolate(2.0).unwrap(), 2.0 / 3.0, epsilon = 1e-12);
    assert_relative_eq!(interp.interpolate(9.0).unwrap(), -0.5, epsilon = 1e-12);
    assert_eq!(interp.interpolate(0.0).unwrap(), 1.0);
    let err = interp.interpolate(14.0).unwrap_err();
    assert_eq!((err.min, err.max), (-10.0, 12.0));
}

#[test]
fn check_linear_extrapolation()
{
    use approx::assert_relative_eq;
    let interp = reference(ExtrapolationMode::Extrapolate);
    assert_relative_eq!(interp.interpolate(-11.0).unwrap(), 1.2, epsilon = 1e-12);
    assert_relative_eq!(interp.interpolate(14.0).unwrap(), -4.0 / 3.0, epsilon = 1e-12);

    let interp = reference(ExtrapolationMode::Nearest);
    assert_eq!(interp.interpolate(-11.0).unwrap(), 1.0);
    assert_eq!(interp.interpolate(14.0).unwrap(), -1.0);
}

#[test]
fn check_linear_insert_and_batch()
{
    let mut interp = reference(ExtrapolationMode::Extrapolate);
    interp.insert(vec![3.0, -20.0], vec![5.0, 3.0]).unwrap();
    assert_eq!(interp.get_data_x(), vec![-20.0, -10.0, -5.0, 0.0, 3.0, 6.0, 12.0]);
    assert_eq!(interp.interpolate(3.0).unwrap(), 5.0);
    assert_eq!(interp.interpolate(-15.0).unwrap(), 2.0);

    let targets: Vec<f64> = (0..100).map(|i| -25.0 + 0.4 * i as f64).collect();
    let batch = interp.interpolate_batch(&targets).unwrap();
    for (t, v) in targets.iter().zip(batch)
    {
        assert_eq!(interp.interpolate(*t).unwrap(), v);
    }
}
