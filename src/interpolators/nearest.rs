use crate::errors::ValidationError;

use super::vector_interpolator::{ExtrapolationMode, InterpolatorBase, InterpolatorKind, ScalarInterpolator, VectorInterpolator};

///
/// Piecewise constant interpolation: the value of the closer key. A target exactly halfway
/// between two keys takes the upper key's value.
///
#[derive(Clone, Debug, PartialEq)]
pub struct NearestInterpolator(pub(crate) InterpolatorBase<f64>);

impl NearestInterpolator
{
    pub const MIN_POINTS: usize = 2;

    pub fn new(x: Vec<f64>, y: Vec<f64>, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError>
    {
        Ok(Self(InterpolatorBase::new(x, y, extrapolation_mode, Self::MIN_POINTS)?))
    }
}

impl VectorInterpolator for NearestInterpolator
{
    type Input = f64;
    type Value = f64;
    type Output = f64;

    const KIND: InterpolatorKind = InterpolatorKind::Nearest;

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

    // beyond the domain t < 0 or t > 1, which clamps to the boundary value
    fn interpolate_segment(&self, lower: usize, target: f64) -> f64 {
        let x = self.0.store.x();
        let y = self.0.store.y();
        let t = (target - x[lower]) / (x[lower + 1] - x[lower]);
        if t < 0.5 { y[lower] } else { y[lower + 1] }
    }

    fn undefined(&self) -> f64 {
        f64::NAN
    }
}

impl ScalarInterpolator for NearestInterpolator
{
    fn from_data(x: Vec<f64>, y: Vec<f64>, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError> {
        Self::new(x, y, extrapolation_mode)
    }
}

#[cfg(test)]
fn reference(mode: ExtrapolationMode) -> NearestInterpolator
{
    NearestInterpolator::new(vec![-10.0, -5.0, 0.0, 6.0, 12.0], vec![1.0, 0.0, 1.0, 0.0, -1.0], mode).unwrap()
}

#[test]
fn check_nearest_values()
{
    let interp = reference(ExtrapolationMode::Fail);
    assert_eq!(interp.interpolate(-7.6).unwrap(), 1.0);
    assert_eq!(interp.interpolate(-7.5).unwrap(), 0.0);
    assert_eq!(interp.interpolate(-2.5).unwrap(), 1.0);
    assert_eq!(interp.interpolate(3.0).unwrap(), 0.0);
    assert_eq!(interp.interpolate(9.0).unwrap(), -1.0);
    assert_eq!(interp.interpolate(6.0).unwrap(), 0.0);
    assert!(interp.interpolate(-11.0).is_err());
    assert!(interp.interpolate(f64::NAN).is_err());
}

#[test]
fn check_nearest_extrapolation()
{
    for mode in [ExtrapolationMode::Extrapolate, ExtrapolationMode::Nearest]
    {
        let interp = reference(mode);
        assert_eq!(interp.interpolate(-11.0).unwrap(), 1.0);
        assert_eq!(interp.interpolate(-1e9).unwrap(), 1.0);
        assert_eq!(interp.interpolate(14.0).unwrap(), -1.0);
        assert!(interp.interpolate(f64::NAN).unwrap().is_nan());
    }
}

#[test]
fn check_nearest_append()
{
    let mut interp = reference(ExtrapolationMode::Extrapolate);
    interp.append(14.0, 3.0).unwrap();
    assert_eq!(interp.interpolate(13.1).unwrap(), 3.0);
    assert_eq!(interp.interpolate(12.9).unwrap(), -1.0);
    assert!(interp.append(14.0, 3.0).is_err());
    assert_eq!(interp.len(), 6);
}
