use crate::algorithms::akima::AkimaSpline;
use crate::errors::ValidationError;

use super::vector_interpolator::{ExtrapolationMode, InterpolatorBase, InterpolatorKind, ScalarInterpolator, Side, VectorInterpolator};

///
/// Modified Akima cubic interpolation. The spline coefficients are derived from the stored
/// data and rebuilt after every successful mutation; they are never serialized.
///
/// Extrapolation is linear, along the secant through the boundary sample and the spline value
/// 1% of the boundary segment inside the domain.
///
#[derive(Clone, Debug)]
pub struct AkimaInterpolator
{
    base: InterpolatorBase<f64>,
    spline: AkimaSpline,
}

impl PartialEq for AkimaInterpolator
{
    fn eq(&self, other: &Self) -> bool {
        self.base == other.base
    }
}

impl AkimaInterpolator
{
    pub const MIN_POINTS: usize = 4;

    pub fn new(x: Vec<f64>, y: Vec<f64>, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError>
    {
        let base = InterpolatorBase::new(x, y, extrapolation_mode, Self::MIN_POINTS)?;
        let spline = AkimaSpline::new(base.store.x(), base.store.y(), base.store.generation());
        Ok(Self { base, spline })
    }

    pub fn spline(&self) -> &AkimaSpline
    {
        &self.spline
    }
}

impl VectorInterpolator for AkimaInterpolator
{
    type Input = f64;
    type Value = f64;
    type Output = f64;

    const KIND: InterpolatorKind = InterpolatorKind::Akima;

    fn base(&self) -> &InterpolatorBase<f64> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut InterpolatorBase<f64> {
        &mut self.base
    }

    fn to_value(&self, input: f64) -> f64 {
        input
    }

    fn sample(&self, index: usize) -> f64 {
        self.base.store.y()[index]
    }

    fn interpolate_segment(&self, lower: usize, target: f64) -> f64 {
        debug_assert_eq!(self.spline.generation(), self.base.store.generation());
        self.spline.eval_segment(lower, self.base.store.x()[lower], target)
    }

    fn extrapolate(&self, side: Side, target: f64) -> f64 {
        self.spline.extrapolate(side, target)
    }

    fn undefined(&self) -> f64 {
        f64::NAN
    }

    fn data_changed(&mut self) {
        let store = &self.base.store;
        if self.spline.generation() != store.generation()
        {
            tracing::debug!(points = store.len(), generation = store.generation(), "rebuilding akima spline");
            self.spline = AkimaSpline::new(store.x(), store.y(), store.generation());
        }
    }
}

impl ScalarInterpolator for AkimaInterpolator
{
    fn from_data(x: Vec<f64>, y: Vec<f64>, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError> {
        Self::new(x, y, extrapolation_mode)
    }
}

#[cfg(test)]
fn reference(mode: ExtrapolationMode) -> AkimaInterpolator
{
    AkimaInterpolator::new(vec![-10.0, -5.0, 0.0, 6.0, 12.0], vec![1.0, 0.0, 1.0, 0.0, -1.0], mode).unwrap()
}

#[test]
fn check_akima_values()
{
    use approx::assert_relative_eq;
    let interp = reference(ExtrapolationMode::Fail);
    assert_relative_eq!(interp.interpolate(-7.5).unwrap(), 0.2684859155, epsilon = 1e-9);
    assert_relative_eq!(interp.interpolate(-2.6).unwrap(), 0.5509550555, epsilon = 1e-9);
    assert_relative_eq!(interp.interpolate(3.0).unwrap(), 0.5808823529, epsilon = 1e-9);
    assert_relative_eq!(interp.interpolate(8.0).unwrap(), -1.0 / 3.0, epsilon = 1e-9);
    assert_relative_eq!(interp.interpolate(9.0).unwrap(), -0.5, epsilon = 1e-9);
    assert_relative_eq!(interp.interpolate(10.0).unwrap(), -2.0 / 3.0, epsilon = 1e-9);
    assert_eq!(interp.interpolate(-5.0).unwrap(), 0.0);
    assert!(interp.interpolate(-100.0).is_err());
}

#[test]
fn check_akima_extrapolation()
{
    use approx::assert_relative_eq;
    let interp = reference(ExtrapolationMode::Extrapolate);
    assert_relative_eq!(interp.interpolate(-100.0).unwrap(), 28.0618464789, epsilon = 1e-6);
    assert_relative_eq!(interp.interpolate(100.0).unwrap(), -15.6666666667, epsilon = 1e-6);

    let interp = reference(ExtrapolationMode::Nearest);
    assert_eq!(interp.interpolate(-100.0).unwrap(), 1.0);
    assert_eq!(interp.interpolate(100.0).unwrap(), -1.0);
}

#[test]
fn check_akima_requires_four_points()
{
    let r = AkimaInterpolator::new(vec![0.0, 1.0, 2.0], vec![0.0, 1.0, 0.0], ExtrapolationMode::Extrapolate);
    assert_eq!(r, Err(ValidationError::TooFewPoints { got: 3, need: 4 }));
}

#[test]
fn check_akima_rebuilds_after_mutation()
{
    let mut interp = reference(ExtrapolationMode::Extrapolate);
    let before = interp.interpolate(11.0).unwrap();
    interp.append(18.0, 5.0).unwrap();
    assert_eq!(interp.spline().generation(), interp.base().store().generation());
    assert_ne!(interp.interpolate(11.0).unwrap(), before);

    let fresh = AkimaInterpolator::new(interp.get_data_x(), interp.get_data_y(), ExtrapolationMode::Extrapolate).unwrap();
    assert_eq!(fresh.interpolate(11.0).unwrap(), interp.interpolate(11.0).unwrap());

    let generation = interp.spline().generation();
    assert!(interp.append(18.0, 1.0).is_err());
    assert_eq!(interp.spline().generation(), generation);
}
