use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::errors::RangeError;

use super::akima::AkimaInterpolator;
use super::linear::LinearInterpolator;
use super::nearest::NearestInterpolator;
use super::slerp::SlerpInterpolator;
use super::vector_interpolator::{ExtrapolationMode, InterpolatorKind, VectorInterpolator};

/// Result of evaluating an [`Interpolator`] of unknown strategy.
#[derive(Copy, Clone, Debug, PartialEq)]
pub enum Evaluation
{
    Scalar(f64),
    /// yaw, pitch, roll in the interpolator's angle unit
    Orientation([f64; 3]),
}

impl Evaluation
{
    pub fn as_scalar(&self) -> Option<f64>
    {
        match *self
        {
            Evaluation::Scalar(v) => Some(v),
            Evaluation::Orientation(_) => None,
        }
    }

    pub fn as_orientation(&self) -> Option<[f64; 3]>
    {
        match *self
        {
            Evaluation::Scalar(_) => None,
            Evaluation::Orientation(v) => Some(v),
        }
    }
}

///
/// Any interpolator, for code that picks the strategy at runtime (for example after decoding a
/// buffer of unknown type). Two values of different strategies are never equal.
///
#[derive(Clone, Debug, PartialEq)]
pub enum Interpolator
{
    Nearest(NearestInterpolator),
    Linear(LinearInterpolator),
    Akima(AkimaInterpolator),
    Slerp(SlerpInterpolator),
}

impl Interpolator
{
    pub fn kind(&self) -> InterpolatorKind
    {
        match self
        {
            Interpolator::Nearest(_) => InterpolatorKind::Nearest,
            Interpolator::Linear(_) => InterpolatorKind::Linear,
            Interpolator::Akima(_) => InterpolatorKind::Akima,
            Interpolator::Slerp(_) => InterpolatorKind::Slerp,
        }
    }

    pub fn extrapolation_mode(&self) -> ExtrapolationMode
    {
        match self
        {
            Interpolator::Nearest(i) => i.extrapolation_mode(),
            Interpolator::Linear(i) => i.extrapolation_mode(),
            Interpolator::Akima(i) => i.extrapolation_mode(),
            Interpolator::Slerp(i) => i.extrapolation_mode(),
        }
    }

    pub fn set_extrapolation_mode(&mut self, mode: ExtrapolationMode)
    {
        match self
        {
            Interpolator::Nearest(i) => i.set_extrapolation_mode(mode),
            Interpolator::Linear(i) => i.set_extrapolation_mode(mode),
            Interpolator::Akima(i) => i.set_extrapolation_mode(mode),
            Interpolator::Slerp(i) => i.set_extrapolation_mode(mode),
        }
    }

    pub fn len(&self) -> usize
    {
        match self
        {
            Interpolator::Nearest(i) => i.len(),
            Interpolator::Linear(i) => i.len(),
            Interpolator::Akima(i) => i.len(),
            Interpolator::Slerp(i) => i.len(),
        }
    }

    pub fn is_empty(&self) -> bool
    {
        self.len() == 0
    }

    pub fn get_data_x(&self) -> Vec<f64>
    {
        match self
        {
            Interpolator::Nearest(i) => i.get_data_x(),
            Interpolator::Linear(i) => i.get_data_x(),
            Interpolator::Akima(i) => i.get_data_x(),
            Interpolator::Slerp(i) => i.get_data_x(),
        }
    }

    pub fn interpolate(&self, target: f64) -> Result<Evaluation, RangeError>
    {
        Ok(match self
        {
            Interpolator::Nearest(i) => Evaluation::Scalar(i.interpolate(target)?),
            Interpolator::Linear(i) => Evaluation::Scalar(i.interpolate(target)?),
            Interpolator::Akima(i) => Evaluation::Scalar(i.interpolate(target)?),
            Interpolator::Slerp(i) => Evaluation::Orientation(i.interpolate(target)?),
        })
    }

    pub fn interpolate_batch(&self, targets: &[f64]) -> Result<Vec<Evaluation>, RangeError>
    {
        targets.par_iter().map(|&t| self.interpolate(t)).collect()
    }
}

impl From<NearestInterpolator> for Interpolator
{
    fn from(value: NearestInterpolator) -> Self {
        Interpolator::Nearest(value)
    }
}

impl From<LinearInterpolator> for Interpolator
{
    fn from(value: LinearInterpolator) -> Self {
        Interpolator::Linear(value)
    }
}

impl From<AkimaInterpolator> for Interpolator
{
    fn from(value: AkimaInterpolator) -> Self {
        Interpolator::Akima(value)
    }
}

impl From<SlerpInterpolator> for Interpolator
{
    fn from(value: SlerpInterpolator) -> Self {
        Interpolator::Slerp(value)
    }
}

#[test]
fn check_dispatch()
{
    let x = vec![-10.0, -5.0, 0.0, 6.0, 12.0];
    let y = vec![1.0, 0.0, 1.0, 0.0, -1.0];
    let linear: Interpolator = LinearInterpolator::new(x.clone(), y.clone(), ExtrapolationMode::Extrapolate).unwrap().into();
    let nearest: Interpolator = NearestInterpolator::new(x.clone(), y.clone(), ExtrapolationMode::Extrapolate).unwrap().into();
    assert_eq!(linear.kind(), InterpolatorKind::Linear);
    assert_eq!(linear.interpolate(-7.5).unwrap(), Evaluation::Scalar(0.5));
    assert_eq!(nearest.interpolate(8.9).unwrap().as_scalar(), Some(0.0));
    assert_ne!(linear, nearest);

    let mut slerp: Interpolator = SlerpInterpolator::new(x, vec![[0.0, 0.0, 0.0]; 5], Default::default(), ExtrapolationMode::Nearest).unwrap().into();
    assert_eq!(slerp.interpolate(100.0).unwrap().as_orientation(), Some([0.0, 0.0, 0.0]));
    slerp.set_extrapolation_mode(ExtrapolationMode::Fail);
    assert!(slerp.interpolate(100.0).is_err());
    assert_eq!(slerp.interpolate_batch(&[-10.0, 12.0]).unwrap().len(), 2);
}
