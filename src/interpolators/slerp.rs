use crate::errors::ValidationError;
use crate::rotation::{AngleUnit, Quaternion};
use crate::storage::sorted_keys::SampleValue;

use super::vector_interpolator::{ExtrapolationMode, InterpolatorBase, InterpolatorKind, VectorInterpolator};

///
/// A stored orientation: the yaw/pitch/roll triple as given (in the interpolator's unit) and
/// the unit quaternion derived from it.
///
#[derive(Copy, Clone, Debug)]
pub struct Orientation
{
    ypr: [f64; 3],
    quaternion: Quaternion,
}

impl Orientation
{
    pub fn new(ypr: [f64; 3], unit: AngleUnit) -> Self
    {
        Self { ypr, quaternion: Quaternion::from_ypr(ypr, unit) }
    }

    pub fn ypr(&self) -> [f64; 3]
    {
        self.ypr
    }

    pub fn quaternion(&self) -> &Quaternion
    {
        &self.quaternion
    }
}

// the quaternion is derived from the angles
impl PartialEq for Orientation
{
    fn eq(&self, other: &Self) -> bool {
        self.ypr == other.ypr
    }
}

impl SampleValue for Orientation
{
    fn is_finite(&self) -> bool {
        self.ypr.iter().all(|v| v.is_finite())
    }
}

///
/// Spherical linear interpolation of yaw/pitch/roll orientations.
///
/// Inputs are stored as given and returned verbatim at stored keys. Interpolated values are
/// normalized to yaw [0, 360), pitch [-90, 90], roll [-180, 180) in the interpolator's unit.
/// Between or beyond two antipodal orientations the result is NaN.
///
#[derive(Clone, Debug, PartialEq)]
pub struct SlerpInterpolator
{
    base: InterpolatorBase<Orientation>,
    angle_unit: AngleUnit,
}

impl SlerpInterpolator
{
    pub const MIN_POINTS: usize = 2;

    pub fn new(x: Vec<f64>, ypr: Vec<[f64; 3]>, angle_unit: AngleUnit, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError>
    {
        let values = ypr.into_iter().map(|v| Orientation::new(v, angle_unit)).collect();
        Ok(Self { base: InterpolatorBase::new(x, values, extrapolation_mode, Self::MIN_POINTS)?, angle_unit })
    }

    ///
    /// Build from separate yaw, pitch and roll columns.
    ///
    pub fn from_columns(x: Vec<f64>, yaw: &[f64], pitch: &[f64], roll: &[f64], angle_unit: AngleUnit, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError>
    {
        for column in [yaw, pitch, roll]
        {
            if column.len() != x.len()
            {
                return Err(ValidationError::LengthMismatch { x: x.len(), y: column.len() });
            }
        }
        let ypr = (0..x.len()).map(|i| [yaw[i], pitch[i], roll[i]]).collect();
        Self::new(x, ypr, angle_unit, extrapolation_mode)
    }

    /// Unit of all inputs and outputs, fixed at construction.
    pub fn angle_unit(&self) -> AngleUnit
    {
        self.angle_unit
    }

    /// Stored triples in key order, as given.
    pub fn get_data_ypr(&self) -> Vec<[f64; 3]>
    {
        self.base.store.y().iter().map(Orientation::ypr).collect()
    }

    /// Stored quaternions in key order.
    pub fn get_data_quaternions(&self) -> Vec<Quaternion>
    {
        self.base.store.y().iter().map(|o| o.quaternion).collect()
    }

    ///
    /// Interpolate and convert the result to `output_unit`.
    ///
    pub fn interpolate_ypr(&self, target: f64, output_unit: AngleUnit) -> Result<[f64; 3], crate::errors::RangeError>
    {
        Ok(self.angle_unit.convert(self.interpolate(target)?, output_unit))
    }
}

impl VectorInterpolator for SlerpInterpolator
{
    type Input = [f64; 3];
    type Value = Orientation;
    type Output = [f64; 3];

    const KIND: InterpolatorKind = InterpolatorKind::Slerp;

    fn base(&self) -> &InterpolatorBase<Orientation> {
        &self.base
    }

    fn base_mut(&mut self) -> &mut InterpolatorBase<Orientation> {
        &mut self.base
    }

    fn to_value(&self, input: [f64; 3]) -> Orientation {
        Orientation::new(input, self.angle_unit)
    }

    fn sample(&self, index: usize) -> [f64; 3] {
        self.base.store.y()[index].ypr
    }

    fn interpolate_segment(&self, lower: usize, target: f64) -> [f64; 3] {
        let x = self.base.store.x();
        let y = self.base.store.y();
        let t = (target - x[lower]) / (x[lower + 1] - x[lower]);
        y[lower].quaternion.slerp(&y[lower + 1].quaternion, t).to_ypr(self.angle_unit)
    }

    fn undefined(&self) -> [f64; 3] {
        [f64::NAN; 3]
    }
}

#[cfg(test)]
fn reference(mode: ExtrapolationMode) -> SlerpInterpolator
{
    let mut interp = SlerpInterpolator::from_columns(
        vec![-10.0, -5.0, 0.0, 6.0],
        &[0.0, 45.0, 100.0, 300.0],
        &[0.0, 45.0, -45.0, 80.0],
        &[-180.0, 45.0, 0.0, 170.0],
        AngleUnit::Degrees,
        mode,
    )
    .unwrap();
    interp.append(12.0, [350.0, -80.0, -170.0]).unwrap();
    interp
}

#[cfg(test)]
fn assert_ypr(actual: [f64; 3], expected: [f64; 3])
{
    for i in 0..3
    {
        approx::assert_relative_eq!(actual[i], expected[i], epsilon = 1e-6);
    }
}

#[test]
fn check_slerp_values()
{
    let interp = reference(ExtrapolationMode::Fail);
    assert_ypr(interp.interpolate(-3.0).unwrap(), [58.5679194066, 5.0841237338, 37.6730325392]);
    assert_ypr(interp.interpolate(9.0).unwrap(), [333.5151692017, 0.632182955, -158.8770719663]);
    assert_eq!(interp.interpolate(-10.0).unwrap(), [0.0, 0.0, -180.0]);
    assert_eq!(interp.interpolate(12.0).unwrap(), [350.0, -80.0, -170.0]);
    assert!(interp.interpolate(13.0).is_err());
}

#[test]
fn check_slerp_extrapolation()
{
    let interp = reference(ExtrapolationMode::Extrapolate);
    assert_ypr(interp.interpolate(-11.0).unwrap(), [347.01848882, 9.3296836006, -153.7039370777]);
    assert_ypr(interp.interpolate(13.0).unwrap(), [147.0971139354, -72.4669510216, 34.2739577346]);

    let interp = reference(ExtrapolationMode::Nearest);
    assert_eq!(interp.interpolate(-11.0).unwrap(), [0.0, 0.0, -180.0]);
    assert_eq!(interp.interpolate(13.0).unwrap(), [350.0, -80.0, -170.0]);
}

#[test]
fn check_slerp_radians()
{
    let interp = reference(ExtrapolationMode::Fail);
    let rad = interp.interpolate_ypr(-3.0, AngleUnit::Radians).unwrap();
    assert_ypr(rad.map(f64::to_degrees), [58.5679194066, 5.0841237338, 37.6730325392]);

    let in_radians = SlerpInterpolator::new(
        interp.get_data_x(),
        interp.get_data_ypr().into_iter().map(|v| v.map(f64::to_radians)).collect(),
        AngleUnit::Radians,
        ExtrapolationMode::Fail,
    )
    .unwrap();
    assert_ypr(in_radians.interpolate_ypr(9.0, AngleUnit::Degrees).unwrap(), [333.5151692017, 0.632182955, -158.8770719663]);
}

#[test]
fn check_slerp_insert()
{
    let mut interp = reference(ExtrapolationMode::Extrapolate);
    interp.insert(vec![13.0, 11.0], vec![[10.0, 0.0, 0.0], [20.0, 0.0, 0.0]]).unwrap();
    assert_eq!(interp.get_data_x(), vec![-10.0, -5.0, 0.0, 6.0, 11.0, 12.0, 13.0]);
    assert_eq!(interp.interpolate(11.0).unwrap(), [20.0, 0.0, 0.0]);
    assert!(interp.insert(vec![0.0], vec![[0.0; 3]]).is_err());
    assert!(interp.append(14.0, [f64::NAN, 0.0, 0.0]).is_err());
    assert_eq!(interp.len(), 7);
}

#[test]
fn check_slerp_antipodal_is_nan()
{
    // yaw 0 and yaw 360 are the same rotation with opposite quaternion signs
    let interp = SlerpInterpolator::new(vec![0.0, 1.0], vec![[0.0; 3], [360.0, 0.0, 0.0]], AngleUnit::Degrees, ExtrapolationMode::Extrapolate).unwrap();
    assert!(interp.interpolate(0.5).unwrap().iter().all(|v| v.is_nan()));
    assert_eq!(interp.interpolate(1.0).unwrap(), [360.0, 0.0, 0.0]);
}
