//! Quaternion helpers for yaw/pitch/roll orientations.
//!
//! Rotations are composed intrinsically: yaw about z, then pitch about the new y axis, then
//! roll about the new x axis.

use std::f64::consts::{FRAC_PI_2, PI, TAU};

use serde::{Deserialize, Serialize};

/// `1 + dot` below this value means the two quaternions are treated as antipodal.
const ANTIPODAL_TOLERANCE: f64 = 1e-12;

/// Unit of yaw, pitch and roll values.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AngleUnit
{
    #[default]
    Degrees,
    Radians,
}

impl AngleUnit
{
    #[inline]
    pub fn to_radians(&self, value: f64) -> f64
    {
        match self
        {
            AngleUnit::Degrees => value.to_radians(),
            AngleUnit::Radians => value,
        }
    }

    #[inline]
    pub fn from_radians(&self, value: f64) -> f64
    {
        match self
        {
            AngleUnit::Degrees => value.to_degrees(),
            AngleUnit::Radians => value,
        }
    }

    /// Convert a triple given in `self` into `target`.
    pub fn convert(&self, ypr: [f64; 3], target: AngleUnit) -> [f64; 3]
    {
        if *self == target
        {
            return ypr;
        }
        ypr.map(|v| target.from_radians(self.to_radians(v)))
    }
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct Quaternion
{
    pub w: f64,
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Quaternion
{
    pub const IDENTITY: Quaternion = Quaternion { w: 1.0, x: 0.0, y: 0.0, z: 0.0 };
    pub const NAN: Quaternion = Quaternion { w: f64::NAN, x: f64::NAN, y: f64::NAN, z: f64::NAN };

    pub fn new(w: f64, x: f64, y: f64, z: f64) -> Self
    {
        Self { w, x, y, z }
    }

    ///
    /// Build a unit quaternion from yaw (z), pitch (y) and roll (x).
    ///
    pub fn from_ypr(ypr: [f64; 3], unit: AngleUnit) -> Self
    {
        let [yaw, pitch, roll] = ypr.map(|v| unit.to_radians(v) * 0.5);
        let (sy, cy) = yaw.sin_cos();
        let (sp, cp) = pitch.sin_cos();
        let (sr, cr) = roll.sin_cos();
        Self {
            w: cy * cp * cr + sy * sp * sr,
            x: cy * cp * sr - sy * sp * cr,
            y: cy * sp * cr + sy * cp * sr,
            z: sy * cp * cr - cy * sp * sr,
        }
        .normalized()
    }

    ///
    /// Yaw in [0, 360°), pitch in [-90°, 90°], roll in [-180°, 180°) (or the radian equivalents).
    ///
    pub fn to_ypr(&self, unit: AngleUnit) -> [f64; 3]
    {
        let q = self.normalized();
        let r00 = 1.0 - 2.0 * (q.y * q.y + q.z * q.z);
        let r10 = 2.0 * (q.x * q.y + q.w * q.z);
        let r20 = 2.0 * (q.x * q.z - q.w * q.y);
        let r21 = 2.0 * (q.y * q.z + q.w * q.x);
        let r22 = 1.0 - 2.0 * (q.x * q.x + q.y * q.y);

        let yaw = r10.atan2(r00);
        let pitch = (-r20).clamp(-1.0, 1.0).asin();
        let roll = r21.atan2(r22);
        normalize_angles_rad([yaw, pitch, roll]).map(|v| unit.from_radians(v))
    }

    #[inline]
    pub fn dot(&self, other: &Quaternion) -> f64
    {
        self.w * other.w + self.x * other.x + self.y * other.y + self.z * other.z
    }

    #[inline]
    pub fn norm(&self) -> f64
    {
        self.dot(self).sqrt()
    }

    pub fn normalized(&self) -> Quaternion
    {
        let n = self.norm();
        Quaternion::new(self.w / n, self.x / n, self.y / n, self.z / n)
    }

    pub fn is_finite(&self) -> bool
    {
        self.w.is_finite() && self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    ///
    /// Spherical linear interpolation along the shortest arc. `t` outside [0, 1] continues the
    /// rotation past either end. Antipodal inputs have no defined rotation axis and give
    /// [`Quaternion::NAN`].
    ///
    pub fn slerp(&self, other: &Quaternion, t: f64) -> Quaternion
    {
        let d = self.dot(other);
        if 1.0 + d <= ANTIPODAL_TOLERANCE
        {
            return Quaternion::NAN;
        }
        let abs_d = d.abs();
        let (scale0, mut scale1) = if abs_d >= 1.0 - f64::EPSILON
        {
            (1.0 - t, t)
        }
        else
        {
            let theta = abs_d.acos();
            let sin_theta = theta.sin();
            (((1.0 - t) * theta).sin() / sin_theta, (t * theta).sin() / sin_theta)
        };
        if d < 0.0
        {
            scale1 = -scale1;
        }
        Quaternion::new(
            scale0 * self.w + scale1 * other.w,
            scale0 * self.x + scale1 * other.x,
            scale0 * self.y + scale1 * other.y,
            scale0 * self.z + scale1 * other.z,
        )
    }
}

///
/// Shift angles (radians) into yaw [0, 2pi), pitch [-pi/2, pi/2], roll [-pi, pi).
/// A pitch beyond +-pi/2 is folded using rotate(y, p, r) == rotate(y + pi, pi - p, r + pi).
///
pub fn normalize_angles_rad(ypr: [f64; 3]) -> [f64; 3]
{
    let [mut yaw, mut pitch, mut roll] = ypr;

    pitch = (pitch + FRAC_PI_2).rem_euclid(TAU) - FRAC_PI_2;
    if pitch > FRAC_PI_2
    {
        yaw -= PI;
        pitch = PI - pitch;
        roll -= PI;
    }

    roll = (roll + PI).rem_euclid(TAU) - PI;
    if roll >= PI
    {
        roll -= TAU;
    }
    yaw = yaw.rem_euclid(TAU);
    if yaw >= TAU
    {
        yaw -= TAU;
    }
    [yaw, pitch, roll]
}

#[cfg(test)]
mod tests
{
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn ypr_round_trip()
    {
        for ypr in [[45.0, 45.0, 45.0], [100.0, -45.0, 0.0], [300.0, 80.0, 170.0], [350.0, -80.0, -170.0], [0.0, 0.0, -180.0]]
        {
            let back = Quaternion::from_ypr(ypr, AngleUnit::Degrees).to_ypr(AngleUnit::Degrees);
            for i in 0..3
            {
                assert_relative_eq!(back[i], ypr[i], epsilon = 1e-9);
            }
        }
    }

    #[test]
    fn degrees_and_radians_agree()
    {
        let deg = Quaternion::from_ypr([10.0, 20.0, 30.0], AngleUnit::Degrees);
        let rad = Quaternion::from_ypr([10f64.to_radians(), 20f64.to_radians(), 30f64.to_radians()], AngleUnit::Radians);
        assert_relative_eq!(deg.dot(&rad), 1.0, epsilon = 1e-12);
    }

    #[test]
    fn slerp_end_points_and_midpoint()
    {
        let a = Quaternion::from_ypr([0.0, 0.0, 0.0], AngleUnit::Degrees);
        let b = Quaternion::from_ypr([90.0, 0.0, 0.0], AngleUnit::Degrees);
        assert_relative_eq!(a.slerp(&b, 0.0).to_ypr(AngleUnit::Degrees)[0], 0.0, epsilon = 1e-9);
        assert_relative_eq!(a.slerp(&b, 1.0).to_ypr(AngleUnit::Degrees)[0], 90.0, epsilon = 1e-9);
        assert_relative_eq!(a.slerp(&b, 0.5).to_ypr(AngleUnit::Degrees)[0], 45.0, epsilon = 1e-9);
        assert_relative_eq!(a.slerp(&b, 1.5).to_ypr(AngleUnit::Degrees)[0], 135.0, epsilon = 1e-9);
    }

    #[test]
    fn slerp_takes_short_arc()
    {
        let a = Quaternion::from_ypr([10.0, 0.0, 0.0], AngleUnit::Degrees);
        let b = Quaternion::from_ypr([350.0, 0.0, 0.0], AngleUnit::Degrees);
        for b in [b, Quaternion::new(-b.w, -b.x, -b.y, -b.z)]
        {
            // midpoint is yaw 0 (not 180)
            let yaw = a.slerp(&b, 0.5).to_ypr(AngleUnit::Radians)[0];
            assert_relative_eq!(yaw.sin(), 0.0, epsilon = 1e-9);
            assert_relative_eq!(yaw.cos(), 1.0, epsilon = 1e-9);
        }
    }

    #[test]
    fn antipodal_slerp_is_nan()
    {
        let a = Quaternion::IDENTITY;
        let b = Quaternion::new(-1.0, 0.0, 0.0, 0.0);
        let r = a.slerp(&b, 0.25).to_ypr(AngleUnit::Degrees);
        assert!(r.iter().all(|v| v.is_nan()));
    }

    #[test]
    fn normalize_folds_pitch()
    {
        let r = normalize_angles_rad([0.0, 100f64.to_radians(), 0.0]).map(f64::to_degrees);
        assert_relative_eq!(r[0], 180.0, epsilon = 1e-9);
        assert_relative_eq!(r[1], 80.0, epsilon = 1e-9);
        assert_relative_eq!(r[2], -180.0, epsilon = 1e-9);
    }
}
