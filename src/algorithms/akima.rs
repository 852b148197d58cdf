//! Modified Akima ("makima") cubic spline.
//!
//! Knot derivatives are weighted averages of the neighbouring secant slopes, with weights
//! `|m[i+1] - m[i]| + |m[i+1] + m[i]| / 2`. The extra term keeps flat regions flat and avoids
//! the overshoot of the classic Akima weights.

use crate::interpolators::Side;

/// Extrapolation lines pass through the boundary sample and the spline value this fraction
/// of the boundary segment inside the domain.
pub const EXTRAPOLATION_FRACTION: f64 = 0.01;

#[derive(Copy, Clone, Debug, PartialEq)]
struct BoundaryLine
{
    x: f64,
    y: f64,
    slope: f64,
}

impl BoundaryLine
{
    #[inline]
    fn eval(&self, target: f64) -> f64
    {
        self.y + self.slope * (target - self.x)
    }
}

///
/// Cubic coefficients `[a, b, c, d]` of every segment, evaluated as
/// `a + b*u + c*u^2 + d*u^3` with `u = target - x[i]`.
///
#[derive(Clone, Debug, PartialEq)]
pub struct AkimaSpline
{
    coefficients: Vec<[f64; 4]>,
    lower: BoundaryLine,
    upper: BoundaryLine,
    generation: u64,
}

///
/// Derivative at every knot. Two virtual secant slopes are added at each end by linear
/// continuation. Knots where all weights vanish get slope 0.
///
pub fn makima_slopes(x: &[f64], y: &[f64]) -> Vec<f64>
{
    let n = x.len();
    if n < 2
    {
        return vec![0.0; n];
    }
    let m: Vec<f64> = x.windows(2).zip(y.windows(2)).map(|(x, y)| (y[1] - y[0]) / (x[1] - x[0])).collect();
    if n < 3
    {
        return vec![m[0]; n];
    }

    let mut ext = Vec::with_capacity(n + 3);
    let before = 2.0 * m[0] - m[1];
    ext.push(2.0 * before - m[0]);
    ext.push(before);
    ext.extend_from_slice(&m);
    let after = 2.0 * m[n - 2] - m[n - 3];
    ext.push(after);
    ext.push(2.0 * after - m[n - 2]);

    ext.windows(4)
        .map(|w| {
            let w1 = (w[3] - w[2]).abs() + (w[3] + w[2]).abs() / 2.0;
            let w2 = (w[1] - w[0]).abs() + (w[1] + w[0]).abs() / 2.0;
            let s = (w1 * w[1] + w2 * w[2]) / (w1 + w2);
            if s.is_nan() { 0.0 } else { s }
        })
        .collect()
}

impl AkimaSpline
{
    ///
    /// Build the spline for `x`/`y` (at least two points, strictly increasing `x`), tagged with
    /// the store generation it was computed from.
    ///
    pub fn new(x: &[f64], y: &[f64], generation: u64) -> Self
    {
        let s = makima_slopes(x, y);
        let coefficients: Vec<[f64; 4]> = (0..x.len().saturating_sub(1))
            .map(|i| {
                let h = x[i + 1] - x[i];
                let m = (y[i + 1] - y[i]) / h;
                [y[i], s[i], (3.0 * m - 2.0 * s[i] - s[i + 1]) / h, (s[i] + s[i + 1] - 2.0 * m) / (h * h)]
            })
            .collect();

        let mut spline = Self {
            coefficients,
            lower: BoundaryLine { x: f64::NAN, y: f64::NAN, slope: f64::NAN },
            upper: BoundaryLine { x: f64::NAN, y: f64::NAN, slope: f64::NAN },
            generation,
        };
        let n = x.len();
        if n >= 2
        {
            let inner = x[0] + EXTRAPOLATION_FRACTION * (x[1] - x[0]);
            let inner_y = spline.eval_segment(0, x[0], inner);
            spline.lower = BoundaryLine { x: x[0], y: y[0], slope: (inner_y - y[0]) / (inner - x[0]) };

            let inner = x[n - 1] - EXTRAPOLATION_FRACTION * (x[n - 1] - x[n - 2]);
            let inner_y = spline.eval_segment(n - 2, x[n - 2], inner);
            spline.upper = BoundaryLine { x: x[n - 1], y: y[n - 1], slope: (y[n - 1] - inner_y) / (x[n - 1] - inner) };
        }
        spline
    }

    /// Store generation this spline was built from.
    pub fn generation(&self) -> u64
    {
        self.generation
    }

    /// Evaluate segment `i`, whose left knot is `x_i`.
    #[inline]
    pub fn eval_segment(&self, i: usize, x_i: f64, target: f64) -> f64
    {
        let [a, b, c, d] = self.coefficients[i];
        let u = target - x_i;
        a + u * (b + u * (c + u * d))
    }

    /// Linear continuation beyond the domain.
    pub fn extrapolate(&self, side: Side, target: f64) -> f64
    {
        match side
        {
            Side::Below => self.lower.eval(target),
            Side::Above => self.upper.eval(target),
        }
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use approx::assert_relative_eq;

    #[test]
    fn slopes_of_a_line_are_constant()
    {
        let x = [0.0, 1.0, 3.0, 4.0, 7.0];
        let y = x.map(|v| 2.0 * v - 1.0);
        for s in makima_slopes(&x, &y)
        {
            assert_relative_eq!(s, 2.0, epsilon = 1e-12);
        }
    }

    #[test]
    fn flat_data_has_zero_slopes()
    {
        let s = makima_slopes(&[0.0, 1.0, 2.0, 3.0], &[5.0; 4]);
        assert_eq!(s, vec![0.0; 4]);
    }

    #[test]
    fn spline_reproduces_knots()
    {
        let x = [-10.0, -5.0, 0.0, 6.0, 12.0];
        let y = [1.0, 0.0, 1.0, 0.0, -1.0];
        let spline = AkimaSpline::new(&x, &y, 3);
        assert_eq!(spline.generation(), 3);
        for i in 0..4
        {
            assert_relative_eq!(spline.eval_segment(i, x[i], x[i]), y[i], epsilon = 1e-12);
            assert_relative_eq!(spline.eval_segment(i, x[i], x[i + 1]), y[i + 1], epsilon = 1e-12);
        }
        assert_relative_eq!(spline.extrapolate(Side::Below, x[0]), y[0], epsilon = 1e-12);
        assert_relative_eq!(spline.extrapolate(Side::Above, x[4]), y[4], epsilon = 1e-12);
    }
}
