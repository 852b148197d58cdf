use proptest::prelude::*;
use vectorinterp::{
    AkimaInterpolator, AngleUnit, BinarySerializable, ExtrapolationMode, LinearInterpolator, NearestInterpolator, SlerpInterpolator, VectorInterpolator,
};

/// Strictly increasing keys with matching values.
fn samples() -> impl Strategy<Value = (Vec<f64>, Vec<f64>)>
{
    (-100.0..100.0f64, prop::collection::vec((0.1..10.0f64, -100.0..100.0f64), 4..40)).prop_map(|(start, steps)| -> (Vec<f64>, Vec<f64>) {
        let mut key = start;
        steps
            .into_iter()
            .map(|(step, value)| {
                key += step;
                (key, value)
            })
            .unzip()
    })
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Every stored key returns its stored value exactly.
    #[test]
    fn prop_exact_lookup((x, y) in samples()) {
        let nearest = NearestInterpolator::new(x.clone(), y.clone(), ExtrapolationMode::Fail).unwrap();
        let linear = LinearInterpolator::new(x.clone(), y.clone(), ExtrapolationMode::Fail).unwrap();
        let akima = AkimaInterpolator::new(x.clone(), y.clone(), ExtrapolationMode::Fail).unwrap();
        for (k, v) in x.iter().zip(&y) {
            prop_assert_eq!(nearest.interpolate(*k).unwrap(), *v);
            prop_assert_eq!(linear.interpolate(*k).unwrap(), *v);
            prop_assert_eq!(akima.interpolate(*k).unwrap(), *v);
        }
    }

    /// Batch evaluation is element-wise identical to scalar evaluation.
    #[test]
    fn prop_batch_matches_scalar((x, y) in samples(), targets in prop::collection::vec(-200.0..600.0f64, 0..50)) {
        let akima = AkimaInterpolator::new(x, y, ExtrapolationMode::Extrapolate).unwrap();
        let batch = akima.interpolate_batch(&targets).unwrap();
        prop_assert_eq!(batch.len(), targets.len());
        for (t, v) in targets.iter().zip(batch) {
            prop_assert_eq!(akima.interpolate(*t).unwrap().to_bits(), v.to_bits());
        }
    }

    /// Linear values stay within the bracketing samples.
    #[test]
    fn prop_linear_is_bounded((x, y) in samples(), fraction in 0.0..1.0f64) {
        let linear = LinearInterpolator::new(x.clone(), y.clone(), ExtrapolationMode::Fail).unwrap();
        for i in 0..x.len() - 1 {
            let t = x[i] + fraction * (x[i + 1] - x[i]);
            let v = linear.interpolate(t).unwrap();
            prop_assert!(v >= y[i].min(y[i + 1]) - 1e-9 && v <= y[i].max(y[i + 1]) + 1e-9);
        }
    }

    /// Inserting keys in any order gives the same interpolator as building from sorted data.
    #[test]
    fn prop_insert_matches_construction((x, y) in samples()) {
        let (kept, added): (Vec<usize>, Vec<usize>) = (0..x.len()).partition(|i| i % 2 == 0);
        let mut linear = LinearInterpolator::new(
            kept.iter().map(|&i| x[i]).collect(),
            kept.iter().map(|&i| y[i]).collect(),
            ExtrapolationMode::Extrapolate,
        ).unwrap();
        linear.insert(added.iter().rev().map(|&i| x[i]).collect(), added.iter().rev().map(|&i| y[i]).collect()).unwrap();
        prop_assert_eq!(linear, LinearInterpolator::new(x, y, ExtrapolationMode::Extrapolate).unwrap());
    }

    /// Round trip gives an equal interpolator and identical bytes.
    #[test]
    fn prop_binary_round_trip((x, y) in samples()) {
        let akima = AkimaInterpolator::new(x, y, ExtrapolationMode::Nearest).unwrap();
        let bytes = akima.to_binary().unwrap();
        let decoded = AkimaInterpolator::from_binary(&bytes).unwrap();
        prop_assert_eq!(decoded.to_binary().unwrap(), bytes);
        prop_assert_eq!(decoded, akima);
    }

    /// Interpolated orientations are normalized.
    #[test]
    fn prop_slerp_ranges((x, _) in samples(), angles in prop::collection::vec((0.0..360.0f64, -89.0..89.0f64, -180.0..180.0f64), 40), fraction in 0.01..0.99f64) {
        let ypr: Vec<[f64; 3]> = angles.iter().take(x.len()).map(|&(a, b, c)| [a, b, c]).collect();
        let slerp = SlerpInterpolator::new(x.clone(), ypr, AngleUnit::Degrees, ExtrapolationMode::Fail).unwrap();
        for i in 0..x.len() - 1 {
            let [yaw, pitch, roll] = slerp.interpolate(x[i] + fraction * (x[i + 1] - x[i])).unwrap();
            if yaw.is_nan() {
                continue;
            }
            prop_assert!((0.0..360.0).contains(&yaw));
            prop_assert!((-90.0..=90.0).contains(&pitch));
            prop_assert!((-180.0..180.0).contains(&roll));
        }
    }
}
