use criterion::{criterion_group, criterion_main, Criterion};
use vectorinterp::{errors::InterpolatorError, AkimaInterpolator, AngleUnit, BinarySerializable, ExtrapolationMode, LinearInterpolator, SlerpInterpolator, VectorInterpolator};

const POINTS: usize = 10_000;

fn sample_data() -> (Vec<f64>, Vec<f64>)
{
    let x: Vec<f64> = (0..POINTS).map(|i| i as f64 * 0.1).collect();
    let y = x.iter().map(|v| v.sin()).collect();
    (x, y)
}

fn targets() -> Vec<f64>
{
    // a few values past both ends to exercise extrapolation
    (0..1000).map(|i| -5.0 + i as f64 * (POINTS as f64 * 0.1 + 10.0) / 1000.0).collect()
}

fn linear_batch(c: &mut Criterion)
{
    let (x, y) = sample_data();
    let interp = LinearInterpolator::new(x, y, ExtrapolationMode::Extrapolate).unwrap();
    let t = targets();
    c.bench_function("linear batch 1000", |b| b.iter(|| interp.interpolate_batch(&t).unwrap()));
}

fn akima_batch(c: &mut Criterion)
{
    let (x, y) = sample_data();
    let interp = AkimaInterpolator::new(x, y, ExtrapolationMode::Extrapolate).unwrap();
    let t = targets();
    c.bench_function("akima batch 1000", |b| b.iter(|| interp.interpolate_batch(&t).unwrap()));
}

fn akima_append(c: &mut Criterion)
{
    let (x, y) = sample_data();
    let interp = AkimaInterpolator::new(x, y, ExtrapolationMode::Extrapolate).unwrap();
    c.bench_function("akima append + rebuild", |b| {
        b.iter(|| -> Result<(), InterpolatorError> {
            let mut i = interp.clone();
            i.append(POINTS as f64, 0.0)?;
            Ok(())
        })
    });
}

fn slerp_batch(c: &mut Criterion)
{
    let (x, _) = sample_data();
    let ypr = x.iter().map(|v| [(v * 7.0) % 360.0, (v * 3.0) % 80.0, (v * 5.0) % 170.0]).collect();
    let interp = SlerpInterpolator::new(x, ypr, AngleUnit::Degrees, ExtrapolationMode::Extrapolate).unwrap();
    let t = targets();
    c.bench_function("slerp batch 1000", |b| b.iter(|| interp.interpolate_batch(&t).unwrap()));
}

fn round_trip(c: &mut Criterion)
{
    let (x, y) = sample_data();
    let interp = LinearInterpolator::new(x, y, ExtrapolationMode::Extrapolate).unwrap();
    c.bench_function("binary round trip", |b| {
        b.iter(|| -> Result<LinearInterpolator, InterpolatorError> { Ok(LinearInterpolator::from_binary(&interp.to_binary()?)?) })
    });
}

criterion_group!(benches, linear_batch, akima_batch, akima_append, slerp_batch, round_trip);
criterion_main!(benches);
