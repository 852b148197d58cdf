use vectorinterp::{errors::InterpolatorError, AkimaInterpolator, AngleUnit, BinarySerializable, ExtrapolationMode, Interpolator, LinearInterpolator, SerializationFormat, SlerpInterpolator, VectorInterpolator};

///
/// Depth along a track: linear vs akima, then more samples arriving out of order.
///
fn depth_profile() -> Result<(), InterpolatorError>
{
    println!("\nRunning \"depth_profile\" example\n");
    let x = vec![0.0, 10.0, 20.0, 30.0, 40.0];
    let depth = vec![5.0, 7.5, 12.0, 11.0, 9.0];
    let linear = LinearInterpolator::new(x.clone(), depth.clone(), ExtrapolationMode::Fail)?;
    let mut akima = AkimaInterpolator::new(x, depth, ExtrapolationMode::Extrapolate)?;

    for t in [5.0, 15.0, 25.0, 35.0]
    {
        println!("t={t}: linear {:.3}, akima {:.3}", linear.interpolate(t)?, akima.interpolate(t)?);
    }
    match linear.interpolate(45.0)
    {
        Ok(v) => println!("unexpected value {v}"),
        Err(e) => println!("linear past the end: {e}"),
    }
    println!("akima past the end: {:.3}", akima.interpolate(45.0)?);

    // late samples, unordered
    akima.insert(vec![25.0, 5.0], vec![11.8, 6.0])?;
    println!("after insert x={:?}", akima.get_data_x());
    println!("t=25: akima {:.3}", akima.interpolate(25.0)?);
    Ok(())
}

///
/// Vehicle attitude: slerp between yaw/pitch/roll samples and persist the interpolator.
///
fn attitude() -> Result<(), InterpolatorError>
{
    println!("\nRunning \"attitude\" example\n");
    let mut attitude = SlerpInterpolator::from_columns(
        vec![0.0, 1.0, 2.0],
        &[350.0, 10.0, 30.0],
        &[0.0, 5.0, -5.0],
        &[0.0, 2.0, -2.0],
        AngleUnit::Degrees,
        ExtrapolationMode::Nearest,
    )?;
    attitude.append(3.0, [40.0, 0.0, 0.0])?;

    for t in [0.5, 1.5, 2.5, 10.0]
    {
        let ypr = attitude.interpolate(t)?;
        println!("t={t}: yaw {:.2}, pitch {:.2}, roll {:.2}", ypr[0], ypr[1], ypr[2]);
    }
    let rad = attitude.interpolate_ypr(0.5, AngleUnit::Radians)?;
    println!("t=0.5 in radians: {rad:?}");

    let mut buffer = Vec::new();
    attitude.write(&mut buffer, SerializationFormat::BinaryLz4)?;
    let restored = Interpolator::read(buffer.as_slice(), SerializationFormat::BinaryLz4)?;
    println!("restored {} with {} points, equal: {}", restored.kind(), restored.len(), restored == Interpolator::Slerp(attitude));
    Ok(())
}

fn main()
{
    if let Err(e) = depth_profile()
    {
        println!("depth_profile failed: {e}");
    }
    if let Err(e) = attitude()
    {
        println!("attitude failed: {e}");
    }
}
