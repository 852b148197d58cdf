//! One-dimensional interpolation over sorted, mutable keys.
//!
//! Four strategies share one storage and query contract: [`NearestInterpolator`],
//! [`LinearInterpolator`], [`AkimaInterpolator`] (modified Akima spline) and
//! [`SlerpInterpolator`] (yaw/pitch/roll orientations). Every mutation is validated as a whole
//! before the data changes, queries outside the keys follow the [`ExtrapolationMode`], and every
//! interpolator round-trips through [`BinarySerializable`] buffers.
//!
//! ```
//! use vectorinterp::{ExtrapolationMode, LinearInterpolator, VectorInterpolator};
//!
//! let mut interp = LinearInterpolator::new(vec![0.0, 1.0], vec![0.0, 2.0], ExtrapolationMode::Fail).unwrap();
//! interp.append(2.0, 3.0).unwrap();
//! assert_eq!(interp.interpolate(1.5).unwrap(), 2.5);
//! assert!(interp.interpolate(3.0).is_err());
//! ```

pub mod algorithms;
pub mod errors;
pub mod interpolators;
pub mod rotation;
pub mod serialization;
pub mod storage;

pub use errors::{DecodeError, EncodeError, InterpolatorError, RangeError, ValidationError};
pub use interpolators::{
    AkimaInterpolator, BiVectorInterpolator, Evaluation, ExtrapolationMode, Interpolator, InterpolatorKind, LinearInterpolator, NearestInterpolator,
    ScalarInterpolator, SlerpInterpolator, VectorInterpolator,
};
pub use rotation::{AngleUnit, Quaternion};
pub use serialization::{BiVectorState, BinarySerializable, SerializationFormat, FORMAT_VERSION};
