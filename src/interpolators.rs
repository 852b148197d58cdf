pub mod akima;
pub mod bivector;
pub mod interpolator;
pub mod linear;
pub mod nearest;
pub mod slerp;
pub mod vector_interpolator;

pub use akima::AkimaInterpolator;
pub use bivector::BiVectorInterpolator;
pub use interpolator::{Evaluation, Interpolator};
pub use linear::LinearInterpolator;
pub use nearest::NearestInterpolator;
pub use slerp::{Orientation, SlerpInterpolator};
pub use vector_interpolator::{ExtrapolationMode, InterpolatorBase, InterpolatorKind, ScalarInterpolator, Side, VectorInterpolator, ALL_EXTRAPOLATION_MODES};
