use rayon::iter::{IntoParallelRefIterator, ParallelIterator};
use serde::{Deserialize, Serialize};

use crate::errors::{RangeError, ValidationError};
use crate::storage::sorted_keys::{Position, SampleValue, SortedKeyStore};

///
/// Behaviour for targets outside `[x[0], x[last]]`.
///
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ExtrapolationMode
{
    /// Continue the boundary formula of the interpolation strategy.
    #[default]
    Extrapolate,
    /// Return a [`RangeError`].
    Fail,
    /// Return the value stored at the closest boundary key.
    Nearest,
}

pub const ALL_EXTRAPOLATION_MODES: [ExtrapolationMode; 3] = [ExtrapolationMode::Extrapolate, ExtrapolationMode::Fail, ExtrapolationMode::Nearest];

/// Tag identifying the interpolation strategy.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum InterpolatorKind
{
    Nearest,
    Linear,
    Akima,
    Slerp,
}

impl std::fmt::Display for InterpolatorKind
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:?}", *self)
    }
}

/// Which end of the domain a target lies beyond.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side
{
    Below,
    Above,
}

///
/// State shared by all interpolators: the extrapolation mode and the key/value store.
///
#[derive(Clone, Debug, PartialEq)]
pub struct InterpolatorBase<V>
{
    pub(crate) extrapolation_mode: ExtrapolationMode,
    pub(crate) store: SortedKeyStore<V>,
}

impl<V: SampleValue> InterpolatorBase<V>
{
    pub fn new(x: Vec<f64>, y: Vec<V>, extrapolation_mode: ExtrapolationMode, min_len: usize) -> Result<Self, ValidationError>
    {
        Ok(Self { extrapolation_mode, store: SortedKeyStore::new(x, y, min_len)? })
    }

    pub fn store(&self) -> &SortedKeyStore<V>
    {
        &self.store
    }

    fn range_error(&self, target: f64) -> RangeError
    {
        let (min, max) = self.store.domain().unwrap_or((f64::NAN, f64::NAN));
        RangeError { target, min, max }
    }
}

fn rejected(kind: InterpolatorKind, operation: &'static str, error: ValidationError) -> ValidationError
{
    tracing::debug!(%kind, operation, %error, "rejected mutation");
    error
}

///
/// A one-dimensional interpolator over strictly increasing keys.
///
/// Implementors provide storage access through `base()`/`base_mut()` and the segment formula of
/// their strategy. Mutation, lookup, extrapolation handling and batch evaluation are shared.
///
pub trait VectorInterpolator: Sized + Sync
{
    /// Value type accepted from callers.
    type Input;
    /// Value type kept in the store.
    type Value: SampleValue + Send + Sync;
    /// Value type returned by queries.
    type Output: Send;

    const KIND: InterpolatorKind;

    /// Get the `InterpolatorBase` for this interpolator.
    fn base(&self) -> &InterpolatorBase<Self::Value>;

    /// Get the `InterpolatorBase` for this interpolator (mutable).
    fn base_mut(&mut self) -> &mut InterpolatorBase<Self::Value>;

    /// Convert a caller value into its stored representation.
    fn to_value(&self, input: Self::Input) -> Self::Value;

    /// Output for the sample stored at `index`.
    fn sample(&self, index: usize) -> Self::Output;

    ///
    /// Evaluate the formula of segment `[x[lower], x[lower + 1]]` at `target`. Targets outside
    /// the segment continue the same formula.
    ///
    fn interpolate_segment(&self, lower: usize, target: f64) -> Self::Output;

    /// Output for an undefined (NaN) target.
    fn undefined(&self) -> Self::Output;

    ///
    /// Value beyond the domain when the mode is `Extrapolate`. Defaults to continuing the first
    /// or last segment.
    ///
    fn extrapolate(&self, side: Side, target: f64) -> Self::Output
    {
        match side
        {
            Side::Below => self.interpolate_segment(0, target),
            Side::Above => self.interpolate_segment(self.len() - 2, target),
        }
    }

    /// Called after every successful mutation of the stored data.
    fn data_changed(&mut self) {}

    fn extrapolation_mode(&self) -> ExtrapolationMode
    {
        self.base().extrapolation_mode
    }

    fn set_extrapolation_mode(&mut self, mode: ExtrapolationMode)
    {
        self.base_mut().extrapolation_mode = mode;
    }

    fn len(&self) -> usize
    {
        self.base().store.len()
    }

    fn is_empty(&self) -> bool
    {
        self.base().store.is_empty()
    }

    /// Copy of the keys in ascending order.
    fn get_data_x(&self) -> Vec<f64>
    {
        self.base().store.x().to_vec()
    }

    ///
    /// Add one point after the current last key.
    ///
    fn append(&mut self, x: f64, y: Self::Input) -> Result<(), ValidationError>
    {
        let value = self.to_value(y);
        self.base_mut().store.append(x, value).map_err(|e| rejected(Self::KIND, "append", e))?;
        self.data_changed();
        Ok(())
    }

    ///
    /// Add a strictly increasing batch after the current last key. Nothing is added unless the
    /// whole batch is valid.
    ///
    fn extend(&mut self, x: Vec<f64>, y: Vec<Self::Input>) -> Result<(), ValidationError>
    {
        let values = y.into_iter().map(|v| self.to_value(v)).collect();
        self.base_mut().store.extend(x, values).map_err(|e| rejected(Self::KIND, "extend", e))?;
        self.data_changed();
        Ok(())
    }

    ///
    /// Insert an unordered batch of new keys at their sorted positions.
    ///
    fn insert(&mut self, x: Vec<f64>, y: Vec<Self::Input>) -> Result<(), ValidationError>
    {
        let values = y.into_iter().map(|v| self.to_value(v)).collect();
        self.base_mut().store.insert(x, values).map_err(|e| rejected(Self::KIND, "insert", e))?;
        self.data_changed();
        Ok(())
    }

    /// Replace all stored data. Validated the same way as construction.
    fn set_data(&mut self, x: Vec<f64>, y: Vec<Self::Input>) -> Result<(), ValidationError>
    {
        let values = y.into_iter().map(|v| self.to_value(v)).collect();
        self.base_mut().store.replace(x, values).map_err(|e| rejected(Self::KIND, "set_data", e))?;
        self.data_changed();
        Ok(())
    }

    ///
    /// Evaluate at `target`. Stored keys return their stored value exactly. A NaN target gives
    /// a NaN output unless the mode is `Fail`.
    ///
    fn interpolate(&self, target: f64) -> Result<Self::Output, RangeError>
    {
        let base = self.base();
        let side = match base.store.locate(target)
        {
            Position::Exact(i) => return Ok(self.sample(i)),
            Position::Between(i) => return Ok(self.interpolate_segment(i, target)),
            Position::Undefined =>
            {
                if base.extrapolation_mode == ExtrapolationMode::Fail
                {
                    return Err(base.range_error(target));
                }
                return Ok(self.undefined());
            }
            Position::Below => Side::Below,
            Position::Above => Side::Above,
        };
        match base.extrapolation_mode
        {
            ExtrapolationMode::Fail => Err(base.range_error(target)),
            ExtrapolationMode::Nearest => match side
            {
                Side::Below => Ok(self.sample(0)),
                Side::Above => Ok(self.sample(self.len() - 1)),
            },
            ExtrapolationMode::Extrapolate => Ok(self.extrapolate(side, target)),
        }
    }

    ///
    /// Evaluate every target in parallel. Output order follows `targets`. If any target is out
    /// of range a range error is returned; which one is unspecified when several are.
    ///
    fn interpolate_batch(&self, targets: &[f64]) -> Result<Vec<Self::Output>, RangeError>
    {
        targets.par_iter().map(|&t| self.interpolate(t)).collect()
    }
}

///
/// Interpolators over plain `f64` samples, buildable from raw columns. Used as the row type of
/// [`crate::interpolators::BiVectorInterpolator`].
///
pub trait ScalarInterpolator: VectorInterpolator<Input = f64, Value = f64, Output = f64> + Clone + Send
{
    fn from_data(x: Vec<f64>, y: Vec<f64>, extrapolation_mode: ExtrapolationMode) -> Result<Self, ValidationError>;

    /// Copy of the stored values in key order.
    fn get_data_y(&self) -> Vec<f64>
    {
        self.base().store.y().to_vec()
    }
}
