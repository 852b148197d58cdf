use crate::errors::ValidationError;

///
/// A value that can be stored next to a key. Only finite values are accepted by the store.
///
pub trait SampleValue: Clone + PartialEq + std::fmt::Debug
{
    fn is_finite(&self) -> bool;
}

impl SampleValue for f64
{
    #[inline]
    fn is_finite(&self) -> bool {
        f64::is_finite(*self)
    }
}

/// Result of locating a target value in the key sequence.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Position
{
    /// `x[i] == target`
    Exact(usize),
    /// `x[i] < target < x[i + 1]`
    Between(usize),
    /// `target < x[0]`
    Below,
    /// `target > x[last]`
    Above,
    /// Target is NaN (or the store is empty).
    Undefined,
}

///
/// Strictly increasing, finite keys with a parallel value sequence.
/// All mutations are validated as a whole before anything is changed.
///
#[derive(Clone, Debug)]
pub struct SortedKeyStore<V>
{
    x: Vec<f64>,
    y: Vec<V>,
    min_len: usize,
    generation: u64,
}

impl<V: PartialEq> PartialEq for SortedKeyStore<V>
{
    fn eq(&self, other: &Self) -> bool {
        self.x == other.x && self.y == other.y
    }
}

impl<V: SampleValue> SortedKeyStore<V>
{
    pub fn new(x: Vec<f64>, y: Vec<V>, min_len: usize) -> Result<Self, ValidationError>
    {
        Self::validate(&x, &y, min_len)?;
        Ok(Self { x, y, min_len, generation: 0 })
    }

    fn validate(x: &[f64], y: &[V], min_len: usize) -> Result<(), ValidationError>
    {
        if x.len() != y.len()
        {
            return Err(ValidationError::LengthMismatch { x: x.len(), y: y.len() });
        }
        if x.len() < min_len
        {
            return Err(ValidationError::TooFewPoints { got: x.len(), need: min_len });
        }
        Self::validate_batch(x, y)
    }

    /// Finiteness and strict ordering of a batch, independent of the stored data.
    fn validate_batch(x: &[f64], y: &[V]) -> Result<(), ValidationError>
    {
        for (index, (key, value)) in x.iter().zip(y).enumerate()
        {
            if !key.is_finite()
            {
                return Err(ValidationError::NonFiniteKey { index });
            }
            if !value.is_finite()
            {
                return Err(ValidationError::NonFiniteValue { index });
            }
            if index > 0
            {
                let previous = x[index - 1];
                if *key == previous
                {
                    return Err(ValidationError::DuplicateKey { key: *key });
                }
                if *key < previous
                {
                    return Err(ValidationError::NotSorted { index });
                }
            }
        }
        Ok(())
    }

    /// Keys in ascending order.
    pub fn x(&self) -> &[f64]
    {
        &self.x
    }

    /// Values in key order.
    pub fn y(&self) -> &[V]
    {
        &self.y
    }

    pub fn len(&self) -> usize
    {
        self.x.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.x.is_empty()
    }

    /// Minimum number of points this store accepts.
    pub fn min_len(&self) -> usize
    {
        self.min_len
    }

    ///
    /// Incremented by every successful structural mutation. Derived data built from the store
    /// records the generation it was built from.
    ///
    pub fn generation(&self) -> u64
    {
        self.generation
    }

    /// `(x[0], x[last])`, `None` if empty.
    pub fn domain(&self) -> Option<(f64, f64)>
    {
        Some((*self.x.first()?, *self.x.last()?))
    }

    pub fn append(&mut self, x: f64, y: V) -> Result<(), ValidationError>
    {
        if !x.is_finite()
        {
            return Err(ValidationError::NonFiniteKey { index: 0 });
        }
        if !y.is_finite()
        {
            return Err(ValidationError::NonFiniteValue { index: 0 });
        }
        if let Some(&last) = self.x.last()
        {
            if x <= last
            {
                return Err(ValidationError::NotAfterLastKey { key: x, last });
            }
        }
        self.x.push(x);
        self.y.push(y);
        self.generation += 1;
        Ok(())
    }

    ///
    /// Append a sorted batch. The first key must be larger than the current last key.
    ///
    pub fn extend(&mut self, x: Vec<f64>, y: Vec<V>) -> Result<(), ValidationError>
    {
        Self::validate(&x, &y, 0)?;
        let (Some(&first), Some(&last)) = (x.first(), self.x.last()) else {
            if !x.is_empty()
            {
                return self.replace(x, y);
            }
            return Ok(());
        };
        if first <= last
        {
            return Err(ValidationError::NotAfterLastKey { key: first, last });
        }
        self.x.extend(x);
        self.y.extend(y);
        self.generation += 1;
        Ok(())
    }

    ///
    /// Merge an unsorted batch into sorted position. Keys must be unique within the batch and
    /// must not exist in the store yet.
    ///
    pub fn insert(&mut self, x: Vec<f64>, y: Vec<V>) -> Result<(), ValidationError>
    {
        if x.len() != y.len()
        {
            return Err(ValidationError::LengthMismatch { x: x.len(), y: y.len() });
        }
        if x.is_empty()
        {
            return Ok(());
        }
        for (index, (key, value)) in x.iter().zip(&y).enumerate()
        {
            if !key.is_finite()
            {
                return Err(ValidationError::NonFiniteKey { index });
            }
            if !value.is_finite()
            {
                return Err(ValidationError::NonFiniteValue { index });
            }
        }

        let mut staged: Vec<(f64, V)> = x.into_iter().zip(y).collect();
        // keys are finite here, so partial_cmp is total and -0.0 == 0.0
        staged.sort_by(|a, b| a.0.partial_cmp(&b.0).unwrap_or(std::cmp::Ordering::Equal));
        for pair in staged.windows(2)
        {
            if pair[0].0 == pair[1].0
            {
                return Err(ValidationError::DuplicateKey { key: pair[0].0 });
            }
        }
        for (key, _) in &staged
        {
            let i = self.x.partition_point(|v| *v < *key);
            if self.x.get(i) == Some(key)
            {
                return Err(ValidationError::DuplicateKey { key: *key });
            }
        }
        tracing::trace!(existing = self.x.len(), inserted = staged.len(), "merging inserted keys");

        let total = self.x.len() + staged.len();
        let mut merged_x = Vec::with_capacity(total);
        let mut merged_y = Vec::with_capacity(total);
        let mut existing = std::mem::take(&mut self.x).into_iter().zip(std::mem::take(&mut self.y)).peekable();
        let mut inserted = staged.into_iter().peekable();
        loop
        {
            let take_existing = match (existing.peek(), inserted.peek())
            {
                (Some(a), Some(b)) => a.0 < b.0,
                (Some(_), None) => true,
                (None, Some(_)) => false,
                (None, None) => break,
            };
            let next = if take_existing { existing.next() } else { inserted.next() };
            if let Some((key, value)) = next
            {
                merged_x.push(key);
                merged_y.push(value);
            }
        }
        self.x = merged_x;
        self.y = merged_y;
        self.generation += 1;
        Ok(())
    }

    /// Replace all data. Validated like a new store.
    pub fn replace(&mut self, x: Vec<f64>, y: Vec<V>) -> Result<(), ValidationError>
    {
        Self::validate(&x, &y, self.min_len)?;
        self.x = x;
        self.y = y;
        self.generation += 1;
        Ok(())
    }

    ///
    /// Binary search for `target`.
    ///
    pub fn locate(&self, target: f64) -> Position
    {
        let Some((first, last)) = self.domain() else {
            return Position::Undefined;
        };
        if target.is_nan()
        {
            return Position::Undefined;
        }
        if target < first
        {
            return Position::Below;
        }
        if target > last
        {
            return Position::Above;
        }
        // first index with x >= target, always valid since target <= last
        let i = self.x.partition_point(|&v| v < target);
        if self.x[i] == target
        {
            Position::Exact(i)
        }
        else
        {
            Position::Between(i - 1)
        }
    }
}
