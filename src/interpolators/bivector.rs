use rayon::iter::{IntoParallelRefIterator, ParallelIterator};

use crate::errors::{DecodeError, EncodeError, InterpolatorError, ValidationError};
use crate::serialization::{self, BiVectorState, BinarySerializable, SerializationFormat};

use super::vector_interpolator::{ExtrapolationMode, ScalarInterpolator, VectorInterpolator};

///
/// Two-dimensional interpolation built from one scalar interpolator per row.
///
/// Every row has its own column coordinates. A query first interpolates each row at the column
/// target, then interpolates across the row coordinates with the same strategy.
///
#[derive(Clone, Debug, PartialEq)]
pub struct BiVectorInterpolator<I: ScalarInterpolator>
{
    row_coordinates: Vec<f64>,
    rows: Vec<I>,
    extrapolation_mode: ExtrapolationMode,
}

impl<I: ScalarInterpolator> Default for BiVectorInterpolator<I>
{
    fn default() -> Self {
        Self::new(ExtrapolationMode::default())
    }
}

impl<I: ScalarInterpolator> BiVectorInterpolator<I>
{
    pub fn new(extrapolation_mode: ExtrapolationMode) -> Self
    {
        Self { row_coordinates: Vec::new(), rows: Vec::new(), extrapolation_mode }
    }

    ///
    /// Add a row. `row` must be larger than every existing row coordinate; `x`/`y` are
    /// validated like a standalone interpolator of type `I`.
    ///
    pub fn append_row(&mut self, row: f64, x: Vec<f64>, y: Vec<f64>) -> Result<(), ValidationError>
    {
        self.check_row(row)?;
        let interpolator = I::from_data(x, y, self.extrapolation_mode)?;
        self.row_coordinates.push(row);
        self.rows.push(interpolator);
        Ok(())
    }

    fn check_row(&self, row: f64) -> Result<(), ValidationError>
    {
        if !row.is_finite()
        {
            return Err(ValidationError::NonFiniteKey { index: self.rows.len() });
        }
        if let Some(&last) = self.row_coordinates.last()
        {
            if row <= last
            {
                return Err(ValidationError::NotAfterLastKey { key: row, last });
            }
        }
        Ok(())
    }

    pub fn row_coordinates(&self) -> &[f64]
    {
        &self.row_coordinates
    }

    pub fn rows(&self) -> &[I]
    {
        &self.rows
    }

    pub fn len(&self) -> usize
    {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool
    {
        self.rows.is_empty()
    }

    pub fn extrapolation_mode(&self) -> ExtrapolationMode
    {
        self.extrapolation_mode
    }

    /// Set the mode used across rows and propagate it to every row.
    pub fn set_extrapolation_mode(&mut self, mode: ExtrapolationMode)
    {
        self.extrapolation_mode = mode;
        for row in self.rows.iter_mut()
        {
            row.set_extrapolation_mode(mode);
        }
    }

    ///
    /// Evaluate on the grid `row_targets x column_targets`. The result is indexed
    /// `[row][column]`. Columns are evaluated in parallel.
    ///
    pub fn evaluate(&self, row_targets: &[f64], column_targets: &[f64]) -> Result<Vec<Vec<f64>>, InterpolatorError>
    {
        let columns = column_targets
            .par_iter()
            .map(|&c| -> Result<Vec<f64>, InterpolatorError> {
                let values = self.rows.iter().map(|row| row.interpolate(c)).collect::<Result<Vec<f64>, _>>()?;
                let column = I::from_data(self.row_coordinates.clone(), values, self.extrapolation_mode)?;
                Ok(row_targets.iter().map(|&r| column.interpolate(r)).collect::<Result<Vec<f64>, _>>()?)
            })
            .collect::<Result<Vec<Vec<f64>>, _>>()?;

        Ok((0..row_targets.len()).map(|r| columns.iter().map(|column| column[r]).collect()).collect())
    }
}

impl<I: ScalarInterpolator + BinarySerializable> BiVectorInterpolator<I>
{
    pub fn to_state(&self) -> BiVectorState
    {
        BiVectorState {
            extrapolation_mode: self.extrapolation_mode,
            row_coordinates: self.row_coordinates.clone(),
            rows: self.rows.iter().map(BinarySerializable::to_state).collect(),
        }
    }

    ///
    /// Rebuild from a decoded state. Row coordinates and every row are validated the same way
    /// as `append_row`.
    ///
    pub fn from_state(state: BiVectorState) -> Result<Self, DecodeError>
    {
        if state.row_coordinates.len() != state.rows.len()
        {
            return Err(DecodeError::InvalidData(ValidationError::LengthMismatch { x: state.row_coordinates.len(), y: state.rows.len() }));
        }
        let mut bi = Self::new(state.extrapolation_mode);
        for (row, row_state) in state.row_coordinates.into_iter().zip(state.rows)
        {
            bi.check_row(row).map_err(DecodeError::InvalidData)?;
            let interpolator = I::from_state(row_state)?;
            bi.row_coordinates.push(row);
            bi.rows.push(interpolator);
        }
        Ok(bi)
    }

    pub fn to_binary(&self) -> Result<Vec<u8>, EncodeError>
    {
        self.write_buffer(SerializationFormat::Binary)
    }

    pub fn from_binary(buffer: &[u8]) -> Result<Self, DecodeError>
    {
        Self::read_buffer(buffer, SerializationFormat::Binary)
    }

    pub fn write_buffer(&self, format: SerializationFormat) -> Result<Vec<u8>, EncodeError>
    {
        serialization::serialize(&self.to_state(), format)
    }

    pub fn read_buffer(buffer: &[u8], format: SerializationFormat) -> Result<Self, DecodeError>
    {
        serialization::deserialize(buffer, format)
            .and_then(Self::from_state)
            .inspect_err(|e| tracing::warn!(error = %e, len = buffer.len(), ?format, "failed to decode bivector interpolator"))
    }
}

#[cfg(test)]
mod tests
{
    use super::*;
    use crate::errors::RangeError;
    use crate::interpolators::{AkimaInterpolator, InterpolatorKind, LinearInterpolator, NearestInterpolator};
    use crate::serialization::InterpolatorState;
    use approx::assert_relative_eq;

    fn plane() -> BiVectorInterpolator<LinearInterpolator>
    {
        let mut bi = BiVectorInterpolator::new(ExtrapolationMode::Extrapolate);
        for row in [0.0, 1.0, 2.0]
        {
            let x = vec![0.0, 1.0, 2.5, 4.0];
            let y = x.iter().map(|c| 2.0 * row + 3.0 * c).collect();
            bi.append_row(row, x, y).unwrap();
        }
        bi
    }

    #[test]
    fn evaluates_a_plane_exactly()
    {
        let bi = plane();
        let rows = [0.5, 1.5, 3.0];
        let cols = [0.25, 3.5, -1.0];
        let result = bi.evaluate(&rows, &cols).unwrap();
        assert_eq!(result.len(), 3);
        for (r, row) in rows.iter().zip(&result)
        {
            assert_eq!(row.len(), 3);
            for (c, v) in cols.iter().zip(row)
            {
                assert_relative_eq!(*v, 2.0 * r + 3.0 * c, epsilon = 1e-12);
            }
        }
    }

    #[test]
    fn extrapolation_mode_reaches_rows()
    {
        let mut bi = plane();
        bi.set_extrapolation_mode(ExtrapolationMode::Fail);
        assert!(bi.rows().iter().all(|r| r.extrapolation_mode() == ExtrapolationMode::Fail));
        let err = bi.evaluate(&[0.5], &[5.0]).unwrap_err();
        assert_eq!(err, InterpolatorError::Range(RangeError { target: 5.0, min: 0.0, max: 4.0 }));
        assert!(bi.evaluate(&[0.5], &[2.0]).is_ok());
    }

    #[test]
    fn rows_must_increase()
    {
        let mut bi = plane();
        let r = bi.append_row(2.0, vec![0.0, 1.0], vec![0.0, 1.0]);
        assert_eq!(r, Err(ValidationError::NotAfterLastKey { key: 2.0, last: 2.0 }));
        assert!(bi.append_row(3.0, vec![0.0], vec![0.0]).is_err());
        assert_eq!(bi.len(), 3);
    }

    #[test]
    fn single_row_cannot_be_evaluated()
    {
        let mut bi = BiVectorInterpolator::<NearestInterpolator>::default();
        bi.append_row(0.0, vec![0.0, 1.0], vec![0.0, 1.0]).unwrap();
        let err = bi.evaluate(&[0.0], &[0.5]).unwrap_err();
        assert_eq!(err, InterpolatorError::Validation(ValidationError::TooFewPoints { got: 1, need: 2 }));
    }

    #[test]
    fn binary_round_trip()
    {
        let mut bi = plane();
        bi.set_extrapolation_mode(ExtrapolationMode::Nearest);
        for format in [SerializationFormat::Binary, SerializationFormat::BinaryLz4]
        {
            let bytes = bi.write_buffer(format).unwrap();
            let decoded = BiVectorInterpolator::<LinearInterpolator>::read_buffer(&bytes, format).unwrap();
            assert_eq!(decoded, bi);
            assert_eq!(decoded.write_buffer(format).unwrap(), bytes);
            assert_eq!(decoded.evaluate(&[0.5, 9.0], &[1.0, -3.0]).unwrap(), bi.evaluate(&[0.5, 9.0], &[1.0, -3.0]).unwrap());
        }
    }

    #[test]
    fn decoding_revalidates_rows()
    {
        let bytes = plane().to_binary().unwrap();
        assert_eq!(
            BiVectorInterpolator::<AkimaInterpolator>::from_binary(&bytes),
            Err(DecodeError::TypeMismatch { expected: InterpolatorKind::Akima, found: InterpolatorKind::Linear })
        );

        let mut state = plane().to_state();
        state.row_coordinates.swap(0, 1);
        let bytes = serialization::serialize(&state, SerializationFormat::Binary).unwrap();
        assert_eq!(
            BiVectorInterpolator::<LinearInterpolator>::from_binary(&bytes),
            Err(DecodeError::InvalidData(ValidationError::NotAfterLastKey { key: 0.0, last: 1.0 }))
        );

        let mut state = plane().to_state();
        state.rows.pop();
        assert!(matches!(BiVectorInterpolator::<LinearInterpolator>::from_state(state), Err(DecodeError::InvalidData(_))));

        let mut state = plane().to_state();
        if let InterpolatorState::Linear(row) = &mut state.rows[1]
        {
            row.x.swap(0, 1);
        }
        assert!(matches!(BiVectorInterpolator::<LinearInterpolator>::from_state(state), Err(DecodeError::InvalidData(ValidationError::NotSorted { .. }))));
    }
}
