//! Binary persistence of interpolators.
//!
//! A buffer holds the format version followed by the [`InterpolatorState`], both encoded with
//! bincode's standard configuration. Derived data (Akima coefficients) is not stored and is
//! rebuilt on decode. Decoded arrays go through the regular constructors, so an invalid buffer
//! never produces an interpolator.

use std::hash::Hasher;
use std::io::{Read, Write};

use rustc_hash::FxHasher;
use serde::{de::DeserializeOwned, Deserialize, Serialize};

use crate::errors::{DecodeError, EncodeError};
use crate::interpolators::{AkimaInterpolator, ExtrapolationMode, Interpolator, InterpolatorKind, LinearInterpolator, NearestInterpolator, SlerpInterpolator, VectorInterpolator};
use crate::rotation::AngleUnit;

/// Version written in front of every buffer. Buffers with another version are rejected.
pub const FORMAT_VERSION: u16 = 1;

/// Serialization format options for interpolator data.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SerializationFormat {
    /// bincode, standard configuration
    #[default]
    Binary,
    /// bincode with LZ4 compression (size prepended)
    BinaryLz4,
}

impl SerializationFormat {
    /// Returns true if this format uses LZ4 compression
    pub fn is_compressed(&self) -> bool {
        matches!(self, SerializationFormat::BinaryLz4)
    }
}

/// Persisted state of a scalar interpolator.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct ScalarState {
    pub extrapolation_mode: ExtrapolationMode,
    pub x: Vec<f64>,
    pub y: Vec<f64>,
}

/// Persisted state of a slerp interpolator. Angles are stored as given, in `angle_unit`.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct OrientationState {
    pub extrapolation_mode: ExtrapolationMode,
    pub angle_unit: AngleUnit,
    pub x: Vec<f64>,
    pub yaw: Vec<f64>,
    pub pitch: Vec<f64>,
    pub roll: Vec<f64>,
}

/// The variant is the type tag of the buffer.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub enum InterpolatorState {
    Nearest(ScalarState),
    Linear(ScalarState),
    Akima(ScalarState),
    Slerp(OrientationState),
}

impl InterpolatorState {
    pub fn kind(&self) -> InterpolatorKind {
        match self {
            InterpolatorState::Nearest(_) => InterpolatorKind::Nearest,
            InterpolatorState::Linear(_) => InterpolatorKind::Linear,
            InterpolatorState::Akima(_) => InterpolatorKind::Akima,
            InterpolatorState::Slerp(_) => InterpolatorKind::Slerp,
        }
    }
}

/// Persisted state of a [`crate::interpolators::BiVectorInterpolator`]: one state per row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct BiVectorState {
    pub extrapolation_mode: ExtrapolationMode,
    pub row_coordinates: Vec<f64>,
    pub rows: Vec<InterpolatorState>,
}

fn encode_state<T: Serialize>(state: &T) -> Result<Vec<u8>, EncodeError> {
    let config = bincode::config::standard();
    let mut bytes = bincode::serde::encode_to_vec(FORMAT_VERSION, config).map_err(|_| EncodeError::SerializationFailed)?;
    bytes.extend(bincode::serde::encode_to_vec(state, config).map_err(|_| EncodeError::SerializationFailed)?);
    Ok(bytes)
}

fn decode_state<T: DeserializeOwned>(bytes: &[u8]) -> Result<T, DecodeError> {
    let config = bincode::config::standard();
    let (version, header): (u16, usize) = bincode::serde::decode_from_slice(bytes, config).map_err(|_| DecodeError::Malformed)?;
    if version != FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion(version));
    }
    let (state, body): (T, usize) = bincode::serde::decode_from_slice(&bytes[header..], config).map_err(|_| DecodeError::Malformed)?;
    let extra = bytes.len() - header - body;
    if extra != 0 {
        return Err(DecodeError::TrailingBytes(extra));
    }
    Ok(state)
}

/// Serialize state to bytes using the specified format.
/// Applies LZ4 compression if the format variant ends with Lz4.
pub fn serialize<T: Serialize>(state: &T, format: SerializationFormat) -> Result<Vec<u8>, EncodeError> {
    let bytes = encode_state(state)?;
    match format {
        SerializationFormat::BinaryLz4 => Ok(lz4_flex::compress_prepend_size(&bytes)),
        SerializationFormat::Binary => Ok(bytes),
    }
}

/// Deserialize state from bytes using the specified format.
/// Applies LZ4 decompression if the format variant ends with Lz4.
pub fn deserialize<T: DeserializeOwned>(data: &[u8], format: SerializationFormat) -> Result<T, DecodeError> {
    match format {
        SerializationFormat::BinaryLz4 => {
            let decompressed = lz4_flex::decompress_size_prepended(data)
                .map_err(|_| DecodeError::LZ4DecompressionFailed)?;
            decode_state(&decompressed)
        }
        SerializationFormat::Binary => decode_state(data),
    }
}

///
/// Conversion to and from the persisted state, plus the buffer and stream helpers built on it.
///
pub trait BinarySerializable: Sized {
    fn to_state(&self) -> InterpolatorState;

    /// Rebuild from a decoded state, revalidating all data.
    fn from_state(state: InterpolatorState) -> Result<Self, DecodeError>;

    fn to_binary(&self) -> Result<Vec<u8>, EncodeError> {
        self.write_buffer(SerializationFormat::Binary)
    }

    fn from_binary(buffer: &[u8]) -> Result<Self, DecodeError> {
        Self::read_buffer(buffer, SerializationFormat::Binary)
    }

    fn write_buffer(&self, format: SerializationFormat) -> Result<Vec<u8>, EncodeError> {
        serialize(&self.to_state(), format)
    }

    fn read_buffer(buffer: &[u8], format: SerializationFormat) -> Result<Self, DecodeError> {
        deserialize(buffer, format)
            .and_then(Self::from_state)
            .inspect_err(|e| tracing::warn!(error = %e, len = buffer.len(), ?format, "failed to decode interpolator"))
    }

    fn write<Writer: Write>(&self, mut writer: Writer, format: SerializationFormat) -> Result<(), EncodeError> {
        let bytes = self.write_buffer(format)?;
        writer.write_all(&bytes).map_err(|_| EncodeError::WriteBufferFailed)
    }

    fn read<Reader: Read>(mut reader: Reader, format: SerializationFormat) -> Result<Self, DecodeError> {
        let mut bytes = Vec::new();
        reader.read_to_end(&mut bytes).map_err(|_| DecodeError::ReadBufferFailed)?;
        Self::read_buffer(&bytes, format)
    }

    /// 64-bit hash of the uncompressed binary encoding. Equal interpolators hash equally.
    fn binary_hash(&self) -> Result<u64, EncodeError> {
        let mut hasher = FxHasher::default();
        hasher.write(&self.to_binary()?);
        Ok(hasher.finish())
    }
}

fn scalar_state<I: VectorInterpolator<Value = f64>>(interpolator: &I) -> ScalarState {
    let store = interpolator.base().store();
    ScalarState { extrapolation_mode: interpolator.extrapolation_mode(), x: store.x().to_vec(), y: store.y().to_vec() }
}

fn mismatch(expected: InterpolatorKind, state: &InterpolatorState) -> DecodeError {
    DecodeError::TypeMismatch { expected, found: state.kind() }
}

impl BinarySerializable for NearestInterpolator {
    fn to_state(&self) -> InterpolatorState {
        InterpolatorState::Nearest(scalar_state(self))
    }

    fn from_state(state: InterpolatorState) -> Result<Self, DecodeError> {
        match state {
            InterpolatorState::Nearest(s) => Self::new(s.x, s.y, s.extrapolation_mode).map_err(DecodeError::InvalidData),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl BinarySerializable for LinearInterpolator {
    fn to_state(&self) -> InterpolatorState {
        InterpolatorState::Linear(scalar_state(self))
    }

    fn from_state(state: InterpolatorState) -> Result<Self, DecodeError> {
        match state {
            InterpolatorState::Linear(s) => Self::new(s.x, s.y, s.extrapolation_mode).map_err(DecodeError::InvalidData),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl BinarySerializable for AkimaInterpolator {
    fn to_state(&self) -> InterpolatorState {
        InterpolatorState::Akima(scalar_state(self))
    }

    fn from_state(state: InterpolatorState) -> Result<Self, DecodeError> {
        match state {
            InterpolatorState::Akima(s) => Self::new(s.x, s.y, s.extrapolation_mode).map_err(DecodeError::InvalidData),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl BinarySerializable for SlerpInterpolator {
    fn to_state(&self) -> InterpolatorState {
        let ypr = self.get_data_ypr();
        InterpolatorState::Slerp(OrientationState {
            extrapolation_mode: self.extrapolation_mode(),
            angle_unit: self.angle_unit(),
            x: self.get_data_x(),
            yaw: ypr.iter().map(|v| v[0]).collect(),
            pitch: ypr.iter().map(|v| v[1]).collect(),
            roll: ypr.iter().map(|v| v[2]).collect(),
        })
    }

    fn from_state(state: InterpolatorState) -> Result<Self, DecodeError> {
        match state {
            InterpolatorState::Slerp(s) => Self::from_columns(s.x, &s.yaw, &s.pitch, &s.roll, s.angle_unit, s.extrapolation_mode)
                .map_err(DecodeError::InvalidData),
            other => Err(mismatch(Self::KIND, &other)),
        }
    }
}

impl BinarySerializable for Interpolator {
    fn to_state(&self) -> InterpolatorState {
        match self {
            Interpolator::Nearest(i) => i.to_state(),
            Interpolator::Linear(i) => i.to_state(),
            Interpolator::Akima(i) => i.to_state(),
            Interpolator::Slerp(i) => i.to_state(),
        }
    }

    fn from_state(state: InterpolatorState) -> Result<Self, DecodeError> {
        Ok(match state.kind() {
            InterpolatorKind::Nearest => Interpolator::Nearest(NearestInterpolator::from_state(state)?),
            InterpolatorKind::Linear => Interpolator::Linear(LinearInterpolator::from_state(state)?),
            InterpolatorKind::Akima => Interpolator::Akima(AkimaInterpolator::from_state(state)?),
            InterpolatorKind::Slerp => Interpolator::Slerp(SlerpInterpolator::from_state(state)?),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::ValidationError;

    fn linear() -> LinearInterpolator {
        LinearInterpolator::new(vec![-10.0, -5.0, 0.0, 6.0, 12.0], vec![1.0, 0.0, 1.0, 0.0, -1.0], ExtrapolationMode::Fail).unwrap()
    }

    #[test]
    fn test_binary_roundtrip() {
        let a = linear();
        let bytes = a.to_binary().unwrap();
        let b = LinearInterpolator::from_binary(&bytes).unwrap();
        assert_eq!(a, b);
        assert_eq!(b.to_binary().unwrap(), bytes);
        assert_eq!(a.binary_hash().unwrap(), b.binary_hash().unwrap());
    }

    #[test]
    fn test_binary_lz4_roundtrip() {
        let a = linear();
        let bytes = a.write_buffer(SerializationFormat::BinaryLz4).unwrap();
        assert!(SerializationFormat::BinaryLz4.is_compressed());
        let b = LinearInterpolator::read_buffer(&bytes, SerializationFormat::BinaryLz4).unwrap();
        assert_eq!(a, b);
        assert_eq!(
            LinearInterpolator::read_buffer(&bytes[..2], SerializationFormat::BinaryLz4),
            Err(DecodeError::LZ4DecompressionFailed)
        );
    }

    #[test]
    fn test_stream_roundtrip() {
        let a = linear();
        let mut buffer = Vec::new();
        a.write(&mut buffer, SerializationFormat::Binary).unwrap();
        let b = LinearInterpolator::read(buffer.as_slice(), SerializationFormat::Binary).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_rejects_bad_buffers() {
        let bytes = linear().to_binary().unwrap();
        assert_eq!(LinearInterpolator::from_binary(&[]), Err(DecodeError::Malformed));
        assert_eq!(LinearInterpolator::from_binary(&bytes[..bytes.len() - 3]), Err(DecodeError::Malformed));

        let mut longer = bytes.clone();
        longer.extend([0, 0]);
        assert_eq!(LinearInterpolator::from_binary(&longer), Err(DecodeError::TrailingBytes(2)));

        // version 2 encodes as the single varint byte 2
        let mut newer = bytes.clone();
        newer[0] = 2;
        assert_eq!(LinearInterpolator::from_binary(&newer), Err(DecodeError::UnsupportedVersion(2)));

        assert_eq!(
            AkimaInterpolator::from_binary(&bytes),
            Err(DecodeError::TypeMismatch { expected: InterpolatorKind::Akima, found: InterpolatorKind::Linear })
        );
    }

    #[test]
    fn test_revalidates_decoded_data() {
        let state = InterpolatorState::Linear(ScalarState { extrapolation_mode: ExtrapolationMode::Fail, x: vec![1.0, 0.0], y: vec![0.0, 0.0] });
        let bytes = serialize(&state, SerializationFormat::Binary).unwrap();
        assert_eq!(
            LinearInterpolator::from_binary(&bytes),
            Err(DecodeError::InvalidData(ValidationError::NotSorted { index: 1 }))
        );
    }

    #[test]
    fn test_dispatch_on_type_tag() {
        let bytes = linear().to_binary().unwrap();
        let any = Interpolator::from_binary(&bytes).unwrap();
        assert_eq!(any.kind(), InterpolatorKind::Linear);
        assert_eq!(any, Interpolator::Linear(linear()));
        assert_eq!(any.to_binary().unwrap(), bytes);
    }
}
