use serde::{Deserialize, Serialize};

use crate::error::{Result, SpectraError};

/// Numeric precision of a run.
///
/// `Half` is a storage format only: pixels travel to and from the device as
/// 16-bit floats, but the transforms and the shift run in 32-bit. The sharpen
/// kernel does its arithmetic in the storage type.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Precision {
    #[default]
    Single,
    Double,
    Half,
}

impl Precision {
    /// Parse the numeric command-line code: 0 = single, 1 = double, 2 = half.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(Self::Single),
            1 => Ok(Self::Double),
            2 => Ok(Self::Half),
            other => Err(SpectraError::Config(format!(
                "unknown precision code {other} (expected 0, 1 or 2)"
            ))),
        }
    }

    pub fn code(self) -> u8 {
        match self {
            Self::Single => 0,
            Self::Double => 1,
            Self::Half => 2,
        }
    }

    /// Scalar type of the spectrum buffers and the FFT arithmetic.
    pub fn compute_scalar(self) -> ScalarType {
        match self {
            Self::Double => ScalarType::F64,
            Self::Single | Self::Half => ScalarType::F32,
        }
    }

    /// Scalar type of host-visible pixels (input staging and final image).
    pub fn storage_scalar(self) -> ScalarType {
        match self {
            Self::Single => ScalarType::F32,
            Self::Double => ScalarType::F64,
            Self::Half => ScalarType::F16,
        }
    }

    /// Bytes per complex sample in the working buffers.
    pub fn complex_bytes(self) -> u64 {
        2 * self.compute_scalar().byte_width()
    }

    pub const ALL: [Precision; 3] = [Self::Single, Self::Double, Self::Half];
}

impl std::fmt::Display for Precision {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Single => write!(f, "single"),
            Self::Double => write!(f, "double"),
            Self::Half => write!(f, "half"),
        }
    }
}

/// A WGSL floating-point scalar.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarType {
    F16,
    F32,
    F64,
}

impl ScalarType {
    pub fn wgsl_name(self) -> &'static str {
        match self {
            Self::F16 => "f16",
            Self::F32 => "f32",
            Self::F64 => "f64",
        }
    }

    pub fn byte_width(self) -> u64 {
        match self {
            Self::F16 => 2,
            Self::F32 => 4,
            Self::F64 => 8,
        }
    }

    /// Format `value` as a typed WGSL literal (`0.5h`, `0.5f`, `0.5lf`).
    ///
    /// The value is first rounded to the target type so the emitted digits
    /// are exactly representable.
    pub fn literal(self, value: f64) -> String {
        match self {
            Self::F16 => format!("{:?}h", half::f16::from_f64(value).to_f32()),
            Self::F32 => format!("{:?}f", value as f32),
            Self::F64 => format!("{value:?}lf"),
        }
    }

    /// Smallest denominator used to keep divisions finite.
    pub fn epsilon(self) -> f64 {
        match self {
            Self::F16 => 1e-3,
            Self::F32 => 1e-7,
            Self::F64 => 1e-12,
        }
    }
}

/// Which FFT layout to use.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TransformMode {
    /// Use real-input (half-spectrum) transforms when a working row fits in
    /// workgroup memory.
    #[default]
    Auto,
    Real,
    Complex,
}

impl std::fmt::Display for TransformMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Auto => write!(f, "auto"),
            Self::Real => write!(f, "real"),
            Self::Complex => write!(f, "complex"),
        }
    }
}
