//! Host-side packing between [`PlanarImage`] and device byte layouts.

use ndarray::Array3;

use crate::error::{Result, SpectraError};
use crate::frame::PlanarImage;
use crate::plan::{ScalarType, TransformPlan};

/// Copies into and out of device buffers must be a multiple of this.
pub const COPY_ALIGNMENT: u64 = wgpu::COPY_BUFFER_ALIGNMENT;

/// Round `bytes` up to the 16-byte buffer alignment used for every allocation.
pub fn aligned(bytes: u64) -> u64 {
    bytes.div_ceil(16) * 16
}

fn encode(values: impl Iterator<Item = f32>, scalar: ScalarType, out: &mut Vec<u8>) {
    match scalar {
        ScalarType::F16 => {
            for v in values {
                out.extend_from_slice(&half::f16::from_f32(v).to_le_bytes());
            }
        }
        ScalarType::F32 => {
            for v in values {
                out.extend_from_slice(&v.to_le_bytes());
            }
        }
        ScalarType::F64 => {
            for v in values {
                out.extend_from_slice(&(v as f64).to_le_bytes());
            }
        }
    }
}

/// Pack `image` into the input buffer layout of `plan`: one plane per
/// channel, `W x H` storage scalars (real-input mode) or `(v, 0)` pairs.
pub fn pack_input(image: &PlanarImage, plan: &TransformPlan) -> Result<Vec<u8>> {
    let expected = (plan.channels as usize, plan.height as usize, plan.width as usize);
    if image.data.dim() != expected {
        return Err(SpectraError::Config(format!(
            "image shape {:?} does not match plan {:?}",
            image.data.dim(),
            expected
        )));
    }

    let scalar = plan.precision.storage_scalar();
    let mut bytes = Vec::with_capacity(aligned(plan.buffer_sizes().input) as usize);
    if plan.real_input {
        encode(image.data.iter().copied(), scalar, &mut bytes);
    } else {
        encode(
            image.data.iter().flat_map(|&v| [v, 0.0]),
            scalar,
            &mut bytes,
        );
    }
    bytes.resize(bytes.len().next_multiple_of(COPY_ALIGNMENT as usize), 0);
    Ok(bytes)
}

/// Unpack the final image from the first `output` bytes of the working buffer.
pub fn unpack_output(bytes: &[u8], plan: &TransformPlan) -> Result<PlanarImage> {
    let scalar = plan.precision.storage_scalar();
    let width = scalar.byte_width() as usize;
    let count = plan.channels as usize * plan.output_plane() as usize;
    if bytes.len() < count * width {
        return Err(SpectraError::Device(format!(
            "readback returned {} bytes, expected {}",
            bytes.len(),
            count * width
        )));
    }

    let values: Vec<f32> = bytes[..count * width]
        .chunks_exact(width)
        .map(|chunk| match scalar {
            ScalarType::F16 => half::f16::from_le_bytes([chunk[0], chunk[1]]).to_f32(),
            ScalarType::F32 => f32::from_le_bytes([chunk[0], chunk[1], chunk[2], chunk[3]]),
            ScalarType::F64 => {
                let mut raw = [0u8; 8];
                raw.copy_from_slice(chunk);
                f64::from_le_bytes(raw) as f32
            }
        })
        .collect();

    let shape = (
        plan.channels as usize,
        plan.output_height() as usize,
        plan.output_width() as usize,
    );
    let data = Array3::from_shape_vec(shape, values)
        .map_err(|e| SpectraError::Device(format!("readback shape mismatch: {e}")))?;
    Ok(PlanarImage::new(data))
}
