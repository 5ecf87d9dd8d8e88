use tracing::debug;

use crate::consts::{MAX_TRANSFORM_EXTENT, UPSCALE_INTEGER_TOLERANCE};
use crate::error::{Result, SpectraError};

use super::device::DeviceProfile;
use super::precision::{Precision, TransformMode};
use super::window::{AxisShift, AxisWindow, ShiftMap, ZeroPadWindow};
use super::workgroup::{dispatch_grid, sharpen_local_size, shift_local_size};

/// What the caller wants upscaled.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct UpscaleRequest {
    pub width: u32,
    pub height: u32,
    pub channels: u32,
    pub precision: Precision,
    pub upscale: f32,
    pub mode: TransformMode,
}

/// Byte sizes of the device buffers for one plan.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct BufferSizes {
    /// Original pixels in storage precision.
    pub input: u64,
    /// Enlarged spectrum in compute precision.
    pub working: u64,
    pub scratch: u64,
    /// Final real image in storage precision, read back from `working`.
    pub output: u64,
}

impl BufferSizes {
    /// Device memory held by one worker.
    pub fn device_total(&self) -> u64 {
        self.input + self.working + self.scratch
    }
}

/// Everything the pipeline needs to know about one upscale, fixed at creation.
#[derive(Clone, Debug, PartialEq)]
pub struct TransformPlan {
    pub width: u32,
    pub height: u32,
    pub depth: u32,
    pub channels: u32,
    pub precision: Precision,
    pub real_input: bool,
    pub upscale: f32,
    /// Unpadded pixel strides `[W, H]`.
    pub input_stride: [u32; 2],
    /// Upscaled strides `[SW, SH]`.
    pub working_stride: [u32; 2],
    /// Bytes per complex sample in the working buffers.
    pub complex_bytes: u64,
    pub windows: ZeroPadWindow,
    pub shift: ShiftMap,
    pub shift_local: [u32; 3],
    pub sharpen_local: [u32; 3],
}

fn scaled_extent(factor: f32, size: u32) -> Option<u32> {
    let exact = factor as f64 * size as f64;
    let rounded = exact.round();
    if (exact - rounded).abs() > UPSCALE_INTEGER_TOLERANCE || rounded > u32::MAX as f64 {
        return None;
    }
    Some(rounded as u32)
}

impl TransformPlan {
    /// Validate `request` against `profile` and derive the full layout.
    pub fn new(request: &UpscaleRequest, profile: &DeviceProfile) -> Result<Self> {
        let UpscaleRequest {
            width,
            height,
            channels,
            precision,
            upscale,
            mode,
        } = *request;

        if width == 0 || height == 0 {
            return Err(SpectraError::InvalidDimensions { width, height });
        }
        if channels == 0 {
            return Err(SpectraError::Config("channel count must be positive".into()));
        }
        if !upscale.is_finite() || upscale < 1.0 {
            return Err(SpectraError::InvalidUpscale {
                factor: upscale,
                width,
                height,
            });
        }
        let (sw, sh) = match (scaled_extent(upscale, width), scaled_extent(upscale, height)) {
            (Some(sw), Some(sh)) => (sw, sh),
            _ => {
                return Err(SpectraError::InvalidUpscale {
                    factor: upscale,
                    width,
                    height,
                })
            }
        };

        if sw > MAX_TRANSFORM_EXTENT || sh > MAX_TRANSFORM_EXTENT {
            return Err(SpectraError::Config(format!(
                "upscaled size {sw}x{sh} exceeds the {MAX_TRANSFORM_EXTENT} sample transform limit"
            )));
        }

        let complex_bytes = precision.complex_bytes();
        let real_input = match mode {
            TransformMode::Real => true,
            TransformMode::Complex => false,
            TransformMode::Auto => {
                sw as u64 * complex_bytes * profile.vendor.shared_memory_scale()
                    <= profile.shared_memory_bytes as u64
            }
        };

        let (windows, shift) = if real_input {
            let x = AxisWindow::half_spectrum(width, sw);
            (
                ZeroPadWindow {
                    axes: [x, AxisWindow::full(height, sh)],
                },
                ShiftMap {
                    axes: [AxisShift::identity(x.extent), AxisShift::centered(height, sh)],
                },
            )
        } else {
            (
                ZeroPadWindow {
                    axes: [AxisWindow::full(width, sw), AxisWindow::full(height, sh)],
                },
                ShiftMap {
                    axes: [AxisShift::centered(width, sw), AxisShift::centered(height, sh)],
                },
            )
        };

        let spectrum = [windows.axes[0].extent, sh];
        let plan = Self {
            width,
            height,
            depth: 1,
            channels,
            precision,
            real_input,
            upscale,
            input_stride: [width, height],
            working_stride: [sw, sh],
            complex_bytes,
            windows,
            shift,
            shift_local: shift_local_size(spectrum, profile),
            sharpen_local: sharpen_local_size([sw, sh], profile),
        };

        let sizes = plan.buffer_sizes();
        let largest = sizes.working.max(sizes.input);
        if largest > profile.max_buffer_bytes {
            return Err(SpectraError::Config(format!(
                "{}x{} at {}x needs a {largest}-byte buffer, device allows {}",
                width, height, upscale, profile.max_buffer_bytes
            )));
        }

        debug!(
            width,
            height,
            out_width = sw,
            out_height = sh,
            real_input,
            precision = %precision,
            "Transform plan created"
        );
        Ok(plan)
    }

    pub fn output_width(&self) -> u32 {
        self.working_stride[0]
    }

    pub fn output_height(&self) -> u32 {
        self.working_stride[1]
    }

    /// Complex samples per row of the working spectrum.
    pub fn spectrum_width(&self) -> u32 {
        self.windows.axes[0].extent
    }

    /// Complex samples per row produced by the forward transform.
    pub fn input_spectrum_width(&self) -> u32 {
        if self.real_input {
            self.width / 2 + 1
        } else {
            self.width
        }
    }

    /// Complex samples in one channel plane of the working spectrum.
    pub fn spectrum_plane(&self) -> u64 {
        self.spectrum_width() as u64 * self.working_stride[1] as u64
    }

    /// Pixels in one channel plane of the upscaled image.
    pub fn output_plane(&self) -> u64 {
        self.working_stride[0] as u64 * self.working_stride[1] as u64
    }

    pub fn input_plane(&self) -> u64 {
        self.width as u64 * self.height as u64
    }

    /// Amplitude correction between an unnormalised forward transform of
    /// `W x H` samples and a normalised inverse of `SW x SH` samples.
    pub fn gain(&self) -> f64 {
        self.output_plane() as f64 / self.input_plane() as f64
    }

    pub fn buffer_sizes(&self) -> BufferSizes {
        let storage = self.precision.storage_scalar().byte_width();
        let per_pixel = if self.real_input { 1 } else { 2 };
        let channels = self.channels as u64;
        let working = channels * self.spectrum_plane() * self.complex_bytes;
        BufferSizes {
            input: channels * self.input_plane() * per_pixel * storage,
            working,
            scratch: working,
            output: channels * self.output_plane() * storage,
        }
    }

    pub fn shift_grid(&self) -> [u32; 3] {
        dispatch_grid(
            [self.spectrum_width(), self.working_stride[1]],
            self.shift_local,
            self.channels,
        )
    }

    pub fn sharpen_grid(&self) -> [u32; 3] {
        dispatch_grid(self.working_stride, self.sharpen_local, self.channels)
    }
}
