use std::time::Duration;

/// Minimum pixel count (h*w) to use row-level Rayon parallelism in the CPU reference.
pub const PARALLEL_PIXEL_THRESHOLD: usize = 65_536;

/// Number of colour channels processed per image (R, G, B).
pub const COLOR_CHANNEL_COUNT: u32 = 3;

/// Default sharpening coefficient for the edge-adaptive sharpen stage.
pub const DEFAULT_SHARPEN: f32 = 0.2;

/// Sharpen coefficients must stay below this; at it the sharpen divisor
/// `1 - 4k` reaches zero.
pub const MAX_SHARPEN: f32 = 0.25;

/// Default upscale factor.
pub const DEFAULT_UPSCALE: f32 = 2.0;

/// Upper bound on how long a single submission may run before the device is
/// considered lost.
pub const FENCE_TIMEOUT: Duration = Duration::from_secs(100);

/// Hard cap on invocations per workgroup, independent of what the device reports.
pub const MAX_WORKGROUP_INVOCATIONS: u32 = 1024;

/// Invocations per workgroup for one-dimensional FFT kernels.
pub const FFT_WORKGROUP_SIZE: u32 = 64;

/// Tolerance when checking that `upscale * size` lands on an integer.
pub const UPSCALE_INTEGER_TOLERANCE: f64 = 1e-4;

/// Bytes per MiB, for VRAM reporting.
pub const BYTES_PER_MIB: u64 = 1024 * 1024;

/// PCI vendor ids used by the static workgroup lookup.
pub const VENDOR_ID_NVIDIA: u32 = 0x10DE;
pub const VENDOR_ID_INTEL: u32 = 0x8086;
pub const VENDOR_ID_AMD: u32 = 0x1002;

/// Shared-memory budget scale applied on Intel when choosing real-input mode.
pub const INTEL_SHARED_MEMORY_SCALE: u64 = 4;

/// Shared memory assumed when no device profile is available (wgpu's default limit).
pub const DEFAULT_SHARED_MEMORY_BYTES: u32 = 16_384;

/// Width of the zero-padded index in batch file names (`000001.png`).
pub const BATCH_INDEX_WIDTH: usize = 6;

/// Largest transform length per axis. Keeps `j * k` twiddle indices inside
/// u32 and line counts inside the per-dimension dispatch limit.
pub const MAX_TRANSFORM_EXTENT: u32 = 65_535;
