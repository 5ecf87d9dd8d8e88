//! Buffer and layout planning: sizes, strides, zero windows, shift maps and
//! workgroup shapes for one upscale.

pub mod device;
pub mod precision;
pub mod transform;
pub mod window;
pub mod workgroup;

pub use device::{DeviceProfile, Vendor};
pub use precision::{Precision, ScalarType, TransformMode};
pub use transform::{BufferSizes, TransformPlan, UpscaleRequest};
pub use window::{AxisShift, AxisWindow, ShiftMap, ZeroPadWindow};
