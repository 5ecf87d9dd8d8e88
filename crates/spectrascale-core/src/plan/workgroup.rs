use crate::consts::MAX_WORKGROUP_INVOCATIONS;

use super::device::DeviceProfile;

/// Largest power of two that divides `n` and does not exceed `cap`.
fn pow2_divisor(n: u32, cap: u32) -> u32 {
    let mut v = 1;
    while v * 2 <= cap && n % (v * 2) == 0 {
        v *= 2;
    }
    v
}

/// Local workgroup shape for a 2-D kernel over `extent`.
///
/// x takes the largest power-of-two divisor of the row length up to
/// `cap`; y fills whatever is left of `cap`.
pub fn local_size(extent: [u32; 2], cap: u32, profile: &DeviceProfile) -> [u32; 3] {
    let cap = cap.min(profile.max_invocations).max(1);
    let x = pow2_divisor(extent[0], cap.min(profile.max_workgroup_size[0]));
    let y = pow2_divisor(extent[1], (cap / x).min(profile.max_workgroup_size[1]));
    [x, y, 1]
}

/// Workgroup shape for the shift kernel: one warp per group.
pub fn shift_local_size(extent: [u32; 2], profile: &DeviceProfile) -> [u32; 3] {
    local_size(extent, profile.warp_size(), profile)
}

/// Workgroup shape for the sharpen kernel: up to one warp along each axis,
/// then capped by the device.
pub fn sharpen_local_size(extent: [u32; 2], profile: &DeviceProfile) -> [u32; 3] {
    let warp = profile.warp_size();
    let total = MAX_WORKGROUP_INVOCATIONS.min(profile.max_invocations).max(1);
    let x = pow2_divisor(extent[0], warp.min(total).min(profile.max_workgroup_size[0]));
    let y = pow2_divisor(extent[1], warp.min(total / x).min(profile.max_workgroup_size[1]));
    [x, y, 1]
}

/// `ceil(extent / local)` per axis, channels on z.
pub fn dispatch_grid(extent: [u32; 2], local: [u32; 3], channels: u32) -> [u32; 3] {
    [
        extent[0].div_ceil(local[0]),
        extent[1].div_ceil(local[1]),
        channels,
    ]
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::plan::device::Vendor;

    #[test]
    fn odd_rows_fall_back_to_columns() {
        let profile = DeviceProfile::generic();
        assert_eq!(shift_local_size([257, 512], &profile), [1, 32, 1]);
    }

    #[test]
    fn amd_uses_wider_groups() {
        let profile = DeviceProfile::generic().with_vendor(Vendor::Amd);
        assert_eq!(shift_local_size([512, 512], &profile), [64, 1, 1]);
        assert_eq!(sharpen_local_size([512, 512], &profile), [64, 4, 1]);
    }

    #[test]
    fn sharpen_groups_stay_within_a_warp_per_axis() {
        let mut profile = DeviceProfile::generic();
        assert_eq!(sharpen_local_size([512, 512], &profile), [32, 8, 1]);
        assert_eq!(sharpen_local_size([257, 512], &profile), [1, 32, 1]);
        profile.max_invocations = 4096;
        assert_eq!(sharpen_local_size([512, 512], &profile), [32, 32, 1]);
    }
}
