use crate::consts::{
    DEFAULT_SHARED_MEMORY_BYTES, INTEL_SHARED_MEMORY_SCALE, VENDOR_ID_AMD, VENDOR_ID_INTEL,
    VENDOR_ID_NVIDIA,
};

/// GPU vendor, identified by PCI vendor id.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Vendor {
    Nvidia,
    Intel,
    Amd,
    Other(u32),
}

impl Vendor {
    pub fn from_pci_id(id: u32) -> Self {
        match id {
            VENDOR_ID_NVIDIA => Self::Nvidia,
            VENDOR_ID_INTEL => Self::Intel,
            VENDOR_ID_AMD => Self::Amd,
            other => Self::Other(other),
        }
    }

    /// Native SIMD width used to shape workgroups.
    pub fn warp_size(self) -> u32 {
        match self {
            Self::Amd => 64,
            Self::Nvidia | Self::Intel | Self::Other(_) => 32,
        }
    }

    /// Correction applied to a working row's footprint before comparing it
    /// with the shared-memory budget.
    pub fn shared_memory_scale(self) -> u64 {
        match self {
            Self::Intel => INTEL_SHARED_MEMORY_SCALE,
            _ => 1,
        }
    }
}

impl std::fmt::Display for Vendor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Nvidia => write!(f, "NVIDIA"),
            Self::Intel => write!(f, "Intel"),
            Self::Amd => write!(f, "AMD"),
            Self::Other(id) => write!(f, "vendor {id:#06x}"),
        }
    }
}

/// The device properties the planner depends on.
#[derive(Clone, Debug, PartialEq)]
pub struct DeviceProfile {
    pub name: String,
    pub vendor: Vendor,
    /// Workgroup (shared) memory available to one compute workgroup.
    pub shared_memory_bytes: u32,
    pub max_invocations: u32,
    pub max_workgroup_size: [u32; 3],
    /// Largest buffer that can be bound as a storage buffer.
    pub max_buffer_bytes: u64,
}

impl DeviceProfile {
    /// Profile matching wgpu's default limits, for planning without a device.
    pub fn generic() -> Self {
        Self {
            name: "generic".into(),
            vendor: Vendor::Other(0),
            shared_memory_bytes: DEFAULT_SHARED_MEMORY_BYTES,
            max_invocations: 256,
            max_workgroup_size: [256, 256, 64],
            max_buffer_bytes: 128 << 20,
        }
    }

    pub fn with_vendor(mut self, vendor: Vendor) -> Self {
        self.vendor = vendor;
        self
    }

    pub fn warp_size(&self) -> u32 {
        self.vendor.warp_size()
    }
}

impl Default for DeviceProfile {
    fn default() -> Self {
        Self::generic()
    }
}
