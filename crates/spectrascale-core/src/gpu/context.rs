//! Adapter selection, device creation and submission waits.

use std::time::{Duration, Instant};

use tracing::{debug, info};

use crate::consts::FENCE_TIMEOUT;
use crate::error::{Result, SpectraError};
use crate::plan::{DeviceProfile, Precision, Vendor};

/// One line of `spectrascale devices` output.
#[derive(Clone, Debug)]
pub struct AdapterSummary {
    pub id: usize,
    pub name: String,
    pub vendor: Vendor,
    pub backend: String,
    pub device_type: String,
    pub supports_f64: bool,
    pub supports_f16: bool,
}

fn instance() -> wgpu::Instance {
    wgpu::Instance::new(&wgpu::InstanceDescriptor::default())
}

fn enumerate() -> Vec<wgpu::Adapter> {
    pollster::block_on(instance().enumerate_adapters(wgpu::Backends::all()))
}

/// All adapters wgpu can see, in the order device ids refer to them.
pub fn list_adapters() -> Vec<AdapterSummary> {
    enumerate()
        .iter()
        .enumerate()
        .map(|(id, adapter)| {
            let info = adapter.get_info();
            let features = adapter.features();
            AdapterSummary {
                id,
                name: info.name,
                vendor: Vendor::from_pci_id(info.vendor),
                backend: format!("{:?}", info.backend),
                device_type: format!("{:?}", info.device_type),
                supports_f64: features.contains(wgpu::Features::SHADER_F64),
                supports_f16: features.contains(wgpu::Features::SHADER_F16),
            }
        })
        .collect()
}

/// Device features a precision needs in its shaders.
pub fn required_features(precision: Precision) -> wgpu::Features {
    match precision {
        Precision::Single => wgpu::Features::empty(),
        Precision::Double => wgpu::Features::SHADER_F64,
        Precision::Half => wgpu::Features::SHADER_F16,
    }
}

/// A device and queue owned by one worker.
pub struct GpuContext {
    pub device: wgpu::Device,
    pub queue: wgpu::Queue,
    pub profile: DeviceProfile,
    pub precision: Precision,
}

impl GpuContext {
    /// Open adapter `device_id` with the features `precision` needs.
    pub fn new(device_id: usize, precision: Precision) -> Result<Self> {
        let adapter = enumerate().into_iter().nth(device_id).ok_or_else(|| {
            SpectraError::Device(format!("no GPU adapter with id {device_id}"))
        })?;

        let info = adapter.get_info();
        let features = required_features(precision);
        if !adapter.features().contains(features) {
            return Err(SpectraError::Device(format!(
                "{} does not support {precision} precision shaders ({features:?})",
                info.name
            )));
        }

        let limits = adapter.limits();
        let (device, queue) = pollster::block_on(adapter.request_device(
            &wgpu::DeviceDescriptor {
                label: Some("spectrascale"),
                required_features: features,
                required_limits: limits.clone(),
                ..Default::default()
            },
        ))
        .map_err(|e| SpectraError::Device(format!("failed to create device: {e}")))?;

        let profile = DeviceProfile {
            name: info.name.clone(),
            vendor: Vendor::from_pci_id(info.vendor),
            shared_memory_bytes: limits.max_compute_workgroup_storage_size,
            max_invocations: limits.max_compute_invocations_per_workgroup,
            max_workgroup_size: [
                limits.max_compute_workgroup_size_x,
                limits.max_compute_workgroup_size_y,
                limits.max_compute_workgroup_size_z,
            ],
            max_buffer_bytes: (limits.max_storage_buffer_binding_size as u64)
                .min(limits.max_buffer_size),
        };
        info!(
            adapter = %info.name,
            vendor = %profile.vendor,
            backend = ?info.backend,
            "GPU device ready"
        );
        debug!(
            shared_memory = profile.shared_memory_bytes,
            max_invocations = profile.max_invocations,
            max_buffer = profile.max_buffer_bytes,
            "Device limits"
        );

        Ok(Self {
            device,
            queue,
            profile,
            precision,
        })
    }

    pub fn name(&self) -> &str {
        &self.profile.name
    }

    pub fn encoder(&self, label: &str) -> wgpu::CommandEncoder {
        self.device
            .create_command_encoder(&wgpu::CommandEncoderDescriptor { label: Some(label) })
    }

    /// Submit `commands` and block until the queue has finished them.
    pub fn submit_and_wait(&self, commands: wgpu::CommandBuffer) -> Result<Duration> {
        let start = Instant::now();
        let index = self.queue.submit(std::iter::once(commands));
        self.wait(index)?;
        Ok(start.elapsed())
    }

    /// Block on one submission. Exceeding [`FENCE_TIMEOUT`] is treated as a lost device.
    pub fn wait(&self, index: wgpu::SubmissionIndex) -> Result<()> {
        self.poll_submission(index)
            .map_err(|e| SpectraError::Device(format!("submission did not complete: {e}")))
    }

    /// Raw fence wait, leaving the timeout distinguishable for the scheduler.
    pub fn poll_submission(
        &self,
        index: wgpu::SubmissionIndex,
    ) -> std::result::Result<(), wgpu::PollError> {
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: Some(index),
                timeout: Some(FENCE_TIMEOUT),
            })
            .map(|_| ())
    }

    /// Drive pending callbacks such as buffer mappings to completion.
    pub fn poll_blocking(&self) -> Result<()> {
        self.device
            .poll(wgpu::PollType::Wait {
                submission_index: None,
                timeout: Some(FENCE_TIMEOUT),
            })
            .map(|_| ())
            .map_err(|e| SpectraError::Device(format!("device poll failed: {e}")))
    }
}
